use crate::error::{AppError, Result};
use log;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header, contents and separator for one scanned file.
pub fn format_block(relative_path: &str, contents: &str) -> String {
    format!("// Contents of \"{}\"\n{}\n\n", relative_path, contents)
}

/// The output artifact, open for the duration of a scan.
///
/// The file is created (or truncated) on open and closed when the writer is
/// dropped, on success and on error alike. `finish` flushes buffered data.
#[derive(Debug)]
pub struct OutputWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    bytes_written: u64,
    max_bytes: Option<u64>,
}

impl OutputWriter {
    pub fn create(path: &Path, max_bytes: Option<u64>) -> Result<Self> {
        log::debug!("Opening output file: {}", path.display());
        let file = File::create(path).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
            bytes_written: 0,
            max_bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// True if a block of `len` bytes still fits under the size cap.
    pub fn fits(&self, len: usize) -> bool {
        match self.max_bytes {
            Some(limit) => self.bytes_written.saturating_add(len as u64) <= limit,
            None => true,
        }
    }

    pub fn write_block(&mut self, block: &str) -> Result<()> {
        self.inner
            .write_all(block.as_bytes())
            .map_err(|e| AppError::FileWrite {
                path: self.path.clone(),
                source: e,
            })?;
        self.bytes_written += block.len() as u64;
        Ok(())
    }

    pub fn finish(mut self) -> Result<u64> {
        self.inner.flush().map_err(|e| AppError::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;
        log::debug!(
            "Closed output file {} ({} bytes)",
            self.path.display(),
            self.bytes_written
        );
        Ok(self.bytes_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn block_layout() {
        assert_eq!(
            format_block("a.txt", "hello"),
            "// Contents of \"a.txt\"\nhello\n\n"
        );
        assert_eq!(
            format_block("dir/b.txt", "line\n"),
            "// Contents of \"dir/b.txt\"\nline\n\n\n"
        );
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.rtf");
        fs::write(&path, "stale contents").unwrap();
        let writer = OutputWriter::create(&path, None).unwrap();
        assert_eq!(writer.finish().unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn blocks_are_appended_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.rtf");
        let mut writer = OutputWriter::create(&path, None).unwrap();
        writer.write_block(&format_block("one", "1")).unwrap();
        writer.write_block(&format_block("two", "2")).unwrap();
        let written = writer.finish().unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "// Contents of \"one\"\n1\n\n// Contents of \"two\"\n2\n\n"
        );
        assert_eq!(written, contents.len() as u64);
    }

    #[test]
    fn size_cap_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::create(&dir.path().join("out"), Some(10)).unwrap();
        assert!(writer.fits(10));
        assert!(!writer.fits(11));
        writer.write_block("12345").unwrap();
        assert!(writer.fits(5));
        assert!(!writer.fits(6));
    }

    #[test]
    fn missing_parent_directory_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.rtf");
        assert!(matches!(
            OutputWriter::create(&path, None),
            Err(AppError::FileWrite { .. })
        ));
    }
}

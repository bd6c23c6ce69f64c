//! Append-only log of raw result-page bodies.
//!
//! Each entry is headed `=== Page Content from {engine} - Page {n} ===`,
//! followed by the body and a rule of 50 `=` characters. Page numbers are the
//! zero-based position of the document in the engine's offset-ordered list.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::SearchError;

const RULE_WIDTH: usize = 50;

/// Write-only page-content log.
#[derive(Debug)]
pub struct PageLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl PageLog {
    /// Open `path` for appending, creating it (and parent directories) if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, SearchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!(path = %path.display(), "page log opened");
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one page entry and flush it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] on write failure.
    pub fn append(&mut self, engine: &str, index: usize, body: &str) -> Result<(), SearchError> {
        writeln!(self.writer, "=== Page Content from {engine} - Page {index} ===")?;
        self.writer.write_all(body.as_bytes())?;
        if !body.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        writeln!(self.writer, "{}", "=".repeat(RULE_WIDTH))?;
        self.writer.flush()?;
        tracing::trace!(engine, index, bytes = body.len(), "page logged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page-contents.log");
        let mut log = PageLog::open(&path).expect("open");
        log.append("Google", 0, "<html></html>").expect("append");

        let content = std::fs::read_to_string(&path).expect("read");
        let expected = format!(
            "=== Page Content from Google - Page 0 ===\n<html></html>\n{}\n",
            "=".repeat(50)
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn appends_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pages.log");
        {
            let mut log = PageLog::open(&path).expect("open");
            log.append("Bing", 0, "first\n").expect("append");
        }
        let mut log = PageLog::open(&path).expect("reopen");
        log.append("Bing", 1, "second").expect("append");

        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content.matches("=== Page Content from Bing").count(), 2);
        assert!(content.find("first").expect("first") < content.find("second").expect("second"));
        assert!(!content.contains("first\n\n"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("logs").join("pages.log");
        let log = PageLog::open(&path).expect("open");
        assert_eq!(log.path(), path.as_path());
        assert!(path.exists());
    }
}

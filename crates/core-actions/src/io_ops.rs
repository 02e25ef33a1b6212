//! File IO helpers at the persistence boundary.
//!
//! Synchronous and only used at startup (open) and shutdown (write); never
//! mid-edit. Documents are plain UTF-8, newline-joined.

use anyhow::{Context, Result};
use core_state::{LineList, split_lines};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Result of opening a document. Never fails: unreadable input yields an
/// empty (padded) document flagged `fresh`.
#[derive(Debug)]
pub struct OpenOutcome {
    pub lines: LineList,
    pub path: PathBuf,
    /// Lines read from disk (before padding).
    pub loaded: usize,
    /// No usable file content was found.
    pub fresh: bool,
}

/// Load `path` into a line list padded to at least `min_lines` lines.
///
/// `\r` before each `\n` is dropped. A missing file is expected on first run
/// and logged at warn; any other read error is logged at error. Both fall back
/// to an empty document.
pub fn open_document(path: &Path, min_lines: usize) -> OpenOutcome {
    match fs::read_to_string(path) {
        Ok(content) => {
            let texts = split_lines(&content);
            let loaded = texts.len();
            tracing::info!(target: "io", path = %path.display(), loaded, "document_opened");
            OpenOutcome {
                lines: LineList::from_lines(texts, min_lines),
                path: path.to_path_buf(),
                loaded,
                fresh: false,
            }
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                tracing::warn!(target: "io", path = %path.display(), "document_missing");
            } else {
                tracing::error!(target: "io", path = %path.display(), ?e, "file_open_error");
            }
            OpenOutcome {
                lines: LineList::from_lines(std::iter::empty::<&str>(), min_lines),
                path: path.to_path_buf(),
                loaded: 0,
                fresh: true,
            }
        }
    }
}

/// Serialize `lines` to `path`, creating the parent directory if needed.
/// Returns the number of lines written.
pub fn write_document(path: &Path, lines: &LineList) -> Result<usize> {
    let content = lines.serialize();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, content.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    let written = content.split('\n').count();
    tracing::info!(target: "io", path = %path.display(), lines = written, bytes = content.len(), "document_written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_strips_carriage_returns_and_pads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "line1\r\nline2\nline3\r\n").unwrap();
        let out = open_document(&path, 6);
        assert!(!out.fresh);
        assert_eq!(out.loaded, 4);
        assert_eq!(out.lines.texts(), vec!["line1", "line2", "line3", "", "", ""]);
    }

    #[test]
    fn missing_file_yields_fresh_padded_document() {
        let dir = tempfile::tempdir().unwrap();
        let out = open_document(&dir.path().join("absent.txt"), 3);
        assert!(out.fresh);
        assert_eq!(out.loaded, 0);
        assert_eq!(out.lines.texts(), vec!["", "", ""]);
    }

    #[test]
    fn write_trims_trailing_blank_lines_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let lines = LineList::from_lines(["a", "", "b"], 8);
        assert_eq!(write_document(&path, &lines).unwrap(), 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n\nb");
    }

    #[test]
    fn empty_document_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        let lines = LineList::from_lines([""], 4);
        assert_eq!(write_document(&path, &lines).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn write_into_a_file_path_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let lines = LineList::from_lines(["a"], 1);
        assert!(write_document(&blocker.join("out.txt"), &lines).is_err());
    }
}

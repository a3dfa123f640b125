//! One target file, read once and committed once.
//!
//! A [`Document`] holds the text exactly as it was read next to the working
//! copy that transformations mutate. Nothing touches the disk until
//! [`Document::commit`], which writes through [`atomic_write`].

use crate::edit::{atomic_write, format_hash, EditError};
use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    original: String,
    /// Working text
    pub text: String,
}

/// Outcome of [`Document::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Written { bytes: usize },
    Unchanged,
}

impl Document {
    /// Read `path` fully as UTF-8.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditError> {
        let path = path.into();
        let original = fs::read_to_string(&path)?;
        Ok(Self::from_parts(path, original))
    }

    pub fn from_parts(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let original = text.into();
        Self {
            path: path.into(),
            text: original.clone(),
            original,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text as it was when loaded.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_modified(&self) -> bool {
        self.text != self.original
    }

    /// xxh3 of the working text, rendered as `0x…`.
    pub fn fingerprint(&self) -> String {
        format_hash(xxh3_64(self.text.as_bytes()))
    }

    /// Write the working text over the original file.
    ///
    /// Skips the write entirely when nothing changed.
    pub fn commit(self) -> Result<CommitOutcome, EditError> {
        if !self.is_modified() {
            return Ok(CommitOutcome::Unchanged);
        }
        atomic_write(&self.path, self.text.as_bytes())?;
        Ok(CommitOutcome::Written {
            bytes: self.text.len(),
        })
    }
}

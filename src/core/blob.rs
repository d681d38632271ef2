//! Document blob storage.
//!
//! Uploaded documents (tax id scans, transcripts) are stored under opaque
//! salted-digest names so a stored name never leaks the original filename or
//! its owner. Entities hold the returned name as a plain string column.

use crate::errors::{Error, Result};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Storage seam for uploaded documents.
pub trait BlobStore: Send + Sync {
    /// Stores the bytes and returns the opaque name to persist.
    fn store(&self, bytes: &[u8], extension: &str) -> Result<String>;

    /// Retrieves a blob previously returned by [`BlobStore::store`].
    fn retrieve(&self, name: &str) -> Result<Vec<u8>>;
}

/// Derives an opaque blob name: a salted SHA-256 digest of the content plus
/// a sanitized copy of the declared extension.
fn blob_name(bytes: &[u8], extension: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.update(salt);
    let digest = hex::encode(hasher.finalize());

    let extension: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if extension.is_empty() {
        digest
    } else {
        format!("{digest}.{extension}")
    }
}

/// Names contain only hex digits plus an optional alphanumeric extension, so
/// anything else is a forged name rather than a lookup miss.
fn is_valid_name(name: &str) -> bool {
    let (digest, extension) = match name.split_once('.') {
        Some((digest, extension)) => (digest, extension),
        None => (name, ""),
    };
    digest.len() == 64
        && digest.chars().all(|c| c.is_ascii_hexdigit())
        && extension.chars().all(char::is_alphanumeric)
}

/// Blob store backed by a flat directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if !is_valid_name(name) {
            return Err(Error::BlobNotFound {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(name))
    }
}

impl BlobStore for FsBlobStore {
    fn store(&self, bytes: &[u8], extension: &str) -> Result<String> {
        std::fs::create_dir_all(&self.root)?;
        let name = blob_name(bytes, extension);
        std::fs::write(self.root.join(&name), bytes)?;
        Ok(name)
    }

    fn retrieve(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        read_or_not_found(&path, name)
    }
}

fn read_or_not_found(path: &Path, name: &str) -> Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(Error::BlobNotFound {
            name: name.to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

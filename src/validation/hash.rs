// File digest computation

use crate::common::error::{Error, Result};
use crate::common::types::{DIGEST_HEX_LEN, READ_BUFFER_SIZE};
use ring::digest::{Context, SHA1_FOR_LEGACY_USE_ONLY};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Lowercase hex SHA-1 digest of a file's raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDigest(String);

impl FileDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Exact string comparison against a digest recorded in a manifest
    pub fn matches(&self, recorded: &str) -> bool {
        self.0 == recorded
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-1 digest of an in-memory byte sequence
pub fn digest_bytes(data: &[u8]) -> FileDigest {
    let digest = ring::digest::digest(&SHA1_FOR_LEGACY_USE_ONLY, data);
    FileDigest(hex::encode(digest.as_ref()))
}

/// Compute the SHA-1 digest of everything left in `reader`
pub fn digest_reader<R: Read>(reader: &mut R) -> std::io::Result<FileDigest> {
    let mut context = Context::new(&SHA1_FOR_LEGACY_USE_ONLY);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.update(&buffer[..bytes_read]);
    }

    let digest = FileDigest(hex::encode(context.finish().as_ref()));
    debug_assert_eq!(digest.0.len(), DIGEST_HEX_LEN);
    Ok(digest)
}

/// Compute the digest of the file at `path`
///
/// # Returns
/// * `Ok(FileDigest)` - Digest of the exact bytes on disk
/// * `Err(Error::FileRead)` - If the file is missing or unreadable
pub fn digest_of(path: &Path) -> Result<FileDigest> {
    let read_error = |source: std::io::Error| Error::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_error)?;
    digest_reader(&mut file).map_err(read_error)
}

/// Verify the file at `path` against a recorded digest
///
/// # Returns
/// * `Ok(true)` / `Ok(false)` - Whether the digests are equal
/// * `Err(Error)` - If the file can't be read
pub fn verify_file_digest(path: &Path, recorded: &str) -> Result<bool> {
    Ok(digest_of(path)?.matches(recorded))
}

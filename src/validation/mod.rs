// Validation module

pub mod manifest;
pub mod hash;

pub use manifest::{validate, Manifest, ManifestEntry, ManifestValidator, ValidationReport};
pub use hash::{digest_bytes, digest_of, digest_reader, verify_file_digest, FileDigest};

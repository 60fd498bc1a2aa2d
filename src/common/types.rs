// Common type definitions and constants

/// How the validator reacts to a digest mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first mismatching entry in manifest order
    #[default]
    FailFast,
    /// Check every entry and report all mismatches together
    CollectAll,
}

// Constants
pub const DEFAULT_MANIFEST_NAME: &str = "hash_list.txt";
pub const DEFAULT_DATA_ROOT: &str = "data";
pub const GROUP_PREFIX: &str = "group-";
pub const GROUP_SUFFIX_LEN: usize = 2;
pub const DIGEST_HEX_LEN: usize = 40; // SHA-1, 160 bits
pub const READ_BUFFER_SIZE: usize = 64 * 1024; // 64KB

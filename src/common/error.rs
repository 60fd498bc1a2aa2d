// Error types and error handling

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A file whose computed digest differs from the one recorded in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub relative_path: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed, hashes do not match (expected {}, got {})",
            self.relative_path, self.expected, self.actual
        )
    }
}

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    NoGroupDirectory { data_root: PathBuf },
    TooManyGroupDirectories { data_root: PathBuf, found: Vec<String> },
    ManifestMissing { path: PathBuf },
    MalformedManifest { line: usize, content: String },
    FileRead { path: PathBuf, source: io::Error },
    Integrity(Mismatch),
    IntegrityFailures(Vec<Mismatch>),
    ConfigError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::NoGroupDirectory { data_root } => write!(
                f,
                "No group directory in data directory {}: have you downloaded and unpacked the data?",
                data_root.display()
            ),
            Error::TooManyGroupDirectories { data_root, found } => write!(
                f,
                "Too many group directories in data directory {}: {}",
                data_root.display(),
                found.join(", ")
            ),
            Error::ManifestMissing { path } => {
                write!(f, "Manifest not found: {}", path.display())
            }
            Error::MalformedManifest { line, content } => write!(
                f,
                "Malformed manifest line {}: expected '<digest> <path>', got {:?}",
                line, content
            ),
            Error::FileRead { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            Error::Integrity(mismatch) => write!(f, "{}", mismatch),
            Error::IntegrityFailures(mismatches) => {
                write!(f, "{} files changed, hashes do not match:", mismatches.len())?;
                for mismatch in mismatches {
                    write!(f, "\n  {}", mismatch)?;
                }
                Ok(())
            }
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

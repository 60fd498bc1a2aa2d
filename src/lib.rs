//! Manifest-based integrity checking for a data directory.
//!
//! A data root holds exactly one `group-XX` directory. That directory holds
//! the data files and a `hash_list.txt` manifest of SHA-1 digests, with
//! paths relative to the data root.

pub mod common;
pub mod storage;
pub mod validation;

pub use common::{Error, Mismatch, Result, ValidatorConfig};
pub use validation::{Manifest, ManifestValidator, ValidationReport};

use std::path::PathBuf;

/// Locate the group directory under `config.data_root` and validate it
pub fn validate_data_root(config: &ValidatorConfig) -> Result<ValidationReport> {
    let group = storage::find_group_directory(&config.data_root)?;
    ManifestValidator::from_config(config).validate(&group)
}

/// Locate the group directory under `config.data_root` and (re)write its manifest
pub fn generate_manifest(config: &ValidatorConfig) -> Result<(PathBuf, Manifest)> {
    let group = storage::find_group_directory(&config.data_root)?;
    let builder = storage::ManifestBuilder::new(&group).manifest_name(config.manifest_name.clone());
    let manifest = builder.write()?;
    Ok((builder.manifest_path(), manifest))
}

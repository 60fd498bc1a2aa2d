// Manifest generation for a data directory

use crate::common::error::{Error, Result};
use crate::common::types::DEFAULT_MANIFEST_NAME;
use crate::validation::hash::digest_of;
use crate::validation::manifest::Manifest;
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for recording the current digests of a data directory
#[derive(Clone)]
pub struct ManifestBuilder {
    data_directory: PathBuf,
    manifest_name: String,
}

impl ManifestBuilder {
    /// Create a new manifest builder
    ///
    /// # Arguments
    /// * `data_directory` - Directory whose files are recorded
    pub fn new(data_directory: impl AsRef<Path>) -> Self {
        Self {
            data_directory: data_directory.as_ref().to_path_buf(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }

    /// Set the manifest file name
    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.data_directory.join(&self.manifest_name)
    }

    /// Hash every regular file in the data directory, sorted by name
    ///
    /// Paths are recorded relative to the parent of the data directory,
    /// e.g. `group-01/data.csv`. The manifest file itself is skipped.
    pub fn build(&self) -> Result<Manifest> {
        let dir_name = self
            .data_directory
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "Data directory has no usable name: {}",
                    self.data_directory.display()
                ))
            })?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.data_directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if name == self.manifest_name => {}
                // The manifest format is whitespace separated
                Ok(name) if name.chars().any(char::is_whitespace) => {
                    log::warn!("Skipping {:?}: whitespace in file name", name);
                }
                Ok(name) => names.push(name),
                Err(name) => log::warn!("Skipping non UTF-8 file name {:?}", name),
            }
        }
        names.sort();

        let mut manifest = Manifest::new();
        for name in names {
            let digest = digest_of(&self.data_directory.join(&name))?;
            log::debug!("{}  {}/{}", digest, dir_name, name);
            manifest.push(digest.into_string(), format!("{}/{}", dir_name, name));
        }

        Ok(manifest)
    }

    /// Build the manifest and write it into the data directory
    pub fn write(&self) -> Result<Manifest> {
        let manifest = self.build()?;
        let path = self.manifest_path();
        manifest.write_to(&path)?;
        log::info!("Wrote {} entries to {}", manifest.len(), path.display());
        Ok(manifest)
    }
}

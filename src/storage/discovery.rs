// Group directory discovery

use crate::common::error::{Error, Result};
use crate::common::types::{GROUP_PREFIX, GROUP_SUFFIX_LEN};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Whether `name` is `group-` followed by exactly two characters
pub fn is_group_name(name: &str) -> bool {
    name.strip_prefix(GROUP_PREFIX)
        .map(|suffix| suffix.chars().count() == GROUP_SUFFIX_LEN)
        .unwrap_or(false)
}

/// Find the single group directory directly under `data_root`
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the only `group-XX` directory
/// * `Err(Error::NoGroupDirectory)` - If there is none, or `data_root` does not exist
/// * `Err(Error::TooManyGroupDirectories)` - If there are several
pub fn find_group_directory(data_root: &Path) -> Result<PathBuf> {
    let entries = match fs::read_dir(data_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::NoGroupDirectory {
                data_root: data_root.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut groups = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::debug!("Skipping non UTF-8 entry {:?}", entry.path());
            continue;
        };
        if is_group_name(name) && entry.path().is_dir() {
            groups.push(entry.path());
        }
    }
    groups.sort();

    match groups.len() {
        0 => Err(Error::NoGroupDirectory {
            data_root: data_root.to_path_buf(),
        }),
        1 => {
            let group = groups.remove(0);
            log::info!("Found group directory {}", group.display());
            Ok(group)
        }
        _ => Err(Error::TooManyGroupDirectories {
            data_root: data_root.to_path_buf(),
            found: groups
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}

// Storage module - data directory discovery and manifest generation

pub mod builder;
pub mod discovery;

pub use builder::ManifestBuilder;
pub use discovery::{find_group_directory, is_group_name};

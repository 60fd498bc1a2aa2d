// Common utilities and shared code

pub mod error;
pub mod config;
pub mod types;

pub use error::{Error, Mismatch, Result};
pub use config::ValidatorConfig;
pub use types::*;

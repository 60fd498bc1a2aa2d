// Configuration types and parsing

use std::path::PathBuf;
use crate::common::error::{Error, Result};
use crate::common::types::{FailurePolicy, DEFAULT_DATA_ROOT, DEFAULT_MANIFEST_NAME};

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub data_root: PathBuf,
    pub manifest_name: String,
    pub policy: FailurePolicy,
    pub parallel: bool,
    pub worker_threads: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            policy: FailurePolicy::FailFast,
            parallel: false,
            worker_threads: num_cpus::get().max(1),
        }
    }
}

impl ValidatorConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Default::default()
        }
    }

    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(Error::ConfigError(format!(
                "Manifest name must be a plain file name, got {:?}",
                name
            )));
        }
        self.manifest_name = name;
        Ok(self)
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn collect_all(self) -> Self {
        self.with_policy(FailurePolicy::CollectAll)
    }

    /// Hash manifest entries on a rayon pool instead of one after another
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::ConfigError(
                "Worker thread count must be at least 1".to_string(),
            ));
        }
        self.worker_threads = threads;
        Ok(self)
    }
}

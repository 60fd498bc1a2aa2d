// Manifest parsing and validation

use crate::common::config::ValidatorConfig;
use crate::common::error::{Error, Mismatch, Result};
use crate::common::types::{FailurePolicy, DEFAULT_MANIFEST_NAME};
use crate::validation::hash::{digest_of, FileDigest};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One `<digest> <path>` record of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Digest as recorded, compared verbatim
    pub digest: String,
    /// Path relative to the parent of the data directory
    pub relative_path: String,
}

/// Ordered list of expected digests, as stored in `hash_list.txt`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text
    ///
    /// Every line must hold exactly two whitespace-separated fields. Blank
    /// lines are not skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(digest), Some(path), None) => entries.push(ManifestEntry {
                    digest: digest.to_string(),
                    relative_path: path.to_string(),
                }),
                _ => {
                    return Err(Error::MalformedManifest {
                        line: idx + 1,
                        content: line.to_string(),
                    })
                }
            }
        }

        Ok(Self { entries })
    }

    /// Read and parse the manifest file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ManifestMissing {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        Self::parse(&text)
    }

    /// Write the manifest to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    pub fn push(&mut self, digest: impl Into<String>, relative_path: impl Into<String>) {
        self.entries.push(ManifestEntry {
            digest: digest.into(),
            relative_path: relative_path.into(),
        });
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}  {}", entry.digest, entry.relative_path)?;
        }
        Ok(())
    }
}

/// Outcome of a successful validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub directory: PathBuf,
    pub files_checked: usize,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not corrupted, all the hashes match",
            self.directory.display()
        )
    }
}

/// Checks the files of a data directory against its manifest
#[derive(Debug, Clone)]
pub struct ManifestValidator {
    manifest_name: String,
    policy: FailurePolicy,
    worker_threads: Option<usize>,
}

impl ManifestValidator {
    /// Sequential, fail-fast validator reading `hash_list.txt`
    pub fn new() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            policy: FailurePolicy::FailFast,
            worker_threads: None,
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self {
            manifest_name: config.manifest_name.clone(),
            policy: config.policy,
            worker_threads: config.parallel.then_some(config.worker_threads),
        }
    }

    pub fn manifest_path(&self, data_directory: &Path) -> PathBuf {
        data_directory.join(&self.manifest_name)
    }

    /// Validate every file listed in the manifest of `data_directory`
    ///
    /// # Returns
    /// * `Ok(ValidationReport)` - If every digest matches
    /// * `Err(Error)` - Missing or malformed manifest, unreadable file, or
    ///   digest mismatch
    pub fn validate(&self, data_directory: &Path) -> Result<ValidationReport> {
        let manifest_path = self.manifest_path(data_directory);
        let manifest = Manifest::load(&manifest_path)?;
        log::info!(
            "Validating {} entries from {}",
            manifest.len(),
            manifest_path.display()
        );

        // Manifest paths are relative to the directory above the data directory
        let base = data_directory.parent().unwrap_or(data_directory);

        let mut mismatches = match self.worker_threads {
            None => {
                let digests = manifest
                    .entries()
                    .iter()
                    .map(|entry| (entry, digest_of(&base.join(&entry.relative_path))));
                self.compare(digests)?
            }
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::ConfigError(format!("Cannot start worker pool: {}", e)))?;
                log::debug!("Hashing on {} worker threads", threads);

                let digests: Vec<Result<FileDigest>> = pool.install(|| {
                    manifest
                        .entries()
                        .par_iter()
                        .map(|entry| digest_of(&base.join(&entry.relative_path)))
                        .collect()
                });
                self.compare(manifest.entries().iter().zip(digests))?
            }
        };

        if mismatches.len() == 1 {
            return Err(Error::Integrity(mismatches.remove(0)));
        }
        if !mismatches.is_empty() {
            return Err(Error::IntegrityFailures(mismatches));
        }

        let report = ValidationReport {
            directory: data_directory.to_path_buf(),
            files_checked: manifest.len(),
        };
        log::info!("{}", report);
        Ok(report)
    }

    /// Walk computed digests in manifest order and collect mismatches
    ///
    /// Read errors are fatal under either policy. Under `FailFast` the first
    /// mismatch is returned as an error and the iterator is not advanced.
    fn compare<'a, I>(&self, digests: I) -> Result<Vec<Mismatch>>
    where
        I: Iterator<Item = (&'a ManifestEntry, Result<FileDigest>)>,
    {
        let mut mismatches = Vec::new();

        for (entry, actual) in digests {
            let actual = actual?;
            if actual.matches(&entry.digest) {
                log::debug!("ok {}", entry.relative_path);
                continue;
            }

            let mismatch = Mismatch {
                relative_path: entry.relative_path.clone(),
                expected: entry.digest.clone(),
                actual: actual.into_string(),
            };
            log::warn!("{}", mismatch);

            match self.policy {
                FailurePolicy::FailFast => return Err(Error::Integrity(mismatch)),
                FailurePolicy::CollectAll => mismatches.push(mismatch),
            }
        }

        Ok(mismatches)
    }
}

impl Default for ManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate `data_directory` with the default validator
pub fn validate(data_directory: &Path) -> Result<ValidationReport> {
    ManifestValidator::new().validate(data_directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::hash::digest_bytes;
    use tempfile::TempDir;

    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    /// Creates `<tmp>/group-01` holding `files` and a manifest built from `records`
    fn setup(files: &[(&str, &str)], records: &[(&str, &str)]) -> (TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let group = root.path().join("group-01");
        fs::create_dir(&group).unwrap();
        for (name, contents) in files {
            fs::write(group.join(name), contents).unwrap();
        }
        let mut manifest = Manifest::new();
        for (digest, path) in records {
            manifest.push(*digest, *path);
        }
        manifest.write_to(&group.join("hash_list.txt")).unwrap();
        (root, group)
    }

    #[test]
    fn test_parse_manifest() {
        let text = format!(
            "{}  group-01/empty.txt\n{}\tgroup-01/abc.txt\n",
            EMPTY_SHA1,
            digest_bytes(b"abc")
        );
        let manifest = Manifest::parse(&text).unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entries()[0].digest, EMPTY_SHA1);
        assert_eq!(manifest.entries()[0].relative_path, "group-01/empty.txt");
        assert_eq!(manifest.entries()[1].relative_path, "group-01/abc.txt");
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let text = format!("{}  a.txt\n{} b.txt extra\n", EMPTY_SHA1, EMPTY_SHA1);
        match Manifest::parse(&text) {
            Err(Error::MalformedManifest { line, content }) => {
                assert_eq!(line, 2);
                assert!(content.ends_with("extra"));
            }
            other => panic!("Expected MalformedManifest, got {:?}", other),
        }

        assert!(matches!(
            Manifest::parse("only-a-digest\n"),
            Err(Error::MalformedManifest { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_does_not_skip_blank_lines() {
        let text = format!("{}  a.txt\n\n{}  b.txt\n", EMPTY_SHA1, EMPTY_SHA1);
        assert!(matches!(
            Manifest::parse(&text),
            Err(Error::MalformedManifest { line: 2, .. })
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        let mut manifest = Manifest::new();
        manifest.push(EMPTY_SHA1, "group-01/empty.txt");
        let text = manifest.to_string();

        assert_eq!(text, format!("{}  group-01/empty.txt\n", EMPTY_SHA1));
        assert_eq!(Manifest::parse(&text).unwrap(), manifest);
    }

    #[test]
    fn test_empty_file_validates() {
        let (_root, group) = setup(&[("empty.txt", "")], &[(EMPTY_SHA1, "group-01/empty.txt")]);

        let report = validate(&group).unwrap();
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.directory, group);
        assert!(report.to_string().ends_with("is not corrupted, all the hashes match"));
    }

    #[test]
    fn test_empty_manifest_validates() {
        let (_root, group) = setup(&[], &[]);
        let report = validate(&group).unwrap();
        assert_eq!(report.files_checked, 0);
    }

    #[test]
    fn test_validation_is_repeatable() {
        let abc = digest_bytes(b"abc");
        let (_root, group) = setup(&[("abc.txt", "abc")], &[(abc.as_str(), "group-01/abc.txt")]);

        let first = validate(&group).unwrap();
        let second = validate(&group).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(group.join("abc.txt")).unwrap(), b"abc");
    }

    #[test]
    fn test_stale_digest_fails_fast() {
        let stale = digest_bytes(b"old contents");
        // The second entry is missing on disk; fail-fast must stop before reading it
        let (_root, group) = setup(
            &[("data.csv", "new contents")],
            &[(stale.as_str(), "group-01/data.csv"), (EMPTY_SHA1, "group-01/absent.txt")],
        );

        match validate(&group) {
            Err(Error::Integrity(mismatch)) => {
                assert_eq!(mismatch.relative_path, "group-01/data.csv");
                assert_eq!(mismatch.expected, stale.as_str());
                assert_eq!(mismatch.actual, digest_bytes(b"new contents").as_str());
            }
            other => panic!("Expected Integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_collect_all_reports_every_mismatch() {
        let abc = digest_bytes(b"abc");
        let (_root, group) = setup(
            &[("a.txt", "changed"), ("b.txt", "abc"), ("c.txt", "changed too")],
            &[
                (abc.as_str(), "group-01/a.txt"),
                (abc.as_str(), "group-01/b.txt"),
                (abc.as_str(), "group-01/c.txt"),
            ],
        );
        let config = ValidatorConfig::default().collect_all();

        match ManifestValidator::from_config(&config).validate(&group) {
            Err(Error::IntegrityFailures(mismatches)) => {
                let paths: Vec<_> = mismatches.iter().map(|m| m.relative_path.as_str()).collect();
                assert_eq!(paths, vec!["group-01/a.txt", "group-01/c.txt"]);
            }
            other => panic!("Expected IntegrityFailures, got {:?}", other),
        }
    }

    #[test]
    fn test_collect_all_single_mismatch_is_integrity_error() {
        let (_root, group) = setup(&[("a.txt", "changed")], &[(EMPTY_SHA1, "group-01/a.txt")]);
        let config = ValidatorConfig::default().collect_all();

        assert!(matches!(
            ManifestValidator::from_config(&config).validate(&group),
            Err(Error::Integrity(_))
        ));
    }

    #[test]
    fn test_parallel_reports_first_mismatch_in_manifest_order() {
        let abc = digest_bytes(b"abc");
        let mut files = Vec::new();
        let mut records = Vec::new();
        for i in 0..32 {
            let name = format!("f{:02}.txt", i);
            // Entries 7 and 20 are corrupted
            let contents = if i == 7 || i == 20 { "xyz" } else { "abc" };
            records.push((abc.as_str().to_string(), format!("group-01/{}", name)));
            files.push((name, contents));
        }
        let file_refs: Vec<(&str, &str)> = files.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        let record_refs: Vec<(&str, &str)> = records.iter().map(|(d, p)| (d.as_str(), p.as_str())).collect();
        let (_root, group) = setup(&file_refs, &record_refs);

        let config = ValidatorConfig::default()
            .parallel()
            .with_worker_threads(4)
            .unwrap();
        match ManifestValidator::from_config(&config).validate(&group) {
            Err(Error::Integrity(mismatch)) => assert_eq!(mismatch.relative_path, "group-01/f07.txt"),
            other => panic!("Expected Integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_parallel_success() {
        let abc = digest_bytes(b"abc");
        let (_root, group) = setup(
            &[("a.txt", "abc"), ("b.txt", "")],
            &[(abc.as_str(), "group-01/a.txt"), (EMPTY_SHA1, "group-01/b.txt")],
        );
        let config = ValidatorConfig::default().parallel();

        let report = ManifestValidator::from_config(&config).validate(&group).unwrap();
        assert_eq!(report.files_checked, 2);
    }

    #[test]
    fn test_missing_manifest() {
        let root = tempfile::tempdir().unwrap();
        let group = root.path().join("group-01");
        fs::create_dir(&group).unwrap();

        match validate(&group) {
            Err(Error::ManifestMissing { path }) => assert_eq!(path, group.join("hash_list.txt")),
            other => panic!("Expected ManifestMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data_file_is_read_error() {
        let (_root, group) = setup(&[], &[(EMPTY_SHA1, "group-01/gone.txt")]);
        assert!(matches!(validate(&group), Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_custom_manifest_name() {
        let root = tempfile::tempdir().unwrap();
        let group = root.path().join("group-ab");
        fs::create_dir(&group).unwrap();
        fs::write(group.join("empty.txt"), b"").unwrap();
        fs::write(group.join("SHA1SUMS"), format!("{}  group-ab/empty.txt\n", EMPTY_SHA1)).unwrap();

        let config = ValidatorConfig::default().with_manifest_name("SHA1SUMS").unwrap();
        assert!(ManifestValidator::from_config(&config).validate(&group).is_ok());
        assert!(matches!(validate(&group), Err(Error::ManifestMissing { .. })));
    }
}

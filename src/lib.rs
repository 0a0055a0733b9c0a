/// Card Matcher - find and validate bank card numbers
///
/// This library spots candidate card numbers in free text and files, checks
/// them with the Luhn algorithm, and names the issuer of a single number from
/// its BIN prefix.

pub mod core;
pub mod error;
pub mod utils;

// Re-export main matcher types for convenience
pub use crate::core::issuer::{classify_issuer, Issuer};
pub use crate::core::matcher::{CardMatch, CardMatcher, ValidationReason, ValidationResult};
pub use crate::error::{FileError, ValidationError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate a single card number with default settings
pub fn validate_card(card_number: &str) -> ValidationResult {
    CardMatcher::default().validate_single(card_number)
}

/// Find card numbers in text with default settings
pub fn find_cards_in_text(text: &str) -> Vec<CardMatch> {
    CardMatcher::default().scan(text)
}

/// Find card numbers in a file with default settings
///
/// Returns no matches if the file cannot be read; the reason is logged.
pub fn find_cards_in_file<P: AsRef<std::path::Path>>(file_path: P) -> Vec<CardMatch> {
    CardMatcher::default().scan_file(file_path.as_ref())
}

/// Library configuration and utilities
pub mod config {
    use log::{error, info};
    use serde::{Deserialize, Serialize};
    use std::path::Path;

    /// Settings shared by the library and the command-line tool
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Config {
        pub log_level: String,
        pub log_file: String,
        /// Hide the middle digits of card numbers in output
        pub mask_numbers: bool,
        /// Files above this size (MB) are memory-mapped
        pub mmap_threshold_mb: usize,
        /// Files above this size (MB) are skipped by directory scans
        pub max_file_size_mb: usize,
        pub max_files: usize,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                log_level: "info".to_string(),
                log_file: "card_matcher.log".to_string(),
                mask_numbers: false,
                mmap_threshold_mb: 10,
                max_file_size_mb: 50,
                max_files: 1000,
            }
        }
    }

    const MB: usize = 1024 * 1024;

    impl Config {
        /// Memory-map threshold in bytes, saturating on oversized values
        pub fn mmap_threshold_bytes(&self) -> usize {
            self.mmap_threshold_mb.saturating_mul(MB)
        }

        /// Directory scan size limit in bytes, saturating on oversized values
        pub fn max_file_size_bytes(&self) -> u64 {
            (self.max_file_size_mb as u64).saturating_mul(MB as u64)
        }
    }

    /// Load configuration from a JSON file if provided
    ///
    /// A missing file or invalid JSON is logged and the defaults are used.
    pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match config_path {
            Some(path) => path,
            None => return Ok(Config::default()),
        };

        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return Ok(Config::default());
        }

        let config_str = std::fs::read_to_string(path)?;
        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                Ok(Config::default())
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_partial_config_keeps_defaults() {
            let dir = tempfile::tempdir().expect("temp dir");
            let path = dir.path().join("config.json");
            std::fs::write(&path, r#"{"mask_numbers": true, "max_files": 5}"#).expect("write");

            let config = load_config(Some(path.as_path())).expect("load");
            assert!(config.mask_numbers);
            assert_eq!(config.max_files, 5);
            assert_eq!(config.log_level, "info");
        }

        #[test]
        fn test_bad_config_falls_back() {
            let dir = tempfile::tempdir().expect("temp dir");
            let path = dir.path().join("config.json");
            std::fs::write(&path, "{not json").expect("write");

            assert_eq!(load_config(Some(path.as_path())).expect("load"), Config::default());
            assert_eq!(
                load_config(Some(dir.path().join("missing.json").as_path())).expect("load"),
                Config::default()
            );
            assert_eq!(load_config(None).expect("load"), Config::default());
        }

        #[test]
        fn test_oversized_limits_saturate() {
            let dir = tempfile::tempdir().expect("temp dir");
            let path = dir.path().join("config.json");
            std::fs::write(
                &path,
                r#"{"mmap_threshold_mb": 18446744073709551615, "max_file_size_mb": 18446744073709551615}"#,
            )
            .expect("write");

            let config = load_config(Some(path.as_path())).expect("load");
            assert_eq!(config.mmap_threshold_mb, usize::MAX);
            assert_eq!(config.mmap_threshold_bytes(), usize::MAX);
            assert_eq!(config.max_file_size_bytes(), u64::MAX);
            assert_eq!(Config::default().mmap_threshold_bytes(), 10 * 1024 * 1024);
        }
    }
}

/// Command-line application functionality
pub mod app {
    use crate::config::Config;
    use crate::core::matcher::{CardMatch, CardMatcher};
    use crate::error::FileError;
    use indicatif::ProgressBar;
    use rayon::prelude::*;
    use std::path::{Path, PathBuf};

    /// Outcome of scanning one file
    #[derive(Debug)]
    pub struct FileScan {
        pub path: PathBuf,
        pub result: Result<Vec<CardMatch>, FileError>,
    }

    /// Scan several files on a local thread pool
    ///
    /// Each file gets an independent scan; results come back in input order.
    ///
    /// # Arguments
    ///
    /// * `file_paths` - Paths to files to scan
    /// * `config` - Configuration options
    /// * `workers` - Number of worker threads (0 = one per logical CPU)
    /// * `progress` - Progress bar advanced once per finished file
    pub fn scan_files<P: AsRef<Path> + Sync>(
        file_paths: &[P],
        config: &Config,
        workers: usize,
        progress: Option<&ProgressBar>,
    ) -> anyhow::Result<Vec<FileScan>> {
        let matcher = CardMatcher::new(config);

        let num_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            workers
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;

        let scans = pool.install(|| {
            file_paths
                .par_iter()
                .map(|path| {
                    let scan = FileScan {
                        path: path.as_ref().to_path_buf(),
                        result: matcher.try_scan_file(path.as_ref()),
                    };
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    scan
                })
                .collect()
        });

        Ok(scans)
    }
}

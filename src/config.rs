//! Runtime settings shared by the pipeline and the CLI.

use std::path::PathBuf;

/// Location of the UCI auto-mpg dataset.
pub const DEFAULT_DATA_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/auto-mpg/auto-mpg.data";
pub const DEFAULT_RAW_CACHE: &str = "auto-mpg.data.txt";
pub const DEFAULT_CLEAN_FILE: &str = "auto-mpg.clean.txt";
pub const DEFAULT_LOG_FILE: &str = "autompg.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_url: String,
    pub raw_cache: PathBuf,
    pub clean_file: PathBuf,
    pub log_file: PathBuf,
}

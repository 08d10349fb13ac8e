use std::path::PathBuf;

use super::config::Config;

/// A discovered taskdeck workspace
#[derive(Debug)]
pub struct Workspace {
    /// Directory containing `.taskdeck/`
    pub root: PathBuf,
    /// Path to the `.taskdeck/` directory (holds config, blobs, lock, UI state)
    pub data_dir: PathBuf,
    /// Parsed config.toml
    pub config: Config,
}

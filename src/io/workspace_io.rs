use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;
use crate::model::workspace::Workspace;

/// Name of the data directory inside a workspace root
pub const DATA_DIR: &str = ".taskdeck";

/// Starter config written by `td init`
const CONFIG_TEMPLATE: &str = r#"# taskdeck configuration

[storage]
# Keys the task list and activity log are stored under (<key>.json)
tasks_key = "tasks"
activity_key = "activity"

[ui]
# light or dark
theme = "dark"
# Priority for tasks added without --priority: High, Medium, Low
default_priority = "Medium"

[reminders]
# Incomplete tasks due within this many minutes trigger a reminder
window_minutes = 60
"#;

/// Error type for workspace I/O operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a taskdeck workspace: no .taskdeck/ directory found (run `td init`)")]
    NotAWorkspace,
    #[error("already a taskdeck workspace: {0} (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Find the workspace root by walking up from `start`, looking for a
/// `.taskdeck/config.toml`.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join("config.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Load the workspace rooted at `root`.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(WorkspaceError::NotAWorkspace);
    }
    let config_path = data_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&config_text)?;

    Ok(Workspace {
        root: root.to_path_buf(),
        data_dir,
        config,
    })
}

/// Create `.taskdeck/` with a starter config under `root`.
pub fn init_workspace(root: &Path, force: bool) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join(DATA_DIR);
    let config_path = data_dir.join("config.toml");
    if config_path.exists() && !force {
        return Err(WorkspaceError::AlreadyExists(data_dir));
    }
    fs::create_dir_all(&data_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::debug!(path = %data_dir.display(), "initialized workspace");
    load_workspace(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Theme;
    use tempfile::TempDir;

    #[test]
    fn init_then_load() {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(tmp.path(), false).unwrap();
        assert_eq!(ws.data_dir, tmp.path().join(DATA_DIR));
        assert_eq!(ws.config.ui.theme, Theme::Dark);
        assert_eq!(ws.config.reminders.window_minutes, 60);
    }

    #[test]
    fn init_refuses_existing_without_force() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), false).unwrap();
        assert!(matches!(
            init_workspace(tmp.path(), false),
            Err(WorkspaceError::AlreadyExists(_))
        ));
        assert!(init_workspace(tmp.path(), true).is_ok());
    }

    #[test]
    fn discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), false).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_workspace(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn discover_fails_outside_workspace() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_workspace(tmp.path()),
            Err(WorkspaceError::NotAWorkspace)
        ));
    }

    #[test]
    fn bad_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(DATA_DIR)).unwrap();
        fs::write(tmp.path().join(DATA_DIR).join("config.toml"), "[ui\ntheme=").unwrap();
        assert!(matches!(
            load_workspace(tmp.path()),
            Err(WorkspaceError::ConfigParseError(_))
        ));
    }
}

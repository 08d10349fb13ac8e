use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::route::Route;
use crate::ops::view::ViewQuery;

/// Persisted view state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Last view opened with `td open`
    #[serde(default)]
    pub route: Route,
    /// Last filter/sort/search used by `td list`
    #[serde(default)]
    pub query: ViewQuery,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::view::{Filter, SortKey};
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            route: Route::Dashboard,
            query: ViewQuery {
                filter: Filter::Pending,
                sort: Some(SortKey::DueDate),
                search: "milk".into(),
            },
        };
        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded.route, Route::Dashboard);
        assert_eq!(loaded.query, state.query);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.route, Route::Tasks);
        assert_eq!(state.query, ViewQuery::default());
    }
}

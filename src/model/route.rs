use serde::{Deserialize, Serialize};

/// The views reachable by path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Tasks,
    Dashboard,
    Activity,
}

impl Route {
    /// Resolve a path like `/dashboard`. Unknown paths redirect to the task view.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim().trim_matches('/');
        match trimmed.to_ascii_lowercase().as_str() {
            "dashboard" => Route::Dashboard,
            "activity" => Route::Activity,
            _ => Route::Tasks,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Tasks => "/",
            Route::Dashboard => "/dashboard",
            Route::Activity => "/activity",
        }
    }
}

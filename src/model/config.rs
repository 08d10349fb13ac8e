use serde::{Deserialize, Serialize};

use super::task::Priority;

/// Configuration from `.taskdeck/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

/// Keys the state blobs are stored under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,
    #[serde(default = "default_activity_key")]
    pub activity_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            tasks_key: default_tasks_key(),
            activity_key: default_activity_key(),
        }
    }
}

fn default_tasks_key() -> String {
    "tasks".to_string()
}

fn default_activity_key() -> String {
    "activity".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("unknown theme '{}' (expected: light, dark)", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    /// Priority given to tasks added without one
    #[serde(default)]
    pub default_priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// How far ahead a due date triggers a reminder
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            window_minutes: default_window_minutes(),
        }
    }
}

fn default_window_minutes() -> i64 {
    60
}

impl ReminderConfig {
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.window_minutes.max(0)).unwrap_or(chrono::Duration::hours(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.tasks_key, "tasks");
        assert_eq!(config.storage.activity_key, "activity");
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.ui.default_priority, Priority::Medium);
        assert_eq!(config.reminders.window(), chrono::Duration::hours(1));
    }

    #[test]
    fn partial_config_overrides() {
        let config: Config = toml::from_str(
            r#"
[ui]
theme = "light"
default_priority = "Low"

[reminders]
window_minutes = 15
"#,
        )
        .unwrap();
        assert_eq!(config.ui.theme, Theme::Light);
        assert_eq!(config.ui.default_priority, Priority::Low);
        assert_eq!(config.reminders.window(), chrono::Duration::minutes(15));
        assert_eq!(config.storage.tasks_key, "tasks");
    }

    #[test]
    fn theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }
}

use crate::calc::gesture::GestureConfig;
use crate::calc::planner::PlannerOptions;
use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppSettings {
    /// Allow hand edits of the summary text.
    pub editable: bool,
    pub long_press_ms: u64,
    pub release_grace_ms: u64,
    /// Filter used when RUST_LOG is not set.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            editable: true,
            long_press_ms: 500,
            release_grace_ms: 50,
            log_level: "info".to_string(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsFile {
    #[serde(default)]
    pub(crate) settings: AppSettings,
}

impl Persistable for SettingsFile {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsFile::load()?.settings)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsFile::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsFile {
            settings: self.clone(),
        }
        .save_to(dir)
    }

    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            editable: self.editable,
            gesture: GestureConfig {
                long_press: Duration::from_millis(self.long_press_ms),
                release_grace: Duration::from_millis(self.release_grace_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_settings_default_values() {
        let settings = AppSettings::default();
        assert!(settings.editable);
        assert_eq!(settings.long_press_ms, 500);
        assert_eq!(settings.release_grace_ms, 50);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_planner_options_from_defaults() {
        let opts = AppSettings::default().planner_options();
        assert!(opts.editable);
        assert_eq!(opts.gesture, GestureConfig::default());
    }

    #[test]
    fn test_settings_file_missing_key_uses_default() {
        let file: SettingsFile = serde_norway::from_str("other: 1").unwrap();
        assert_eq!(file.settings, AppSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let yaml = "settings:\n  editable: false\n";
        let file: SettingsFile = serde_norway::from_str(yaml).unwrap();
        assert!(!file.settings.editable);
        assert_eq!(file.settings.long_press_ms, 500);
    }

    #[test]
    fn test_save_to_and_load_from() {
        let tmp = TempDir::new().unwrap();
        let settings = AppSettings {
            editable: false,
            long_press_ms: 700,
            release_grace_ms: 30,
            log_level: "debug".to_string(),
        };
        settings.save_to(tmp.path()).unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), settings);
    }

    #[test]
    fn test_load_from_empty_dir_is_default() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), AppSettings::default());
    }
}

//! Settings for a form directory.
//!
//! The settings file (`config.yml`) lives next to the component files and
//! configures naming of generated panes and placeholders and the preview
//! title.

use std::path::Path;

use serde::Deserialize;

use super::component::is_valid_id;

/// Configuration loaded from `<form dir>/config.yml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Name given to placeholder components of new empty groups.
    pub placeholder_name: String,
    /// Prefix of generated pane ids (`<prefix>-<ulid>`).
    pub pane_prefix: String,
    /// Heading of the form preview.
    pub title: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            placeholder_name: "Empty Group Placeholder".to_string(),
            pane_prefix: "pane".to_string(),
            title: "Form Builder".to_string(),
        }
    }
}

/// Errors that can occur when loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("setting '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("pane_prefix '{0}' may only use letters, digits, '-', '_' and '.'")]
    InvalidPanePrefix(String),
}

impl FormConfig {
    /// Load settings from a file path.
    ///
    /// Returns the default config if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(Self::default()),
            Ok(content) => {
                let config: FormConfig = serde_yaml::from_str(&content)?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SettingsError::Io(e)),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.placeholder_name.trim().is_empty() {
            return Err(SettingsError::EmptyField {
                field: "placeholder_name",
            });
        }
        if self.pane_prefix.is_empty() {
            return Err(SettingsError::EmptyField { field: "pane_prefix" });
        }
        if !is_valid_id(&self.pane_prefix) {
            return Err(SettingsError::InvalidPanePrefix(self.pane_prefix.clone()));
        }
        Ok(())
    }

    /// Contents written by `formpane init`.
    pub fn to_yaml(&self) -> String {
        format!(
            "placeholder_name: {:?}\npane_prefix: {:?}\ntitle: {:?}\n",
            self.placeholder_name, self.pane_prefix, self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.yml");

        let config = FormConfig::load(&path).unwrap();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        std::fs::write(&path, "pane_prefix: row\ntitle: Signup\n").unwrap();

        let config = FormConfig::load(&path).unwrap();
        assert_eq!(config.pane_prefix, "row");
        assert_eq!(config.title, "Signup");
        assert_eq!(config.placeholder_name, "Empty Group Placeholder");
    }

    #[test]
    fn test_load_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        std::fs::write(&path, "").unwrap();

        let config = FormConfig::load(&path).unwrap();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        std::fs::write(&path, "unknown_field: value\n").unwrap();

        let err = FormConfig::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_empty_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        std::fs::write(&path, "pane_prefix: \"\"\n").unwrap();

        let err = FormConfig::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::EmptyField { field: "pane_prefix" }));
    }

    #[test]
    fn test_validate_rejects_prefix_with_slash() {
        let config = FormConfig {
            pane_prefix: "a/b".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidPanePrefix(p)) if p == "a/b"
        ));
    }

    #[test]
    fn test_validate_rejects_prefix_unsafe_for_ids() {
        for prefix in ["row: 1", "#row", "..", "two words"] {
            let config = FormConfig {
                pane_prefix: prefix.to_string(),
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(SettingsError::InvalidPanePrefix(_))), "{}", prefix);
        }
    }

    #[test]
    fn test_to_yaml_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");
        let config = FormConfig {
            title: "Contact us: today".to_string(),
            ..Default::default()
        };

        std::fs::write(&path, config.to_yaml()).unwrap();
        assert_eq!(FormConfig::load(&path).unwrap(), config);
    }
}

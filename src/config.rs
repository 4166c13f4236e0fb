use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// User preferences persisted in `prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub language: Option<Language>,
  pub api_url: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "reel") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file) {
        return Self::parse(&content);
      }
    }
    Self::default()
  }

  /// Parse a prefs file; anything unreadable falls back to defaults.
  pub fn parse(content: &str) -> Self {
    toml::from_str(content).unwrap_or_default()
  }

  /// Preferences after a UI change. `api_url` stays as loaded, so a one-off
  /// `--api-url` never ends up in the file.
  pub fn with_choices(&self, theme_name: &str, language: Language) -> Self {
    Self { theme_name: Some(theme_name.to_string()), language: Some(language), api_url: self.api_url.clone() }
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "reel") {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }
}

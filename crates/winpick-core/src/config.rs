use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_TITLE_WIDTH: usize = 40;
const DEFAULT_END_MARKER: &str = "...";
const DEFAULT_BROWSER: &str = "firefox";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read error: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML parse error: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub source: SourceConfig,
    pub launch: LaunchConfig,
    pub browser: BrowserConfig,
    pub keymap: HashMap<String, String>,
    pub status: StatusConfig,
}

/// Title column width policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TitleWidthSetting")]
pub enum TitleWidth {
    /// Widest title of the batch being formatted.
    Auto,
    Fixed(usize),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TitleWidthSetting {
    Columns(usize),
    Keyword(String),
}

impl TryFrom<TitleWidthSetting> for TitleWidth {
    type Error = String;

    fn try_from(setting: TitleWidthSetting) -> Result<Self, Self::Error> {
        match setting {
            TitleWidthSetting::Columns(columns) => Ok(TitleWidth::Fixed(columns)),
            TitleWidthSetting::Keyword(keyword) if keyword.eq_ignore_ascii_case("auto") => {
                Ok(TitleWidth::Auto)
            }
            TitleWidthSetting::Keyword(other) => Err(format!(
                "invalid title_width \"{}\": expected \"auto\" or a column count",
                other
            )),
        }
    }
}

impl Default for TitleWidth {
    fn default() -> Self {
        TitleWidth::Fixed(DEFAULT_TITLE_WIDTH)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title_width: TitleWidth,
    pub end_marker: String,
    pub detail_mode: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title_width: TitleWidth::default(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            detail_mode: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub current_last: bool,
    pub exclude_classes: HashSet<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            current_last: true,
            exclude_classes: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LaunchConfig {
    pub programs: HashMap<String, String>,
}

impl LaunchConfig {
    /// Command line for `class_name`, falling back to the class name itself.
    pub fn program_for(&self, class_name: &str) -> String {
        let lowercase = class_name.to_lowercase();
        self.programs
            .iter()
            .find(|(class, _)| class.to_lowercase() == lowercase)
            .map(|(_, program)| program.clone())
            .unwrap_or_else(|| class_name.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub class: String,
    pub program: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        let program = std::env::var("BROWSER")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BROWSER.to_string());
        let class = program
            .split_whitespace()
            .next()
            .and_then(|executable| executable.rsplit('/').next())
            .unwrap_or(DEFAULT_BROWSER)
            .to_string();

        Self { class, program }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StatusConfig {
    pub notifications: bool,
    pub urgency: NotificationUrgency,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationUrgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("winpick")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();

        assert_eq!(config.display.title_width, TitleWidth::Fixed(40));
        assert_eq!(config.display.end_marker, "...");
        assert!(config.display.detail_mode);
        assert!(config.source.current_last);
        assert!(config.source.exclude_classes.is_empty());
        assert!(config.launch.programs.is_empty());
        assert!(config.keymap.is_empty());
        assert!(!config.status.notifications);
        assert_eq!(config.status.urgency, NotificationUrgency::Normal);
    }

    #[test]
    fn parse_auto_title_width() {
        let toml = r#"
            [display]
            title_width = "auto"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.display.title_width, TitleWidth::Auto);
        assert_eq!(config.display.end_marker, "...");
    }

    #[test]
    fn parse_fixed_title_width() {
        let toml = r#"
            [display]
            title_width = 24
            end_marker = "…"
            detail_mode = false
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.display.title_width, TitleWidth::Fixed(24));
        assert_eq!(config.display.end_marker, "…");
        assert!(!config.display.detail_mode);
    }

    #[test]
    fn invalid_title_width_keyword_is_rejected() {
        let toml = r#"
            [display]
            title_width = "wide"
        "#;

        let result: Result<Config, _> = toml::from_str(toml);

        assert!(result.is_err());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [source]
            current_last = false
            exclude_classes = ["Polybar", "tint2"]

            [launch.programs]
            Firefox = "firefox --new-window"

            [browser]
            class = "chromium"
            program = "chromium --incognito"

            [keymap]
            "C-k" = "kill"

            [status]
            notifications = true
            urgency = "critical"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert!(!config.source.current_last);
        assert!(config.source.exclude_classes.contains("Polybar"));
        assert!(config.source.exclude_classes.contains("tint2"));
        assert_eq!(
            config.launch.program_for("firefox"),
            "firefox --new-window"
        );
        assert_eq!(config.browser.class, "chromium");
        assert_eq!(config.browser.program, "chromium --incognito");
        assert_eq!(config.keymap.get("C-k").map(String::as_str), Some("kill"));
        assert!(config.status.notifications);
        assert_eq!(config.status.urgency, NotificationUrgency::Critical);
    }

    #[test]
    fn program_for_unknown_class_falls_back_to_class_name() {
        let config = LaunchConfig::default();

        assert_eq!(config.program_for("Emacs"), "Emacs");
    }
}

//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Stock defaults are
//! overridden by whatever keys the user's file sets; command-line flags
//! override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_root = "scenarioADay"   # year/month/day content tree
//! static_dir = "static"           # assets served under /static/
//! site_title = "Scenario a Day"   # index page title
//!
//! [highlight]
//! language = "python"             # every snippet is highlighted as this language
//! theme = "base16-ocean.dark"     # preferred bundled theme
//! fallback_theme = "InspiredGitHub"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [highlight]
//! theme = "Solarized (dark)"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Root of the `year/month/day` content tree.
    pub content_root: PathBuf,
    /// Static assets directory, copied to `<output>/static` and served under `/static/`.
    pub static_dir: PathBuf,
    /// Title shown on the index page.
    pub site_title: String,
    /// Code snippet highlighting settings.
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("scenarioADay"),
            static_dir: PathBuf::from("static"),
            site_title: "Scenario a Day".to_string(),
            highlight: HighlightConfig::default(),
        }
    }
}

/// Snippet highlighting settings.
///
/// The language is fixed for the whole site rather than inferred from the
/// snippet's file extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Syntax name, token or extension understood by the bundled syntax set.
    pub language: String,
    /// Preferred bundled theme.
    pub theme: String,
    /// Used when `theme` is not a bundled theme.
    pub fallback_theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            language: "python".to_string(),
            theme: "base16-ocean.dark".to_string(),
            fallback_theme: "InspiredGitHub".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate that required values are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "content_root must not be empty".into(),
            ));
        }
        if self.static_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("static_dir must not be empty".into()));
        }
        let highlight = [
            ("highlight.language", &self.highlight.language),
            ("highlight.theme", &self.highlight.theme),
            ("highlight.fallback_theme", &self.highlight.fallback_theme),
        ];
        for (key, value) in highlight {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Load config from the given `config.toml` path.
///
/// A missing file yields the stock defaults. A present file is parsed
/// sparsely on top of the defaults, rejects unknown keys, and is validated.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# scenarioaday configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Content tree: <content_root>/<year>/<month>/<day>/<name>.md + <name>.star
content_root = "scenarioADay"

# Static assets. Copied to <output>/static in build mode and served under
# /static/ in serve mode.
static_dir = "static"

# Title of the index page.
site_title = "Scenario a Day"

# ---------------------------------------------------------------------------
# Code highlighting
# ---------------------------------------------------------------------------
[highlight]
# Every snippet is highlighted as this language, whatever its extension.
language = "python"

# Preferred colour theme. Bundled themes: base16-ocean.dark,
# base16-eighties.dark, base16-mocha.dark, base16-ocean.light,
# InspiredGitHub, Solarized (dark), Solarized (light).
theme = "base16-ocean.dark"

# Used when `theme` is not one of the bundled themes.
fallback_theme = "InspiredGitHub"
"##
}

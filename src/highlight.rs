//! Code snippet highlighting.
//!
//! Every snippet on the site is highlighted as one configured language — the
//! snippet's file extension is never consulted. Output carries inline
//! `style` attributes so pages need no extra stylesheet.

use crate::config::HighlightConfig;
use log::warn;
use std::sync::OnceLock;
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::{SyntaxReference, SyntaxSet},
};
use thiserror::Error;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("unknown highlight language: {0}")]
    UnknownLanguage(String),
    #[error("unknown highlight theme: {0}")]
    UnknownTheme(String),
    #[error("highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

/// A resolved language + theme pair.
///
/// Resolution happens once at startup; [`Highlighter::format`] is then a
/// pure function of the snippet text and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct Highlighter {
    syntax: &'static SyntaxReference,
    theme: &'static Theme,
    theme_name: String,
}

impl Highlighter {
    /// Resolve the configured language and theme.
    ///
    /// An unknown language is an error. An unknown preferred theme falls
    /// back to `fallback_theme` with a warning; only an unknown fallback
    /// is an error.
    pub fn new(config: &HighlightConfig) -> Result<Self, HighlightError> {
        let ss = syntax_set();
        let syntax = ss
            .find_syntax_by_token(&config.language)
            .or_else(|| ss.find_syntax_by_name(&config.language))
            .ok_or_else(|| HighlightError::UnknownLanguage(config.language.clone()))?;

        let themes = &theme_set().themes;
        let (theme_name, theme) = match themes.get(&config.theme) {
            Some(theme) => (config.theme.clone(), theme),
            None => {
                warn!(
                    "theme '{}' not found, falling back to '{}'",
                    config.theme, config.fallback_theme
                );
                let theme = themes
                    .get(&config.fallback_theme)
                    .ok_or_else(|| HighlightError::UnknownTheme(config.fallback_theme.clone()))?;
                (config.fallback_theme.clone(), theme)
            }
        };

        Ok(Self {
            syntax,
            theme,
            theme_name,
        })
    }

    /// Name of the syntax every snippet is highlighted with.
    pub fn language(&self) -> &str {
        &self.syntax.name
    }

    /// Name of the theme actually in use (after any fallback).
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Highlight a snippet into a `<pre>` block with inline styles.
    pub fn format(&self, code: &str) -> Result<String, HighlightError> {
        Ok(highlighted_html_for_string(
            code,
            syntax_set(),
            self.syntax,
            self.theme,
        )?)
    }
}

//! The resolved site both delivery modes render from.

use crate::config::SiteConfig;
use crate::highlight::{HighlightError, Highlighter};
use crate::render::{self, Page, RenderError};
use crate::scan::{self, ScanError};
use crate::types::Entry;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Paths, title and highlighter shared by export and serve.
///
/// Holds no entries: every build or request walks the content root afresh.
#[derive(Debug, Clone)]
pub struct Site {
    content_root: PathBuf,
    static_dir: PathBuf,
    title: String,
    highlighter: Highlighter,
}

impl Site {
    pub fn from_config(config: &SiteConfig) -> Result<Self, HighlightError> {
        let highlighter = Highlighter::new(&config.highlight)?;
        info!(
            "highlighting snippets as {} with theme {}",
            highlighter.language(),
            highlighter.theme_name()
        );
        Ok(Self {
            content_root: config.content_root.clone(),
            static_dir: config.static_dir.clone(),
            title: config.site_title.clone(),
            highlighter,
        })
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Walk the content root and assemble every entry.
    pub fn entries(&self) -> Result<Vec<Entry>, ScanError> {
        scan::assemble_all(&self.content_root, &self.highlighter)
    }

    /// Render the index page for `entries` into `sink`.
    pub fn write_index(&self, entries: &[Entry], sink: &mut impl Write) -> Result<(), RenderError> {
        let page = Page::Index {
            site_title: &self.title,
            entries,
        };
        render::assemble(&page, sink)
    }
}

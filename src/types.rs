//! Shared types used by the scan, render and delivery stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fields read from the metadata block at the top of a content file.
///
/// Every field except `url` is optional and defaults to empty. `date` is
/// kept exactly as written; it is displayed, never parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
    pub date: String,
    pub description: String,
    /// Route in serve mode and output path (relative to the output root) in build mode.
    pub url: String,
    pub tags: Vec<String>,
}

/// One fully assembled entry: metadata, rendered markdown, the paired code
/// snippet and the finished entry page.
///
/// Built fresh for every build or request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub date: String,
    pub description: String,
    pub url: String,
    pub tags: Vec<String>,
    /// Markdown body rendered to HTML.
    pub content: String,
    /// Raw code snippet.
    pub code: String,
    /// Snippet highlighted to HTML with inline styles.
    pub formatted_code: String,
    /// Complete entry page, byte-identical in both delivery modes.
    pub page: String,
    /// Metadata file path relative to the content root.
    pub source: PathBuf,
}

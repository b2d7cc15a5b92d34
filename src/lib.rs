//! # scenarioaday
//!
//! Renders a dated archive of scenarios into a website. Each scenario is a
//! markdown description with a metadata block plus a paired code snippet,
//! filed under `year/month/day` directories.
//!
//! # Architecture: One Pipeline, Two Delivery Modes
//!
//! ```text
//! content/ ──scan──▶ Vec<Entry> ──render──▶ HTML ──┬─▶ export: _site/ on disk
//!                                                   └─▶ serve:  HTTP responses
//! ```
//!
//! Both modes call [`scan::assemble_all`] and the same [`render`] functions,
//! so an exported file and the matching HTTP response are byte-identical.
//! Nothing is cached: a build walks the tree once, the server walks it on
//! every request.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks `year/month/day`, pairs `.md` with `.star`, assembles entries |
//! | [`frontmatter`] | Splits a content file into its metadata block and markdown body |
//! | [`highlight`] | Highlights snippets with one fixed language and theme (syntect) |
//! | [`render`] | Markdown rendering and the index/entry page templates (Maud) |
//! | [`site`] | Resolved paths, title and highlighter shared by both modes |
//! | [`export`] | Static export to an output directory, including static assets |
//! | [`serve`] | Live HTTP server (tiny_http) |
//! | [`config`] | `config.toml` loading and validation |
//! | [`types`] | `Metadata` and `Entry` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Best-Effort Entries, Fatal Directories
//!
//! A single broken entry (bad metadata block, missing snippet, highlighting
//! failure) is dropped with a warning so one typo never takes the site down.
//! An unreadable directory, a failed template write or a failed asset copy
//! aborts the whole build or request.
//!
//! ## Maud Over Template Engines
//!
//! Pages are compile-time Maud templates: malformed HTML is a build error
//! and every interpolated value is escaped, except the two fragments that
//! are already HTML (rendered markdown and highlighted code).

pub mod config;
pub mod export;
pub mod frontmatter;
pub mod highlight;
pub mod output;
pub mod render;
pub mod scan;
pub mod serve;
pub mod site;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

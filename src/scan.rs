//! Content discovery and entry assembly.
//!
//! ## Directory Structure
//!
//! Content lives exactly three directory levels below the root:
//!
//! ```text
//! scenarioADay/                    # Content root
//! ├── 2024/                        # Year
//! │   ├── 01/                      # Month
//! │   │   ├── 15/                  # Day
//! │   │   │   ├── retry.md         # Metadata block + markdown description
//! │   │   │   └── retry.star       # Paired code snippet
//! │   │   └── 16/
//! │   │       ├── cache.md
//! │   │       └── cache.star
//! │   └── 02/
//! │       └── ...
//! └── 2025/
//!     └── ...
//! ```
//!
//! Every `*.md` file in a day directory is a candidate; its snippet is the
//! sibling with the same stem and a `.star` suffix. Files beside the year,
//! month or day directories, and anything nested below a day directory, are
//! ignored.
//!
//! ## Ordering
//!
//! Entries come out in traversal order with every level sorted by file
//! name. Dates are never parsed, so this is the only ordering.
//!
//! ## Failure Policy
//!
//! - A candidate whose metadata, snippet, highlighting or page render fails
//!   is dropped and logged; the walk continues.
//! - A file slot in a day directory that cannot be resolved, or whose name
//!   is not UTF-8, is dropped and logged.
//! - A directory that cannot be read fails the whole walk.

use crate::frontmatter::{self, FrontMatterError};
use crate::highlight::{HighlightError, Highlighter};
use crate::render::{self, Page, RenderError};
use crate::types::Entry;
use log::warn;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const METADATA_SUFFIX: &str = ".md";
pub const CODE_SUFFIX: &str = ".star";

/// Depth of entry files below the root: year / month / day / file.
const ENTRY_DEPTH: usize = 4;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Why a single candidate was dropped.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad metadata: {0}")]
    FrontMatter(#[from] FrontMatterError),
    #[error("cannot highlight code: {0}")]
    Highlight(#[from] HighlightError),
    #[error("cannot render page: {0}")]
    Render(#[from] RenderError),
}

/// Discover and assemble every entry under `root`.
///
/// This is the single pipeline both delivery modes run. Candidates that
/// fail to assemble are logged and skipped, as are entries whose url was
/// already claimed by an earlier entry.
pub fn assemble_all(root: &Path, highlighter: &Highlighter) -> Result<Vec<Entry>, ScanError> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut urls = HashSet::new();

    for candidate in find_candidates(root)? {
        let source = candidate
            .strip_prefix(root)
            .unwrap_or(candidate.as_path())
            .to_path_buf();
        match assemble_entry(&candidate, source, highlighter) {
            Ok(entry) => {
                if urls.insert(entry.url.clone()) {
                    entries.push(entry);
                } else {
                    warn!(
                        "skipping {}: url {} is already used by an earlier entry",
                        candidate.display(),
                        entry.url
                    );
                }
            }
            Err(err) => warn!("skipping {}: {err}", candidate.display()),
        }
    }

    Ok(entries)
}

/// List candidate metadata files in traversal order.
///
/// A directory that cannot be read fails the walk. A file slot that cannot
/// be resolved (a dangling symlink, say) is logged and skipped.
pub fn find_candidates(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut candidates = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(ENTRY_DEPTH)
        .max_depth(ENTRY_DEPTH)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == ENTRY_DEPTH && err.path().is_some() => {
                warn!("skipping {err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let name = entry.file_name();
        if !entry.file_type().is_file()
            || !name.as_encoded_bytes().ends_with(METADATA_SUFFIX.as_bytes())
        {
            continue;
        }
        if name.to_str().is_none() {
            warn!("skipping {}: file name is not valid UTF-8", entry.path().display());
            continue;
        }
        candidates.push(entry.into_path());
    }

    Ok(candidates)
}

/// Path of the snippet paired with a metadata file: same directory, the
/// metadata suffix swapped for the code suffix.
pub fn code_path(metadata_path: &Path) -> Option<PathBuf> {
    let name = metadata_path.file_name()?.to_str()?;
    let stem = name.strip_suffix(METADATA_SUFFIX)?;
    Some(metadata_path.with_file_name(format!("{stem}{CODE_SUFFIX}")))
}

/// Assemble one entry from its metadata file and paired snippet.
///
/// `source` is recorded on the entry for reporting only.
pub fn assemble_entry(
    metadata_path: &Path,
    source: PathBuf,
    highlighter: &Highlighter,
) -> Result<Entry, EntryError> {
    let raw = fs::read(metadata_path).map_err(|source| EntryError::Read {
        path: metadata_path.to_path_buf(),
        source,
    })?;
    let (metadata, body) = frontmatter::parse(&raw)?;

    let code_path = code_path(metadata_path).ok_or_else(|| EntryError::Read {
        path: metadata_path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a metadata file"),
    })?;
    let code = fs::read_to_string(&code_path).map_err(|source| EntryError::Read {
        path: code_path.clone(),
        source,
    })?;
    let formatted_code = highlighter.format(&code)?;

    let mut entry = Entry {
        title: metadata.title,
        date: metadata.date,
        description: metadata.description,
        url: metadata.url,
        tags: metadata.tags,
        content: render::render_markdown(body),
        code,
        formatted_code,
        page: String::new(),
        source,
    };

    let mut page = Vec::new();
    render::assemble(&Page::Entry(&entry), &mut page)?;
    entry.page = String::from_utf8_lossy(&page).into_owned();

    Ok(entry)
}

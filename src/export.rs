//! Static export.
//!
//! Renders the whole site to disk once:
//!
//! ```text
//! _site/
//! ├── index.html                     # Every entry, traversal order
//! ├── scenarioaday/
//! │   └── 2024/01/demo               # One file per entry, named by its url
//! └── static/                        # Mirror of the assets directory
//!     ├── style.css
//!     └── ...
//! ```
//!
//! Entry pages are written to exactly `<output>/<url>` so the exported tree
//! answers the same paths the live server does. Any failure aborts the
//! export; there is no resume.

use crate::render::RenderError;
use crate::scan::ScanError;
use crate::site::Site;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Static copy error: {0}")]
    Copy(#[from] walkdir::Error),
}

/// What an export wrote, for CLI reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Path of the written index page.
    pub index: PathBuf,
    pub pages: Vec<ExportedPage>,
    /// Regular files copied into `<output>/static` (symlinks not counted).
    pub static_files: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    pub title: String,
    pub date: String,
    /// Metadata file relative to the content root.
    pub source: PathBuf,
    /// Written file relative to the output directory.
    pub output: PathBuf,
}

/// Build the site into `output_dir`.
pub fn export(site: &Site, output_dir: &Path) -> Result<ExportSummary, ExportError> {
    let entries = site.entries()?;

    fs::create_dir_all(output_dir)?;

    let index = output_dir.join("index.html");
    let mut sink = BufWriter::new(File::create(&index)?);
    site.write_index(&entries, &mut sink)?;
    sink.flush()?;
    info!("wrote {}", index.display());

    let mut pages = Vec::with_capacity(entries.len());
    for entry in &entries {
        let relative = PathBuf::from(entry.url.trim_start_matches('/'));
        let path = output_dir.join(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, entry.page.as_bytes())?;
        pages.push(ExportedPage {
            title: entry.title.clone(),
            date: entry.date.clone(),
            source: entry.source.clone(),
            output: relative,
        });
    }
    info!("wrote {} entry pages", pages.len());

    let static_files = copy_static_tree(site.static_dir(), &output_dir.join("static"))?;
    info!(
        "copied {} static files from {}",
        static_files,
        site.static_dir().display()
    );

    Ok(ExportSummary {
        index,
        pages,
        static_files,
    })
}

/// Recursively copy `src` into `dst`, keeping file modes, recreating
/// symbolic links rather than following them, and on Unix keeping owner
/// and group. Returns the number of regular files copied.
///
/// Contents are copied before their directory's mode is applied, so
/// read-only source directories still copy.
pub fn copy_static_tree(src: &Path, dst: &Path) -> Result<usize, ExportError> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;

    for entry in WalkDir::new(src)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }

        let metadata = entry.metadata()?;
        if !file_type.is_symlink() {
            fs::set_permissions(&target, metadata.permissions())?;
        }
        copy_ownership(&metadata, &target)?;
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    let link = fs::read_link(src)?;
    if fs::symlink_metadata(dst).is_ok() {
        fs::remove_file(dst)?;
    }
    std::os::unix::fs::symlink(link, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}

#[cfg(unix)]
fn copy_ownership(metadata: &fs::Metadata, dst: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::MetadataExt;
    std::os::unix::fs::lchown(dst, Some(metadata.uid()), Some(metadata.gid()))
}

#[cfg(not(unix))]
fn copy_ownership(_metadata: &fs::Metadata, _dst: &Path) -> std::io::Result<()> {
    Ok(())
}

//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = fixture_site(tmp.path());
//! let entries = site.entries().unwrap();
//!
//! let demo = find_entry(&entries, "/scenarioaday/2024/01/demo");
//! assert_eq!(demo.title, "Demo");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::site::Site;
use crate::types::Entry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` (content tree and static assets) to a temp directory.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// A site rooted at a fixture copy made by [`setup_fixtures`].
pub fn fixture_site(root: &Path) -> Site {
    let config = SiteConfig {
        content_root: root.join("content"),
        static_dir: root.join("static"),
        ..SiteConfig::default()
    };
    Site::from_config(&config).unwrap()
}

/// Write `<stem>.md` with a minimal metadata block and its `<stem>.star`
/// snippet, creating parent directories.
pub fn write_entry(root: &Path, stem: &str, url: &str, code: &str) {
    let md = root.join(format!("{stem}.md"));
    fs::create_dir_all(md.parent().unwrap()).unwrap();
    let name = Path::new(stem).file_name().unwrap().to_string_lossy();
    fs::write(
        &md,
        format!("---\ntitle: \"{name}\"\nurl: \"{url}\"\n---\nAbout {name}.\n"),
    )
    .unwrap();
    fs::write(root.join(format!("{stem}.star")), code).unwrap();
}

// =========================================================================
// Entry lookups — panics with a clear message on miss
// =========================================================================

/// Find an entry by url. Panics if not found.
pub fn find_entry<'a>(entries: &'a [Entry], url: &str) -> &'a Entry {
    entries.iter().find(|e| e.url == url).unwrap_or_else(|| {
        let urls = entry_urls(entries);
        panic!("entry '{url}' not found. Available: {urls:?}")
    })
}

/// All entry titles in order.
pub fn entry_titles(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.title.as_str()).collect()
}

/// All entry urls in order.
pub fn entry_urls(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.url.as_str()).collect()
}

//! CLI output formatting.
//!
//! Output is information-first: each exported entry leads with its
//! positional index and title, and the files behind it follow as indented
//! context lines.
//!
//! ```text
//! Home → index.html
//! 001 Demo → scenarioaday/2024/01/demo
//!     Date: 2024-01-15
//!     Source: 2024/01/15/post.md
//! 002 Retry with backoff → scenarioaday/2024/01/retry
//!     Date: 2024-01-15
//!     Source: 2024/01/15/retry.md
//!
//! Static: 12 files → static/
//!
//! Exported 2 entries to _site
//! ```
//!
//! Each `format_*` function is pure and returns lines for testability; the
//! `print_*` wrapper writes them to stdout.

use crate::export::ExportSummary;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format the result of a static export.
pub fn format_export_output(summary: &ExportSummary, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    let index = summary
        .index
        .strip_prefix(output_dir)
        .unwrap_or(summary.index.as_path());
    lines.push(format!("Home → {}", index.display()));

    for (i, page) in summary.pages.iter().enumerate() {
        let title = if page.title.is_empty() {
            "(untitled)"
        } else {
            page.title.as_str()
        };
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            title,
            page.output.display()
        ));
        if !page.date.is_empty() {
            lines.push(format!("{}Date: {}", indent(1), page.date));
        }
        lines.push(format!("{}Source: {}", indent(1), page.source.display()));
    }

    lines.push(String::new());
    lines.push(format!(
        "Static: {} → static/",
        plural(summary.static_files, "file", "files")
    ));

    lines.push(String::new());
    lines.push(format!(
        "Exported {} to {}",
        plural(summary.pages.len(), "entry", "entries"),
        output_dir.display()
    ));

    lines
}

pub fn print_export_output(summary: &ExportSummary, output_dir: &Path) {
    for line in format_export_output(summary, output_dir) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportedPage;
    use std::path::PathBuf;

    fn summary() -> ExportSummary {
        ExportSummary {
            index: PathBuf::from("_site/index.html"),
            pages: vec![
                ExportedPage {
                    title: "Demo".to_string(),
                    date: "2024-01-15".to_string(),
                    source: PathBuf::from("2024/01/15/post.md"),
                    output: PathBuf::from("scenarioaday/2024/01/demo"),
                },
                ExportedPage {
                    title: String::new(),
                    date: String::new(),
                    source: PathBuf::from("2024/01/16/x.md"),
                    output: PathBuf::from("scenarioaday/x"),
                },
            ],
            static_files: 1,
        }
    }

    #[test]
    fn export_output_lists_entries() {
        let lines = format_export_output(&summary(), Path::new("_site"));
        assert_eq!(lines[0], "Home → index.html");
        assert_eq!(lines[1], "001 Demo → scenarioaday/2024/01/demo");
        assert_eq!(lines[2], "    Date: 2024-01-15");
        assert_eq!(lines[3], "    Source: 2024/01/15/post.md");
    }

    #[test]
    fn untitled_entry_without_date() {
        let lines = format_export_output(&summary(), Path::new("_site"));
        assert_eq!(lines[4], "002 (untitled) → scenarioaday/x");
        assert_eq!(lines[5], "    Source: 2024/01/16/x.md");
    }

    #[test]
    fn export_output_totals() {
        let lines = format_export_output(&summary(), Path::new("_site"));
        assert!(lines.contains(&"Static: 1 file → static/".to_string()));
        assert_eq!(lines.last().unwrap(), "Exported 2 entries to _site");
    }

    #[test]
    fn empty_export() {
        let empty = ExportSummary {
            index: PathBuf::from("out/index.html"),
            pages: vec![],
            static_files: 0,
        };
        let lines = format_export_output(&empty, Path::new("out"));
        assert_eq!(lines.last().unwrap(), "Exported 0 entries to out");
    }
}

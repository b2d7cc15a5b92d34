//! Markdown rendering and page assembly.
//!
//! ## Pages
//!
//! - **Index** (`/`): every entry in traversal order, linking to its url
//! - **Entry** (`<entry.url>`): title, date, tags, rendered description and
//!   the highlighted snippet
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping; the two
//! pre-rendered fragments (markdown body and highlighted code) are the only
//! values inserted unescaped.
//!
//! Both delivery modes go through [`assemble`], so an exported file and the
//! matching HTTP response body are byte-identical.

use crate::types::Entry;
use log::debug;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error writing page: {0}")]
    Io(#[from] std::io::Error),
}

/// A page template together with the data bound into it.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    /// The site index, bound to the full entry list.
    Index {
        site_title: &'a str,
        entries: &'a [Entry],
    },
    /// A single entry page.
    Entry(&'a Entry),
}

impl Page<'_> {
    /// Template identifier, used in log lines.
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Index { .. } => "index",
            Page::Entry(_) => "entry",
        }
    }

    pub fn render(&self) -> Markup {
        match *self {
            Page::Index {
                site_title,
                entries,
            } => render_index(site_title, entries),
            Page::Entry(entry) => render_entry(entry),
        }
    }
}

/// Render `page` and write the finished document to `sink`.
///
/// Bytes already written are not rolled back if the sink fails part way.
pub fn assemble(page: &Page<'_>, sink: &mut impl Write) -> Result<(), RenderError> {
    debug!("rendering {} page", page.template_name());
    sink.write_all(page.render().into_string().as_bytes())?;
    Ok(())
}

/// Convert markdown to an HTML fragment with the default CommonMark rules.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/style.css";
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li.tag { (tag) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index(site_title: &str, entries: &[Entry]) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (site_title) }
        }
        main.index-page {
            @if entries.is_empty() {
                p.empty { "Nothing published yet." }
            } @else {
                ol.entry-list {
                    @for entry in entries {
                        li.entry-card {
                            time { (entry.date) }
                            a href=(entry.url) { (entry.title) }
                            @if !entry.description.is_empty() {
                                p.entry-description { (entry.description) }
                            }
                            (tag_list(&entry.tags))
                        }
                    }
                }
            }
        }
    };

    base_document(site_title, "index", content)
}

fn render_entry(entry: &Entry) -> Markup {
    let content = html! {
        header.site-header {
            nav.breadcrumb {
                a href="/" { "All scenarios" }
            }
        }
        main.entry-page {
            article {
                header.entry-header {
                    h1 { (entry.title) }
                    time { (entry.date) }
                    @if !entry.description.is_empty() {
                        p.entry-description { (entry.description) }
                    }
                    (tag_list(&entry.tags))
                }
                section.entry-content {
                    (PreEscaped(&entry.content))
                }
                section.entry-code {
                    (PreEscaped(&entry.formatted_code))
                }
            }
        }
    };

    base_document(&entry.title, "entry", content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_entry() -> Entry {
        Entry {
            title: "Demo".to_string(),
            date: "2024-01-15".to_string(),
            description: "A short demo".to_string(),
            url: "/scenarioaday/2024/01/demo".to_string(),
            tags: vec!["http".to_string(), "retry".to_string()],
            content: "<p>Hello <strong>world</strong></p>\n".to_string(),
            code: "print(\"hi\")\n".to_string(),
            formatted_code: "<pre style=\"color:#fff;\">print</pre>".to_string(),
            page: String::new(),
            source: PathBuf::from("2024/01/15/demo.md"),
        }
    }

    #[test]
    fn markdown_converts_to_html() {
        let html = render_markdown("# Title\n\nThis is **bold** and *italic*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn markdown_uses_no_extensions() {
        // Tables are an extension; without it the pipes stay as text.
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn entry_page_embeds_fragments_verbatim() {
        let entry = sample_entry();
        let html = Page::Entry(&entry).render().into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Demo</title>"));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
        assert!(html.contains("<pre style=\"color:#fff;\">print</pre>"));
        assert!(html.contains("2024-01-15"));
        assert!(html.contains("<li class=\"tag\">retry</li>"));
    }

    #[test]
    fn entry_page_without_tags_has_no_tag_list() {
        let mut entry = sample_entry();
        entry.tags.clear();
        let html = Page::Entry(&entry).render().into_string();
        assert!(!html.contains("class=\"tags\""));
    }

    #[test]
    fn index_lists_entries_in_given_order() {
        let first = sample_entry();
        let mut second = sample_entry();
        second.title = "Second".to_string();
        second.url = "/scenarioaday/2024/02/second".to_string();
        let entries = vec![first, second];

        let html = Page::Index {
            site_title: "Scenario a Day",
            entries: &entries,
        }
        .render()
        .into_string();

        let a = html.find("href=\"/scenarioaday/2024/01/demo\"").unwrap();
        let b = html.find("href=\"/scenarioaday/2024/02/second\"").unwrap();
        assert!(a < b);
        assert!(html.contains("<h1>Scenario a Day</h1>"));
    }

    #[test]
    fn empty_index_renders() {
        let html = Page::Index {
            site_title: "Empty",
            entries: &[],
        }
        .render()
        .into_string();
        assert!(html.contains("Nothing published yet."));
        assert!(!html.contains("entry-card"));
    }

    #[test]
    fn metadata_is_escaped() {
        let mut entry = sample_entry();
        entry.title = "<script>alert('xss')</script>".to_string();
        let html = Page::Entry(&entry).render().into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn assemble_writes_rendered_page() {
        let entry = sample_entry();
        let page = Page::Entry(&entry);
        let mut sink = Vec::new();
        assemble(&page, &mut sink).unwrap();
        assert_eq!(sink, page.render().into_string().into_bytes());
        assert_eq!(page.template_name(), "entry");
    }

    #[test]
    fn index_page_names_its_template() {
        let page = Page::Index {
            site_title: "Scenario a Day",
            entries: &[],
        };
        assert_eq!(page.template_name(), "index");
    }
}

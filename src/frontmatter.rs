//! Metadata block extraction.
//!
//! A content file starts with a metadata block followed by a free-form
//! markdown body:
//!
//! ```text
//! ---
//! title: "Retry with backoff"
//! date: "2024-01-15"
//! description: "Polling a flaky endpoint"
//! url: "/scenarioaday/2024/01/retry"
//! tags: [http, retry]
//! ---
//! The markdown body starts here.
//! ```
//!
//! `---` fences a YAML block and `+++` a TOML block. The opening fence must
//! be the first line and the block ends at the next line holding only the
//! same fence (a YAML block may also close with `...`). The first line inside
//! the block must not be blank. Everything after the closing fence is
//! returned untouched as the body.

use crate::types::Metadata;
use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("no metadata block (expected `---` or `+++` on the first line)")]
    Missing,
    #[error("metadata block opened with `{0}` is empty or never closed")]
    Unterminated(&'static str),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("metadata has no url")]
    MissingUrl,
    #[error("invalid url {0:?}: must be an absolute path to a file")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn fence(self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
        }
    }
}

impl From<MetadataBlockKind> for Format {
    fn from(kind: MetadataBlockKind) -> Self {
        match kind {
            MetadataBlockKind::YamlStyle => Format::Yaml,
            MetadataBlockKind::PlusesStyle => Format::Toml,
        }
    }
}

/// Split raw file bytes into parsed metadata and the markdown body.
pub fn parse(raw: &[u8]) -> Result<(Metadata, &str), FrontMatterError> {
    let content = std::str::from_utf8(raw)?;
    let (format, block, body) = split(content)?;
    let metadata = match format {
        Format::Yaml => parse_yaml(&block)?,
        Format::Toml => parse_toml(&block)?,
    };
    validate_url(&metadata.url)?;
    Ok((metadata, body))
}

/// Locate the fenced block with pulldown-cmark's metadata-block events.
/// Returns the format, the block text between the fences, and the
/// remainder after the closing fence line.
fn split(content: &str) -> Result<(Format, String, &str), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let options = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
        | Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS;

    let mut events = Parser::new_ext(content, options).into_offset_iter();
    let format = match events.next() {
        Some((Event::Start(Tag::MetadataBlock(kind)), range)) if range.start == 0 => {
            Format::from(kind)
        }
        _ => return Err(opening_error(content)),
    };

    let mut block = String::new();
    for (event, range) in events {
        match event {
            Event::Text(text) => block.push_str(&text),
            Event::End(TagEnd::MetadataBlock(_)) => {
                let rest = &content[range.end..];
                let body = rest
                    .strip_prefix("\r\n")
                    .or_else(|| rest.strip_prefix('\n'))
                    .unwrap_or(rest);
                return Ok((format, block, body));
            }
            _ => {}
        }
    }
    Err(FrontMatterError::Unterminated(format.fence()))
}

/// No block was recognised: tell an opened-but-broken block apart from a
/// file with no block at all.
fn opening_error(content: &str) -> FrontMatterError {
    let first = content.lines().next().unwrap_or_default().trim_end();
    match first {
        "---" => FrontMatterError::Unterminated(Format::Yaml.fence()),
        "+++" => FrontMatterError::Unterminated(Format::Toml.fence()),
        _ => FrontMatterError::Missing,
    }
}

fn parse_yaml(block: &str) -> Result<Metadata, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(Metadata::default());
    }
    Ok(serde_yaml::from_str(block)?)
}

fn parse_toml(block: &str) -> Result<Metadata, FrontMatterError> {
    let mut table: toml::Table = toml::from_str(block)?;
    // Dates stay opaque text, so a bare TOML datetime is kept as written.
    if let Some(toml::Value::Datetime(date)) = table.get("date") {
        let text = date.to_string();
        table.insert("date".to_string(), toml::Value::String(text));
    }
    Ok(toml::Value::Table(table).try_into()?)
}

/// A url doubles as an output path, so it must name a file below the
/// output root.
fn validate_url(url: &str) -> Result<(), FrontMatterError> {
    if url.is_empty() {
        return Err(FrontMatterError::MissingUrl);
    }
    let Some(relative) = url.strip_prefix('/') else {
        return Err(FrontMatterError::InvalidUrl(url.to_string()));
    };
    let plain = relative
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if !plain || url.contains('\\') {
        return Err(FrontMatterError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "---\ntitle: \"Demo\"\ndate: 2024-01-15\ndescription: A demo\nurl: \"/scenarioaday/2024/01/demo\"\ntags: [http, retry]\n---\n# Heading\n\nBody text.\n";

    #[test]
    fn parses_yaml_block_and_body() {
        let (meta, body) = parse(DEMO.as_bytes()).unwrap();
        assert_eq!(meta.title, "Demo");
        assert_eq!(meta.date, "2024-01-15");
        assert_eq!(meta.description, "A demo");
        assert_eq!(meta.url, "/scenarioaday/2024/01/demo");
        assert_eq!(meta.tags, vec!["http", "retry"]);
        assert_eq!(body, "# Heading\n\nBody text.\n");
    }

    #[test]
    fn parses_toml_block_with_bare_date() {
        let src = "+++\ntitle = \"Demo\"\ndate = 2024-01-15\nurl = \"/scenarioaday/2024/01/demo\"\n+++\nBody\n";
        let (meta, body) = parse(src.as_bytes()).unwrap();
        assert_eq!(meta.title, "Demo");
        assert_eq!(meta.date, "2024-01-15");
        assert!(meta.tags.is_empty());
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let src = "---\nurl: /scenarioaday/x\n---\n";
        let (meta, body) = parse(src.as_bytes()).unwrap();
        assert_eq!(meta.title, "");
        assert_eq!(meta.date, "");
        assert!(meta.tags.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn accepts_crlf_and_bom() {
        let src = "\u{feff}---\r\nurl: /scenarioaday/x\r\ntitle: T\r\n---\r\nBody\r\n";
        let (meta, body) = parse(src.as_bytes()).unwrap();
        assert_eq!(meta.title, "T");
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn body_keeps_later_fences() {
        let src = "---\nurl: /a\n---\nintro\n---\nmore\n";
        let (_, body) = parse(src.as_bytes()).unwrap();
        assert_eq!(body, "intro\n---\nmore\n");
    }

    #[test]
    fn missing_block_is_error() {
        let result = parse(b"# Just markdown\n");
        assert!(matches!(result, Err(FrontMatterError::Missing)));
    }

    #[test]
    fn unterminated_block_is_error() {
        let result = parse(b"---\ntitle: x\nurl: /a\n");
        assert!(matches!(result, Err(FrontMatterError::Unterminated("---"))));
    }

    #[test]
    fn malformed_yaml_is_error() {
        let result = parse(b"---\ntitle: [unclosed\nurl: /a\n---\n");
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn non_utf8_is_error() {
        let result = parse(&[b'-', b'-', b'-', b'\n', 0xff, 0xfe]);
        assert!(matches!(result, Err(FrontMatterError::Utf8(_))));
    }

    #[test]
    fn empty_block_is_error() {
        let result = parse(b"---\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::Unterminated("---"))));
    }

    #[test]
    fn block_without_url_is_error() {
        let result = parse(b"---\ntitle: Demo\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::MissingUrl)));
    }

    #[test]
    fn unterminated_toml_block_is_error() {
        let result = parse(b"+++\ntitle = \"x\"\n");
        assert!(matches!(result, Err(FrontMatterError::Unterminated("+++"))));
    }

    #[test]
    fn yaml_block_may_close_with_dots() {
        let (meta, body) = parse(b"---\nurl: /a\n...\nBody\n").unwrap();
        assert_eq!(meta.url, "/a");
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn closing_fence_at_end_of_file() {
        let (meta, body) = parse(b"---\nurl: /a\n---").unwrap();
        assert_eq!(meta.url, "/a");
        assert_eq!(body, "");
    }

    #[test]
    fn rejects_urls_that_are_not_file_paths() {
        for url in ["relative/path", "/", "/dir/", "//etc/passwd", "/a/../../etc/passwd", "/a/./b"] {
            let src = format!("---\nurl: \"{url}\"\n---\n");
            let result = parse(src.as_bytes());
            assert!(
                matches!(result, Err(FrontMatterError::InvalidUrl(_))),
                "url {url:?} should be rejected"
            );
        }
    }
}

//! `llms.txt` index parsing (spec §4.3).
//!
//! Turns the mixed-format lines of an index file into a normalized
//! sequence of [`RawDocument`] descriptors. A parse failure on a single
//! line is logged and that line is skipped; the parse as a whole never
//! aborts.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::types::{Category, DocVersion, RawDocument};
use crate::urlutil;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"));
static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid regex"));
static VERSION_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/v(\d)/").expect("valid regex"));

const CATEGORY_TAGS: &[&str] = &[
    "blog",
    "codes",
    "guides",
    "resources",
    "reference",
    "sdk",
    "legacy",
];

/// Parses the full text body of an `llms.txt` file into document
/// descriptors.
///
/// `index_url` is used as the resolution base for relative links.
/// Malformed or irrelevant lines are skipped with a warning rather than
/// aborting the parse.
#[must_use]
pub fn parse(body: &str, index_url: &str) -> Vec<RawDocument> {
    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.starts_with('#') || trimmed.starts_with("//") {
                return None;
            }
            match parse_line(trimmed, index_url) {
                Ok(doc) => doc,
                Err(reason) => {
                    warn!(line = %trimmed, %reason, "skipping unparsable llms.txt line");
                    None
                },
            }
        })
        .collect()
}

fn parse_line(line: &str, index_url: &str) -> Result<Option<RawDocument>, String> {
    let has_markdown_link = MARKDOWN_LINK.is_match(line);
    let has_url_token = BARE_URL.is_match(line);
    let has_relative_token = line.split_whitespace().any(|tok| tok.starts_with('/'));
    if !has_markdown_link && !has_url_token && !has_relative_token {
        return Ok(None);
    }

    let bracket_title = MARKDOWN_LINK.captures(line).map(|c| c[1].to_string());
    let extracted_link = if let Some(caps) = MARKDOWN_LINK.captures(line) {
        caps[2].to_string()
    } else if let Some(m) = BARE_URL.find(line) {
        m.as_str().to_string()
    } else {
        return Ok(None);
    };

    let link = urlutil::resolve(&extracted_link, index_url)
        .map_err(|e| format!("link resolution failed: {e}"))?;

    let title = derive_title(bracket_title.as_deref(), &link);
    let description = derive_description(line, bracket_title.is_some(), &extracted_link);
    let version = derive_version(&link, title.as_str());
    let category = derive_category(&link);

    Ok(Some(RawDocument {
        raw_line: line.to_string(),
        title,
        link,
        version,
        description,
        category,
    }))
}

fn derive_title(bracket_title: Option<&str>, link: &str) -> String {
    if let Some(t) = bracket_title {
        if !t.trim().is_empty() {
            return t.trim().to_string();
        }
    }
    if let Ok(url) = url::Url::parse(link) {
        let last_segment = url
            .path_segments()
            .and_then(|mut segs| segs.next_back())
            .filter(|s| !s.is_empty());
        if let Some(seg) = last_segment {
            return seg.to_string();
        }
        if let Some(host) = url.host_str() {
            return host.to_string();
        }
    }
    link.to_string()
}

fn derive_description(line: &str, had_bracket_title: bool, extracted_link: &str) -> String {
    let raw = if had_bracket_title {
        if let Some(colon_pos) = find_close_paren_colon(line) {
            &line[colon_pos + 1..]
        } else if let Some(paren_pos) = line.find(')') {
            &line[paren_pos + 1..]
        } else {
            ""
        }
    } else if let Some(pos) = line.find(extracted_link) {
        &line[pos + extracted_link.len()..]
    } else {
        ""
    };

    raw.trim_start_matches([':', '-', '–', '—'])
        .trim()
        .to_string()
}

/// Finds the position of a `):` sequence immediately after a markdown
/// link's closing paren.
fn find_close_paren_colon(line: &str) -> Option<usize> {
    let paren = line.find(')')?;
    if line[paren + 1..].starts_with(':') {
        Some(paren + 1)
    } else {
        None
    }
}

fn derive_version(link: &str, title: &str) -> Option<DocVersion> {
    if let Some(caps) = VERSION_PATH.captures(link) {
        return match &caps[1] {
            "1" => Some(DocVersion::V1),
            "2" => Some(DocVersion::V2),
            _ => None,
        };
    }

    if let Ok(url) = url::Url::parse(link) {
        let path = url.path();
        if path.contains("sdk") || path.contains("guides") {
            return Some(DocVersion::V1);
        }
    }

    let lower_title = title.to_lowercase();
    if lower_title.contains("version 1") {
        Some(DocVersion::V1)
    } else if lower_title.contains("version 2") {
        Some(DocVersion::V2)
    } else {
        None
    }
}

fn derive_category(link: &str) -> Category {
    let Ok(url) = url::Url::parse(link) else {
        return Category::Unknown;
    };
    let first_segment = url
        .path_segments()
        .and_then(|mut segs| segs.next())
        .filter(|s| !s.is_empty());
    match first_segment {
        Some(seg) if CATEGORY_TAGS.contains(&seg) => Category::from_path_segment(seg),
        _ => Category::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_markdown_style_line() {
        let line = "[Widget](https://docs.example.com/guides/widget): Payment widget";
        let docs = parse(line, "https://docs.example.com/llms.txt");
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.title, "Widget");
        assert_eq!(doc.link, "https://docs.example.com/guides/widget");
        assert_eq!(doc.category, Category::Guides);
        assert_eq!(doc.version, Some(DocVersion::V1));
        assert_eq!(doc.description, "Payment widget");
    }

    #[test]
    fn drops_blank_and_comment_lines() {
        let body = "\n# a comment\n// also a comment\n   \n";
        assert!(parse(body, "https://example.com/llms.txt").is_empty());
    }

    #[test]
    fn drops_lines_with_no_url_or_path_token() {
        let body = "just some prose with no link at all";
        assert!(parse(body, "https://example.com/llms.txt").is_empty());
    }

    #[test]
    fn resolves_relative_links_against_index_base() {
        let body = "/providers/openai Provider docs";
        let docs = parse(body, "https://ai-sdk.dev/llms.txt");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].link, "https://ai-sdk.dev/providers/openai");
    }

    #[test]
    fn bracketed_relative_link_is_recognized() {
        let body = "[Widget](/guides/widget): Payment widget";
        let docs = parse(body, "https://docs.example.com/llms.txt");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].link, "https://docs.example.com/guides/widget");
        assert_eq!(docs[0].title, "Widget");
    }

    #[test]
    fn bare_url_line_uses_trailing_text_as_description() {
        let body = "https://docs.example.com/reference/widget Widget reference";
        let docs = parse(body, "https://docs.example.com/llms.txt");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].category, Category::Reference);
        assert_eq!(docs[0].description, "Widget reference");
    }

    #[test]
    fn unrecognized_category_segment_is_unknown() {
        let body = "[Page](https://docs.example.com/misc/page) A page";
        let docs = parse(body, "https://docs.example.com/llms.txt");
        assert_eq!(docs[0].category, Category::Unknown);
    }

    #[test]
    fn single_malformed_line_does_not_abort_the_whole_parse() {
        let body = "\
[Widget](https://docs.example.com/guides/widget): Payment widget
not a url and not a path either
[Other](https://docs.example.com/reference/other): Other docs";
        let docs = parse(body, "https://docs.example.com/llms.txt");
        assert_eq!(docs.len(), 2);
    }
}

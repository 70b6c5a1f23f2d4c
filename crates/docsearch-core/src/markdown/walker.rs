//! AST walk and per-node-type handlers (spec §4.4 steps 2-6).
//!
//! `pulldown-cmark` yields a flat stream of open/close events rather than an
//! owned tree, so nested inline content (link and list-item text) is
//! collected with a small stack of string accumulators instead of
//! recursion. Heading, paragraph, code, and table events are handled
//! directly against the shared fragment buffer.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::table::TableBuilder;
use crate::heading;
use crate::token;
use crate::types::EnhancedChunk;

const MAX_HEADING_DEPTH: u8 = 4;

/// An inline accumulation frame: content collected between a node's start
/// and end event before being formatted as that node's value.
enum Frame {
    Heading(u8, String),
    Link(String),
    Item(String),
    CodeBlock(Option<String>, String),
    TableCell(String),
}

/// Walks `body`'s CommonMark/GFM event stream, emitting [`EnhancedChunk`]s
/// in document order. `title` seeds the initial header stack.
#[must_use]
pub fn walk(title: &str, body: &str) -> Vec<EnhancedChunk> {
    let parser = Parser::new_ext(body, Options::ENABLE_TABLES);

    let mut chunks = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut header_stack: Vec<String> = vec![title.to_string()];
    let mut pending_header_stack = header_stack.clone();

    let mut stack: Vec<Frame> = Vec::new();
    let mut table: Option<TableBuilder> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                stack.push(Frame::Heading(heading_depth(level), String::new()));
            },
            Event::End(TagEnd::Heading(level)) => {
                let Some(Frame::Heading(depth, text)) = stack.pop() else {
                    continue;
                };
                debug_assert_eq!(depth, heading_depth(level));
                let cleaned = heading::clean_text(&text);
                let value = format!("\n\n{} {}\n", "#".repeat(depth as usize), cleaned);

                if depth <= MAX_HEADING_DEPTH {
                    flush(&mut buffer, &pending_header_stack, &mut chunks);
                    update_header_stack(&mut header_stack, depth, &cleaned);
                    pending_header_stack = header_stack.clone();
                    buffer.push(value);
                } else {
                    push_value(&mut stack, &mut buffer, value);
                }
            },

            Event::Start(Tag::Paragraph) => {},
            Event::End(TagEnd::Paragraph) => {
                push_value(&mut stack, &mut buffer, "\n".to_string());
            },

            Event::Start(Tag::Link { .. }) => {
                stack.push(Frame::Link(String::new()));
            },
            Event::End(TagEnd::Link) => {
                if let Some(Frame::Link(text)) = stack.pop() {
                    push_value(&mut stack, &mut buffer, text);
                }
            },

            Event::Start(Tag::Item) => {
                stack.push(Frame::Item(String::new()));
            },
            Event::End(TagEnd::Item) => {
                if let Some(Frame::Item(text)) = stack.pop() {
                    let value = format!("\n\n* {}\n", text.trim());
                    push_value(&mut stack, &mut buffer, value);
                }
            },

            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                stack.push(Frame::CodeBlock(lang, String::new()));
            },
            Event::End(TagEnd::CodeBlock) => {
                if let Some(Frame::CodeBlock(lang, text)) = stack.pop() {
                    let value = format!(
                        "\n\n```{}\n{}```\n",
                        lang.unwrap_or_default(),
                        ensure_trailing_newline(&text)
                    );
                    push_value(&mut stack, &mut buffer, value);
                }
            },

            Event::Start(Tag::Table(_)) => {
                table = Some(TableBuilder::new());
            },
            Event::Start(Tag::TableCell) => {
                stack.push(Frame::TableCell(String::new()));
            },
            Event::End(TagEnd::TableCell) => {
                if let Some(Frame::TableCell(text)) = stack.pop() {
                    if let Some(builder) = table.as_mut() {
                        builder.push_cell(text);
                    }
                }
            },
            Event::End(TagEnd::TableRow | TagEnd::TableHead) => {
                if let Some(builder) = table.as_mut() {
                    builder.end_row();
                }
            },
            Event::End(TagEnd::Table) => {
                if let Some(builder) = table.take() {
                    let rendered = builder.render();
                    if !rendered.is_empty() {
                        buffer.push(format!("\n\n{rendered}\n"));
                    }
                }
            },

            Event::Text(text) => {
                push_value(&mut stack, &mut buffer, text.to_string());
            },
            Event::Code(text) => {
                push_value(&mut stack, &mut buffer, format!("`{text}`"));
            },

            _ => {},
        }
    }

    flush(&mut buffer, &pending_header_stack, &mut chunks);
    chunks
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Applies the header-stack algorithm (spec §4.4): pop while `|stack| >=
/// depth`, pad with empty entries up to `depth`, set the final slot, and
/// truncate to exactly `depth` entries.
fn update_header_stack(header_stack: &mut Vec<String>, depth: u8, cleaned: &str) {
    let depth = depth as usize;
    while header_stack.len() >= depth {
        header_stack.pop();
    }
    while header_stack.len() < depth {
        header_stack.push(String::new());
    }
    header_stack[depth - 1] = cleaned.to_string();
    header_stack.truncate(depth);
}

/// Appends `value` to the innermost open accumulator frame, or to the
/// top-level fragment buffer when no frame is open.
fn push_value(stack: &mut [Frame], buffer: &mut Vec<String>, value: String) {
    match stack.last_mut() {
        Some(Frame::Heading(_, text) | Frame::Link(text) | Frame::Item(text) | Frame::TableCell(text)) => {
            text.push_str(&value);
        },
        Some(Frame::CodeBlock(_, text)) => text.push_str(&value),
        None => buffer.push(value),
    }
}

fn ensure_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

/// Joins buffered fragments, trims, and — if non-empty — emits an
/// [`EnhancedChunk`] carrying a snapshot of `header_stack`.
fn flush(buffer: &mut Vec<String>, header_stack: &[String], chunks: &mut Vec<EnhancedChunk>) {
    let content = buffer.join(" ");
    buffer.clear();
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return;
    }
    chunks.push(EnhancedChunk {
        content: trimmed.to_string(),
        header_stack: header_stack.to_vec(),
        estimated_tokens: token::estimate(trimmed),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flushes_a_chunk_at_each_heading_and_at_eof() {
        let markdown = "# A\n\nIntro.\n\n## B\n\nBody.\n";
        let chunks = walk("No Title", markdown);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].header_stack, vec!["A".to_string()]);
    }

    #[test]
    fn header_stack_transition_matches_concrete_scenario() {
        let markdown = "# A\n\nx\n\n## B\n\ny\n\n### C\n\nz\n\n## D\n\nw\n";
        let chunks = walk("No Title", markdown);
        let last = chunks.last().unwrap();
        assert_eq!(last.header_stack, vec!["A".to_string(), "D".to_string()]);
    }

    #[test]
    fn heading_past_max_depth_does_not_mutate_stack_but_still_emits_text() {
        let markdown = "# A\n\n##### Too Deep\n\nbody text\n";
        let chunks = walk("No Title", markdown);
        let chunk = chunks.last().unwrap();
        assert_eq!(chunk.header_stack, vec!["A".to_string()]);
        assert!(chunk.content.contains("Too Deep"));
    }

    #[test]
    fn inline_code_is_backtick_wrapped() {
        let markdown = "Use `cargo build` to compile.\n";
        let chunks = walk("No Title", markdown);
        assert!(chunks[0].content.contains("`cargo build`"));
    }

    #[test]
    fn fenced_code_block_is_reemitted_with_language() {
        let markdown = "```rust\nfn main() {}\n```\n";
        let chunks = walk("No Title", markdown);
        assert!(chunks[0].content.contains("```rust"));
        assert!(chunks[0].content.contains("fn main() {}"));
    }

    #[test]
    fn list_items_are_prefixed_with_an_asterisk() {
        let markdown = "- first\n- second\n";
        let chunks = walk("No Title", markdown);
        assert!(chunks[0].content.contains("* first"));
        assert!(chunks[0].content.contains("* second"));
    }

    #[test]
    fn link_text_is_kept_and_url_is_dropped() {
        let markdown = "See [the guide](https://example.com/guide) for details.\n";
        let chunks = walk("No Title", markdown);
        assert!(chunks[0].content.contains("the guide"));
        assert!(!chunks[0].content.contains("https://example.com"));
    }

    #[test]
    fn table_is_rendered_as_a_pipe_table() {
        let markdown = "| A | B |\n| --- | --- |\n| 1 | 2 |\n";
        let chunks = walk("No Title", markdown);
        assert!(chunks[0].content.contains('|'));
        assert!(chunks[0].content.contains('1'));
    }

    #[test]
    fn estimated_tokens_are_computed_eagerly() {
        let markdown = "# A\n\nSome body text.\n";
        let chunks = walk("No Title", markdown);
        for chunk in &chunks {
            assert_eq!(chunk.estimated_tokens, token::estimate(&chunk.content));
        }
    }
}

use regex::Regex;

/// One renderable slice of a model response. Responses are rendered as plain
/// text with code spans pulled out; nothing is ever interpreted as markup.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentSegment {
    Text(String),
    InlineCode(String),
    CodeBlock { language: String, code: String },
}

/// Split a response into text and code segments, earliest match first.
pub fn parse_message_content(content: &str) -> Vec<ContentSegment> {
    let mut segments = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        match next_code_span(rest) {
            Some((start, end, segment)) => {
                if start > 0 {
                    segments.push(ContentSegment::Text(rest[..start].to_string()));
                }
                segments.push(segment);
                rest = &rest[end..];
            }
            None => {
                segments.push(ContentSegment::Text(rest.to_string()));
                break;
            }
        }
    }

    segments
}

/// Earliest code span in `text`, preferring a fenced block over an inline
/// span when both begin at the same backtick.
fn next_code_span(text: &str) -> Option<(usize, usize, ContentSegment)> {
    let block = Regex::new(r"```(\w*)\n([\s\S]*?)\n```")
        .ok()?
        .captures(text)
        .map(|captures| {
            let all = captures.get(0);
            (
                all.map(|m| m.start()).unwrap_or(0),
                all.map(|m| m.end()).unwrap_or(0),
                ContentSegment::CodeBlock {
                    language: captures.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
                    code: captures.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
                },
            )
        });

    let inline = Regex::new(r"`([^`]+)`")
        .ok()?
        .captures(text)
        .map(|captures| {
            let all = captures.get(0);
            (
                all.map(|m| m.start()).unwrap_or(0),
                all.map(|m| m.end()).unwrap_or(0),
                ContentSegment::InlineCode(
                    captures.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
                ),
            )
        });

    match (block, inline) {
        (Some(block), Some(inline)) => {
            if block.0 <= inline.0 {
                Some(block)
            } else {
                Some(inline)
            }
        }
        (block, inline) => block.or(inline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(
            parse_message_content("just words"),
            vec![ContentSegment::Text("just words".to_string())]
        );
    }

    #[test]
    fn test_inline_code_split() {
        assert_eq!(
            parse_message_content("use `cargo run` here"),
            vec![
                ContentSegment::Text("use ".to_string()),
                ContentSegment::InlineCode("cargo run".to_string()),
                ContentSegment::Text(" here".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_block_with_language() {
        let segments = parse_message_content("intro\n```rust\nfn main() {}\n```\noutro");
        assert_eq!(
            segments,
            vec![
                ContentSegment::Text("intro\n".to_string()),
                ContentSegment::CodeBlock {
                    language: "rust".to_string(),
                    code: "fn main() {}".to_string(),
                },
                ContentSegment::Text("\noutro".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_wins_over_inline_at_same_position() {
        let segments = parse_message_content("```\ncode `inner`\n```");
        assert_eq!(
            segments,
            vec![ContentSegment::CodeBlock {
                language: String::new(),
                code: "code `inner`".to_string(),
            }]
        );
    }
}

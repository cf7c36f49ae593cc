// src/storage/archive.rs

//! Content archive codecs.
//!
//! The archive holds one JSON record per line, so each line is a complete
//! block and a damaged line costs only that record. The legacy marker format
//! (`=== URL: ...` / `=== END ===`) is still readable for one-time import.

use serde::{Deserialize, Serialize};

use crate::models::ContentMap;

/// Start marker of a legacy block; the URL follows on the same line.
const LEGACY_BEGIN: &str = "=== URL: ";
/// End marker of a legacy block.
const LEGACY_END: &str = "=== END ===";

#[derive(Debug, Serialize, Deserialize)]
struct ArchiveRecord {
    url: String,
    content: String,
}

/// Result of decoding an archive.
#[derive(Debug, Default)]
pub struct Decoded {
    pub contents: ContentMap,
    /// 1-based line numbers that could not be parsed
    pub skipped_lines: Vec<usize>,
}

/// Serialize all contents, one record per line.
pub fn encode(contents: &ContentMap) -> serde_json::Result<String> {
    let mut out = String::new();
    for (url, content) in contents {
        let record = ArchiveRecord {
            url: url.clone(),
            content: content.clone(),
        };
        out.push_str(&serde_json::to_string(&record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Parse the line-record format. Later records win for a repeated URL.
pub fn decode(text: &str) -> Decoded {
    let mut decoded = Decoded::default();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ArchiveRecord>(line) {
            Ok(record) => {
                decoded.contents.insert(record.url, record.content);
            }
            Err(_) => decoded.skipped_lines.push(idx + 1),
        }
    }
    decoded
}

/// Parse the legacy marker format.
///
/// A block opened by a start marker runs until the end marker or the next
/// start marker; an unterminated trailing block is kept. Block text is
/// trimmed and lines outside any block are ignored.
pub fn decode_legacy(text: &str) -> ContentMap {
    let mut contents = ContentMap::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(url) = line.strip_prefix(LEGACY_BEGIN) {
            if let Some((url, lines)) = current.take() {
                contents.insert(url, join_block(&lines));
            }
            current = Some((url.trim().to_string(), Vec::new()));
        } else if line.starts_with(LEGACY_END) {
            if let Some((url, lines)) = current.take() {
                contents.insert(url, join_block(&lines));
            }
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line.trim_end());
        }
    }

    if let Some((url, lines)) = current {
        contents.insert(url, join_block(&lines));
    }
    contents
}

fn join_block(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_one_line_per_record() {
        let mut contents = ContentMap::new();
        contents.insert("https://a.example.com/".into(), "Line one\nLine two".into());
        contents.insert("https://b.example.com/".into(), "Other".into());

        let text = encode(&contents).unwrap();
        assert_eq!(text.lines().count(), 2);

        let decoded = decode(&text);
        assert_eq!(decoded.contents, contents);
        assert!(decoded.skipped_lines.is_empty());
    }

    #[test]
    fn test_decode_skips_damaged_lines() {
        let text = concat!(
            r#"{"url":"https://a.example.com/","content":"alpha"}"#,
            "\n",
            "garbage line\n",
            "\n",
            r#"{"url":"https://b.example.com/","content":"beta"}"#,
            "\n",
            r#"{"url":"https://c.example.com/","cont"#,
        );

        let decoded = decode(text);
        assert_eq!(decoded.contents.len(), 2);
        assert_eq!(decoded.contents["https://b.example.com/"], "beta");
        assert_eq!(decoded.skipped_lines, vec![2, 5]);
    }

    #[test]
    fn test_decode_last_record_wins() {
        let text = concat!(
            r#"{"url":"https://a.example.com/","content":"old"}"#,
            "\n",
            r#"{"url":"https://a.example.com/","content":"new"}"#,
            "\n",
        );
        assert_eq!(decode(text).contents["https://a.example.com/"], "new");
    }

    #[test]
    fn test_decode_legacy_blocks() {
        let text = "=== URL: https://a.example.com/\n\
                    Heading alpha one\n\
                    Heading alpha two\n\
                    === END ===\n\
                    \n\
                    === URL: https://b.example.com/\n\
                    Heading beta\n\
                    === END ===\n\n";

        let contents = decode_legacy(text);
        assert_eq!(contents.len(), 2);
        assert_eq!(
            contents["https://a.example.com/"],
            "Heading alpha one\nHeading alpha two"
        );
        assert_eq!(contents["https://b.example.com/"], "Heading beta");
    }

    #[test]
    fn test_decode_legacy_recovers_unterminated_blocks() {
        let text = "stray line\n\
                    === URL: https://a.example.com/\n\
                    Alpha\n\
                    === URL: https://b.example.com/\n\
                    Beta heading\n";

        let contents = decode_legacy(text);
        assert_eq!(contents["https://a.example.com/"], "Alpha");
        assert_eq!(contents["https://b.example.com/"], "Beta heading");
    }
}

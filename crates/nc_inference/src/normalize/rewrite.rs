use lazy_static::lazy_static;
use nc_core::RewriteResult;
use regex::Regex;
use tracing::debug;

use super::patterns::{BLANK_LINES, EMPHASIS, HEADER, HSPACE};
use crate::fallback::fallback_rewrite;
use crate::relevance::contains_refusal;

const MIN_REWRITE_CHARS: usize = 50;

lazy_static! {
    static ref PREAMBLES: Vec<Regex> = [
        r"(?i)^(?:sure|okay|ok|certainly|of course|absolutely)\b[^\n]*\n+",
        r"(?i)^here(?:'s| is) (?:a |an |the |my |your )?[^\n:]{0,60}(?:rewrite|rewritten|version|take|explanation|summary)[^\n:]*:\s*",
        r"(?i)^in (?:simple|plain|other) (?:terms|words|english)\s*[:,]\s*",
        r"(?i)^(?:friendly|simple|simplified|conversational) (?:rewrite|version)\s*:\s*",
        r"(?i)^rewritten (?:article|version|text)\s*:\s*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

/// Cleans a model rewrite, falling back to a local rewrite of `original`
/// when the output is empty, a refusal, or too short to be useful.
pub fn normalize_rewrite(raw: &str, original: &str) -> RewriteResult {
    let content = clean_rewrite(raw);

    if content.is_empty() || contains_refusal(&content) || content.chars().count() < MIN_REWRITE_CHARS {
        debug!("Rewrite output unusable ({} chars), using fallback rewrite", content.chars().count());
        return fallback_rewrite(original);
    }

    RewriteResult { content }
}

fn clean_rewrite(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = EMPHASIS.replace_all(&text, "");
    let mut text = HEADER.replace_all(&text, "").trim().to_string();

    // Preambles can be stacked ("Sure!\nHere's a friendly rewrite:")
    loop {
        let stripped = PREAMBLES
            .iter()
            .find(|re| re.is_match(&text))
            .map(|re| re.replace(&text, "").trim().to_string());
        match stripped {
            Some(next) if next != text => text = next,
            _ => break,
        }
    }

    let lines: Vec<String> = text
        .lines()
        .map(|line| HSPACE.replace_all(line.trim(), " ").into_owned())
        .collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

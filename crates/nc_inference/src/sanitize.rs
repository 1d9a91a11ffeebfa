use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

/// Longest article excerpt sent along with a summary request.
pub const SUMMARY_MAX_CHARS: usize = 2000;
/// Longest article excerpt sent along with a rewrite request.
pub const REWRITE_MAX_CHARS: usize = 3000;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r#"[^\p{L}\p{N}\s.,!?;:'"()%$/\-]"#).unwrap();
    static ref MARKDOWN_CHARS: Regex = Regex::new(r"[*_#`~>|]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Cleans raw article text before it goes into a prompt.
///
/// Tags are dropped (text nodes only, script/style skipped), characters outside
/// the safe punctuation set and markdown control characters are removed,
/// whitespace is collapsed and the result is cut to `max_chars` characters.
/// Running it twice gives the same result as running it once.
pub fn clean_article_text(text: &str, max_chars: usize) -> String {
    let text = strip_html(text);
    let text = normalize_typography(&text);
    let text = UNSAFE_CHARS.replace_all(&text, "");
    let text = MARKDOWN_CHARS.replace_all(&text, "");
    let text = collapse_whitespace(&text);
    truncate_chars(&text, max_chars)
}

pub fn strip_html(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    let mut parts: Vec<&str> = Vec::new();
    for node in fragment.tree.root().descendants() {
        if let Some(text) = node.value().as_text() {
            let in_script = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .map(|el| matches!(el.name(), "script" | "style"))
                .unwrap_or(false);
            if !in_script {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}

/// Maps typographic quotes and dashes onto their ASCII counterparts.
fn normalize_typography(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201F}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{00A0}' => ' ',
            c => c,
        })
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Splits text into trimmed, non-empty sentences on `.`, `!` and `?`.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c| c == '.' || c == '!' || c == '?')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// First sentence longer than `min_chars`, terminated with a period.
pub fn first_sentence(text: &str, min_chars: usize) -> Option<String> {
    sentences(text)
        .find(|s| s.chars().count() > min_chars)
        .map(|s| format!("{}.", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_scripts() {
        let cleaned = clean_article_text(
            "<p>Prices <b>rose</b> sharply.</p><script>alert('x')</script><p>Markets fell.</p>",
            SUMMARY_MAX_CHARS,
        );
        assert_eq!(cleaned, "Prices rose sharply. Markets fell.");
    }

    #[test]
    fn test_removes_markdown_and_unsafe_chars() {
        let cleaned = clean_article_text("## **Breaking**: _rates_ up `now` @ 5% {json} [link]", 100);
        assert_eq!(cleaned, "Breaking: rates up now 5% json link");
    }

    #[test]
    fn test_typography_is_normalized() {
        let cleaned = clean_article_text("It\u{2019}s a \u{201C}big\u{201D} day\u{2014}really", 100);
        assert_eq!(cleaned, "It's a \"big\" day-really");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let cleaned = clean_article_text("ééééé ééééé", 7);
        assert_eq!(cleaned, "ééééé é");
        assert_eq!(clean_article_text("abc def", 4), "abc");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let inputs = [
            "<div>Hello &amp; <i>welcome</i> &lt;back&gt;</div>\n\n  to   the *show*",
            "Plain text. With sentences! And questions?",
            "&nbsp;&nbsp;Spaced&nbsp;out",
            "Tabs\tand\nnewlines\r\nmixed ~~strike~~ | pipes > quotes",
            "",
        ];
        for input in inputs {
            let once = clean_article_text(input, 40);
            let twice = clean_article_text(&once, 40);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("Short. Scientists discover new species! More text.", 15),
            Some("Scientists discover new species.".to_string())
        );
        assert_eq!(first_sentence("Tiny. Also tiny.", 15), None);
    }
}

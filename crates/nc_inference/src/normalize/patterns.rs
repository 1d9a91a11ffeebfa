use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub(super) static ref CODE_FENCE: Regex = Regex::new(r"```[A-Za-z0-9_-]*").unwrap();
    pub(super) static ref HEADER: Regex = Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*").unwrap();
    pub(super) static ref LIST_DASH: Regex = Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap();
    pub(super) static ref EMPHASIS: Regex = Regex::new(r"\*+|_+|`+|~~").unwrap();
    pub(super) static ref BULLET_GLYPHS: Regex = Regex::new(r"[•▸►◦▪‣]").unwrap();
    pub(super) static ref JSON_FRAGMENT: Regex = Regex::new(r"\{[^{}]*\}|\[[^\[\]]*\]").unwrap();
    pub(super) static ref HSPACE: Regex = Regex::new(r"[ \t\r\f\v]+").unwrap();
    pub(super) static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
    pub(super) static ref LIST_MARKER: Regex = Regex::new(r"^\d{1,2}[.)]\s+").unwrap();

    // Takeaway labels only count as headings at the start of a line and
    // followed by a colon or the end of the line.
    static ref TLDR_UNTIL_TAKEAWAYS: Regex = Regex::new(
        r"(?is)\b(?:tl;?\s?dr|summary|brief)\s*[:\-]\s*(.+?)\s*(?m:^)[ \t]*(?:key\s+takeaways|key\s+insights|main\s+points|important\s+points)[ \t]*(?::|(?m:$))"
    ).unwrap();
    static ref TLDR_TO_LINE_END: Regex = Regex::new(
        r"(?im)\b(?:tl;?\s?dr|summary|brief)\s*[:\-]\s*(.+)$"
    ).unwrap();
    static ref TAKEAWAYS_SECTION: Regex = Regex::new(
        r"(?is)(?m:^)[ \t]*(?:key\s+takeaways|key\s+insights|main\s+points|important\s+points)[ \t]*(?::|(?m:$))\s*(.+)\z"
    ).unwrap();
    pub(super) static ref ITEM_SPLIT: Regex = Regex::new(r"(?:^|\s)\d{1,2}[.)]\s+|\n|[•▸►◦▪‣]").unwrap();
}

/// One extraction attempt; `None` means "try the next one".
pub(super) type Matcher = fn(&str) -> Option<String>;

/// TL;DR strategies, most specific first.
pub(super) const TLDR_MATCHERS: &[Matcher] = &[tldr_until_takeaways, tldr_to_line_end];

/// Takeaway section strategies.
pub(super) const TAKEAWAY_MATCHERS: &[Matcher] = &[takeaways_section];

/// Labels that mark a section heading rather than content.
pub(super) const SECTION_LABELS: &[&str] = &[
    "tl;dr",
    "tldr",
    "tl dr",
    "summary",
    "brief",
    "key takeaways",
    "key insights",
    "main points",
    "important points",
];

/// Leftover label fragments that are never real takeaways.
pub(super) const LABEL_PREFIXES: &[&str] = &["Key", "Important", "Contains", "Worth", "Article"];

/// Takeaways starting with these carry no information.
pub(super) const LOW_INFORMATION_PREFIXES: &[&str] = &["Important", "Contains", "Worth", "Article"];

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn tldr_until_takeaways(text: &str) -> Option<String> {
    capture(&TLDR_UNTIL_TAKEAWAYS, text)
}

fn tldr_to_line_end(text: &str) -> Option<String> {
    capture(&TLDR_TO_LINE_END, text)
}

fn takeaways_section(text: &str) -> Option<String> {
    capture(&TAKEAWAYS_SECTION, text)
}

/// Runs `matchers` in order and returns the first capture that passes `accept`
/// after `clean` has been applied.
pub(super) fn first_match(
    matchers: &[Matcher],
    text: &str,
    clean: impl Fn(&str) -> String,
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    matchers
        .iter()
        .filter_map(|matcher| matcher(text))
        .map(|captured| clean(&captured))
        .find(|candidate| accept(candidate))
}

pub(super) fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| text.starts_with(p))
}

pub(super) fn starts_with_label(text: &str) -> bool {
    let lower = text.to_lowercase();
    SECTION_LABELS.iter().any(|label| lower.starts_with(label))
}

pub(super) fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}')
}

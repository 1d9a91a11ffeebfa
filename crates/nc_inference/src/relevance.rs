use std::collections::HashSet;
use nc_core::SummaryResult;

/// Phrases that mark a model refusing instead of answering.
pub const REFUSAL_PHRASES: &[&str] = &[
    "can't provide",
    "cannot provide",
    "can not provide",
    "unable to",
    "i'm sorry",
    "i am sorry",
    "as an ai",
];

const MIN_TLDR_CHARS: usize = 10;
const MIN_KEYWORD_CHARS: usize = 4;
const LEADING_WORDS: usize = 50;

pub fn contains_refusal(text: &str) -> bool {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    REFUSAL_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Cheap check that a summary is actually about the article.
///
/// The TL;DR must be at least ten characters, must not be a refusal, and at
/// least one of its words longer than four characters must appear among the
/// first fifty words of the article.
pub fn is_relevant(summary: &SummaryResult, article_text: &str) -> bool {
    let tldr = summary.tldr.trim();
    if tldr.chars().count() < MIN_TLDR_CHARS || contains_refusal(tldr) {
        return false;
    }

    let leading: HashSet<String> = article_text
        .split_whitespace()
        .take(LEADING_WORDS)
        .filter_map(normalize_word)
        .collect();

    tldr.split_whitespace()
        .filter_map(normalize_word)
        .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS)
        .any(|word| leading.contains(&word))
}

fn normalize_word(word: &str) -> Option<String> {
    let word = word.trim_matches(|c: char| !c.is_alphanumeric());
    (!word.is_empty()).then(|| word.to_lowercase())
}

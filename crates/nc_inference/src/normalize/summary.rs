use lazy_static::lazy_static;
use nc_core::{SummaryResult, TAKEAWAY_COUNT};
use regex::Regex;
use tracing::debug;

use super::patterns::{
    first_match, is_quote, starts_with_any, starts_with_label, BLANK_LINES, BULLET_GLYPHS,
    CODE_FENCE, EMPHASIS, HEADER, HSPACE, ITEM_SPLIT, JSON_FRAGMENT, LABEL_PREFIXES, LIST_DASH,
    LIST_MARKER, LOW_INFORMATION_PREFIXES, TAKEAWAY_MATCHERS, TLDR_MATCHERS,
};
use crate::fallback::{fallback_summary, FILLER_TAKEAWAYS, GENERIC_TAKEAWAYS, PLACEHOLDER_TLDR};
use crate::sanitize::{collapse_whitespace, first_sentence};

const MIN_TLDR_CAPTURE: usize = 10;
const MIN_TLDR: usize = 15;
const MIN_ITEM: usize = 5;
const MIN_TAKEAWAY: usize = 10;
const MIN_LINE: usize = 15;

lazy_static! {
    static ref FILLER_LEAD_IN: Regex = Regex::new(
        r"(?i)^(?:here(?:'s| is) (?:a |the |your )?(?:brief |short |quick )?(?:summary|tl;?\s?dr)(?: of (?:the|this) (?:article|story|news))?\s*[:\-]?\s*|in summary,?\s*|to summarize,?\s*|in short,?\s*)"
    ).unwrap();
    static ref ARTICLE_LEAD_IN: Regex = Regex::new(
        r"(?i)^(?:this|the) (?:article|text|piece|passage|news story) (?:discusses|talks about|is about|explains|describes|covers|highlights|examines|focuses on)\s+"
    ).unwrap();
    static ref REPORTING_LEAD_IN: Regex = Regex::new(
        r"(?i)^(?:this|the) (?:article|text|piece|passage|news story) (?:reports|says|states|notes|explains|argues) that\s+"
    ).unwrap();
}


/// Extracts a [`SummaryResult`] from free-form model output.
///
/// Never fails: anything it cannot extract is derived from `fallback_text`
/// (the cleaned article text) or filled with generic sentences. An empty
/// response yields exactly `fallback_summary(fallback_text, title)`.
pub fn normalize_summary(raw: &str, fallback_text: &str, title: Option<&str>) -> SummaryResult {
    match extract(raw, fallback_text) {
        Some(summary) => summary,
        None => {
            debug!("Nothing usable in model output, using fallback summary");
            fallback_summary(Some(fallback_text), title)
        }
    }
}

fn extract(raw: &str, fallback_text: &str) -> Option<SummaryResult> {
    if raw.trim().is_empty() {
        return None;
    }

    let cleaned = clean_response(raw);
    if cleaned.is_empty() {
        return None;
    }

    let mut tldr = extract_tldr(&cleaned);
    let mut takeaways = extract_takeaways(&cleaned);

    if tldr.is_none() || takeaways.is_empty() {
        let lines = candidate_lines(&cleaned);
        if tldr.is_none() {
            tldr = lines.first().cloned();
        }
        if takeaways.is_empty() {
            takeaways = lines
                .iter()
                .filter(|line| Some(*line) != tldr.as_ref())
                .take(TAKEAWAY_COUNT)
                .cloned()
                .collect();
        }
    }

    let tldr = match tldr.filter(|t| t.chars().count() >= MIN_TLDR) {
        Some(tldr) => tldr,
        None => first_sentence(fallback_text, MIN_TLDR).unwrap_or_else(|| PLACEHOLDER_TLDR.to_string()),
    };
    let tldr = neutralize_lead_in(&tldr);

    if takeaways.is_empty() {
        takeaways = GENERIC_TAKEAWAYS.iter().map(|t| t.to_string()).collect();
    }
    for (i, takeaway) in takeaways.iter_mut().enumerate() {
        if starts_with_any(takeaway, LOW_INFORMATION_PREFIXES) {
            *takeaway = GENERIC_TAKEAWAYS[i % GENERIC_TAKEAWAYS.len()].to_string();
        }
        *takeaway = with_terminal_punctuation(takeaway);
    }

    Some(SummaryResult::new(tldr, into_three(takeaways)))
}

/// Step one: strips markdown, glyphs and JSON-looking fragments, keeping lines.
fn clean_response(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = CODE_FENCE.replace_all(&text, "");
    let text = HEADER.replace_all(&text, "");
    let text = LIST_DASH.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = BULLET_GLYPHS.replace_all(&text, "\n");
    let text = JSON_FRAGMENT.replace_all(&text, "");

    let lines: Vec<String> = text
        .lines()
        .map(|line| HSPACE.replace_all(line.trim(), " ").into_owned())
        .collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn extract_tldr(cleaned: &str) -> Option<String> {
    first_match(
        TLDR_MATCHERS,
        cleaned,
        |captured| collapse_whitespace(captured).trim_matches(is_quote).trim().to_string(),
        |candidate| candidate.chars().count() > MIN_TLDR_CAPTURE,
    )
}

fn extract_takeaways(cleaned: &str) -> Vec<String> {
    let Some(section) = first_match(TAKEAWAY_MATCHERS, cleaned, |s| s.to_string(), |s| !s.trim().is_empty())
    else {
        return Vec::new();
    };

    ITEM_SPLIT
        .split(&section)
        .map(clean_item)
        .filter(|item| item.chars().count() > MIN_ITEM)
        .filter(|item| !starts_with_any(item, LABEL_PREFIXES))
        .filter(|item| !item.contains(|c: char| c == '{' || c == '}'))
        .take(TAKEAWAY_COUNT)
        .filter(|item| item.chars().count() > MIN_TAKEAWAY)
        .collect()
}

fn clean_item(item: &str) -> String {
    let item = LIST_MARKER.replace(item.trim(), "");
    collapse_whitespace(&item)
        .trim_matches(is_quote)
        .trim()
        .to_string()
}

/// Lines usable when the labelled sections are missing.
fn candidate_lines(cleaned: &str) -> Vec<String> {
    cleaned
        .lines()
        .map(clean_item)
        .filter(|line| line.chars().count() > MIN_LINE)
        .filter(|line| !starts_with_label(line))
        .collect()
}

/// Replaces a filler opening with the matching neutral lead-in.
fn neutralize_lead_in(tldr: &str) -> String {
    let lead_ins: [(&Regex, &str); 3] = [
        (&*ARTICLE_LEAD_IN, "This story covers "),
        (&*REPORTING_LEAD_IN, "Reports say that "),
        (&*FILLER_LEAD_IN, "In brief, "),
    ];
    for (lead_in, neutral) in lead_ins {
        let Some(found) = lead_in.find(tldr) else {
            continue;
        };
        let rest = tldr[found.end()..].trim();
        if rest.is_empty() {
            break;
        }
        return format!("{}{}", neutral, rest);
    }
    capitalize_first(tldr.trim())
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn with_terminal_punctuation(text: &str) -> String {
    let trimmed = text.trim_end().trim_end_matches(|c: char| c == ',' || c == ';' || c == ':');
    if trimmed.ends_with(|c: char| c == '.' || c == '!' || c == '?') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// Pads with filler sentences or truncates to exactly three takeaways.
fn into_three(items: Vec<String>) -> [String; TAKEAWAY_COUNT] {
    let mut items = items.into_iter();
    let mut next = |i: usize| items.next().unwrap_or_else(|| FILLER_TAKEAWAYS[i].to_string());
    [next(0), next(1), next(2)]
}

use nc_core::{RewriteResult, SummaryResult};
use crate::sanitize::{first_sentence, sentences};

pub const NO_CONTENT: &str = "No content available";

pub const PLACEHOLDER_TLDR: &str = "Here's a quick look at the latest development in this story.";

pub const GENERIC_TAKEAWAYS: [&str; 3] = [
    "Read the full article for complete details and context.",
    "Stay informed about developments in this area.",
    "Consider how this news might affect you or your community.",
];

/// Used to pad a takeaway list that came back short.
pub const FILLER_TAKEAWAYS: [&str; 3] = [
    "More details are available in the original article.",
    "The story may develop further in the coming days.",
    "Check trusted sources for follow-up coverage.",
];

pub const REWRITE_CLOSING: &str =
    "In short, it's a story worth keeping an eye on as more details come out.";

pub fn generic_takeaways() -> [String; 3] {
    GENERIC_TAKEAWAYS.map(str::to_string)
}

/// Network-free summary built from the article text and title alone.
pub fn fallback_summary(text: Option<&str>, title: Option<&str>) -> SummaryResult {
    let text = text.filter(|t| !t.trim().is_empty()).unwrap_or(NO_CONTENT);

    let tldr = title
        .map(|t| t.trim().trim_end_matches(&['.', '!', '?'][..]).trim())
        .filter(|t| t.chars().count() > 10)
        .map(|t| format!("This story covers {}.", t.to_lowercase()))
        .or_else(|| first_sentence(text, 15))
        .unwrap_or_else(|| PLACEHOLDER_TLDR.to_string());

    SummaryResult::new(tldr, generic_takeaways())
}

/// Network-free rewrite: the first two sentences plus a closing line.
pub fn fallback_rewrite(text: &str) -> RewriteResult {
    let opening: Vec<&str> = sentences(text).take(2).collect();
    let content = if opening.is_empty() {
        format!("{}. {}", NO_CONTENT, REWRITE_CLOSING)
    } else {
        format!("{}. {}", opening.join(". "), REWRITE_CLOSING)
    };
    RewriteResult { content }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_template() {
        let summary = fallback_summary(Some("Body text here."), Some("Hospitals Expand Rural Clinics!"));
        assert_eq!(summary.tldr, "This story covers hospitals expand rural clinics.");
        assert_eq!(summary.takeaways, generic_takeaways());
    }

    #[test]
    fn test_short_title_uses_first_sentence() {
        let summary = fallback_summary(
            Some("Scientists discover new species in deep ocean trench. It glows."),
            Some("Science"),
        );
        assert_eq!(summary.tldr, "Scientists discover new species in deep ocean trench.");
    }

    #[test]
    fn test_missing_text() {
        let summary = fallback_summary(None, None);
        assert_eq!(summary.tldr, "No content available.");

        let summary = fallback_summary(Some("   "), None);
        assert_eq!(summary.tldr, "No content available.");
    }

    #[test]
    fn test_placeholder_when_nothing_usable() {
        let summary = fallback_summary(Some("Too short. Tiny."), None);
        assert_eq!(summary.tldr, PLACEHOLDER_TLDR);
        assert!(summary.takeaways.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_fallback_is_pure() {
        let a = fallback_summary(Some("Markets rallied on Friday after the report."), Some("Markets rally"));
        let b = fallback_summary(Some("Markets rallied on Friday after the report."), Some("Markets rally"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fallback_rewrite() {
        let rewrite = fallback_rewrite("First point. Second point! Third point.");
        assert_eq!(rewrite.content, format!("First point. Second point. {}", REWRITE_CLOSING));

        let rewrite = fallback_rewrite("");
        assert!(rewrite.content.starts_with(NO_CONTENT));
    }
}

use nc_core::ChatMessage;

/// System and user halves of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

/// Identifier embedded in the system instruction so repeated requests for
/// the same article do not hit a cached completion.
pub fn request_id(request_seed: u64) -> String {
    format!("req-{:016x}", request_seed)
}

/// Prompt asking for a TL;DR line and three numbered takeaways.
///
/// `text` is expected to be already cleaned with
/// [`clean_article_text`](crate::sanitize::clean_article_text).
pub fn summary_prompt(text: &str, title: Option<&str>, url: Option<&str>, request_seed: u64) -> Prompt {
    let system = format!(
        "You are a precise news summarizer. Request {}. Summarize only the article you are given, \
         never invent facts, and always answer in the exact format requested.",
        request_id(request_seed)
    );

    let mut user = String::from("Summarize the following news article.\n\n");
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        user.push_str(&format!("Title: {}\n", title.trim()));
    }
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        user.push_str(&format!("Source: {}\n", url.trim()));
    }
    user.push_str(&format!(
        "Article: {}\n\n\
         Respond in exactly this format and nothing else:\n\
         TL;DR: <one sentence summarizing the article>\n\n\
         Key Takeaways:\n\
         1. <first takeaway>\n\
         2. <second takeaway>\n\
         3. <third takeaway>",
        text
    ));

    Prompt { system, user }
}

/// Prompt asking for a friendly, conversational rewrite.
pub fn rewrite_prompt(text: &str, title: Option<&str>, request_seed: u64) -> Prompt {
    let system = format!(
        "You rewrite news for a general audience. Request {}. Keep every fact from the original \
         and do not add commentary about the rewrite itself.",
        request_id(request_seed)
    );

    let mut user = String::from(
        "Rewrite the following news article in a simple, friendly, and conversational tone.\n\
         Make it easy to understand for everyone, using relatable analogies and clear language.\n\
         Write two to four short paragraphs.\n\n",
    );
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        user.push_str(&format!("Title: {}\n", title.trim()));
    }
    user.push_str(&format!("Article:\n{}", text));

    Prompt { system, user }
}

pub mod error;
pub mod models;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use models::{ChatMessage, ChatModel, ChatRequest, Role};
pub use source::NewsSource;
pub use types::{ArticleInput, NewsArticle, RewriteResult, SummaryResult, TAKEAWAY_COUNT};

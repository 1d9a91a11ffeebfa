use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:id", get(handlers::get_article))
        .route("/api/articles/:id/summary", get(handlers::get_summary))
        .route("/api/articles/:id/rewrite", post(handlers::rewrite_article))
        .route("/api/summaries", post(handlers::summarize_all))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use nc_core::{ArticleInput, Result, Error};
    pub use crate::handlers::{FeedItem, FeedPage};
    pub use crate::AppState;
}

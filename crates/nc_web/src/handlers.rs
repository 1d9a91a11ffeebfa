use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use nc_core::{ArticleInput, Error, RewriteResult, SummaryResult};
use nc_inference::runner::{RunMode, SummaryRun};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use crate::AppState;

/// `nc_core::Error` rendered as a JSON error body.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_) | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedItem {
    pub article: ArticleInput,
    pub summary: Option<SummaryResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedPage {
    pub page: usize,
    pub total_pages: usize,
    pub per_page: usize,
    pub items: Vec<FeedItem>,
}

fn find_article<'a>(state: &'a AppState, id: &str) -> Result<&'a ArticleInput, ApiError> {
    state
        .feed
        .get(id)
        .ok_or_else(|| Error::NotFound(format!("article {}", id)).into())
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<FeedPage> {
    let page = state.feed.page(query.page.unwrap_or(1));
    let summaries = state.summaries.read().await;
    let items = page
        .items
        .iter()
        .map(|article| FeedItem {
            article: article.clone(),
            summary: summaries.get(&article.id).cloned(),
        })
        .collect();

    Ok(Json(FeedPage {
        page: page.number,
        total_pages: page.total_pages,
        per_page: state.feed.per_page(),
        items,
    }))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<FeedItem> {
    let article = find_article(&state, &id)?.clone();
    let summary = state.cached_summary(&id).await;
    Ok(Json(FeedItem { article, summary }))
}

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SummaryResult> {
    if let Some(summary) = state.cached_summary(&id).await {
        return Ok(Json(summary));
    }

    let article = find_article(&state, &id)?;
    let summary = state.summarizer.summarize(article, rand::random()).await;
    state.summaries.write().await.insert(id, summary.clone());
    Ok(Json(summary))
}

pub async fn rewrite_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<RewriteResult> {
    let article = find_article(&state, &id)?;
    Ok(Json(state.summarizer.rewrite(article, rand::random()).await))
}

pub async fn summarize_all(
    State(state): State<Arc<AppState>>,
) -> ApiResult<BTreeMap<String, SummaryResult>> {
    info!("📚 Summarizing all {} loaded articles", state.feed.len());
    let run = SummaryRun::start(
        state.summarizer.clone(),
        state.feed.articles().to_vec(),
        RunMode::Sequential { delay: Duration::ZERO },
    );
    let results = run.join().await?;

    state
        .summaries
        .write()
        .await
        .extend(results.iter().map(|(id, summary)| (id.clone(), summary.clone())));
    Ok(Json(results))
}

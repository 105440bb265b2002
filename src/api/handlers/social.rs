use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::ok;
use crate::core::reddit::DEFAULT_SUBREDDIT;
use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub subreddit: Option<String>,
}

/// GET /api/reddit?subreddit=
pub async fn reddit(state: web::Data<AppState>, query: web::Query<FeedQuery>) -> AppResult<HttpResponse> {
    let subreddit = query
        .subreddit
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUBREDDIT);

    let posts = state.reddit.newest_posts(subreddit).await?;
    Ok(ok(posts))
}

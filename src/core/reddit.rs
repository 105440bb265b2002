//! Reddit listings for the social updates feed.
//!
//! Uses the application-only OAuth flow: a client-credentials token is
//! fetched per request, then the subreddit's newest posts are listed.

use chrono::{SecondsFormat, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};

pub const DEFAULT_SUBREDDIT: &str = "Supplements";

/// Reddit's own limit on community names.
const MAX_SUBREDDIT_LEN: usize = 21;

/// Whether `name` is a plain community name, which keeps it a single path
/// segment under `/r/`.
pub fn is_valid_subreddit(name: &str) -> bool {
    (1..=MAX_SUBREDDIT_LEN).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialPost {
    pub platform: String,
    pub date: String,
    pub content: String,
    pub engagement: Engagement,
    /// Always "neutral"; no sentiment model runs here.
    pub sentiment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Engagement {
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default)]
    ups: Option<i64>,
    #[serde(default)]
    num_comments: Option<i64>,
}

impl SocialPost {
    /// Posts without a usable creation time are dropped.
    fn from_post(post: Post) -> Option<Self> {
        let created = post.created_utc?;
        let date = Utc
            .timestamp_opt(created as i64, 0)
            .single()?
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        Some(Self {
            platform: "Reddit".into(),
            date,
            content: post.title,
            engagement: Engagement {
                likes: post.ups.unwrap_or(0),
                shares: 0,
                comments: post.num_comments.unwrap_or(0),
            },
            sentiment: "neutral".into(),
        })
    }
}

pub struct RedditClient {
    http: Client,
    auth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    user_agent: String,
    limit: u32,
}

impl RedditClient {
    pub fn new(http: Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            auth_url: config.reddit_auth_url.trim_end_matches('/').to_string(),
            api_url: config.reddit_api_url.trim_end_matches('/').to_string(),
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            user_agent: config.reddit_user_agent.clone(),
            limit: config.reddit_limit,
        }
    }

    #[instrument(skip(self))]
    pub async fn newest_posts(&self, subreddit: &str) -> AppResult<Vec<SocialPost>> {
        if !is_valid_subreddit(subreddit) {
            return Err(AppError::BadRequest("Invalid subreddit name".into()));
        }
        let token = self.access_token().await?;

        let response = self
            .http
            .get(format!("{}/r/{}/new", self.api_url, subreddit))
            .query(&[("limit", self.limit)])
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Reddit listing failed with status {}",
                response.status()
            )));
        }

        let listing: Listing = response.json().await?;
        let posts: Vec<SocialPost> = listing
            .data
            .children
            .into_iter()
            .filter_map(|child| SocialPost::from_post(child.data))
            .collect();
        info!(subreddit, count = posts.len(), "fetched subreddit posts");
        Ok(posts)
    }

    async fn access_token(&self) -> AppResult<String> {
        let response = self
            .http
            .post(format!("{}/api/v1/access_token", self.auth_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Reddit token request failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post(title: &str, created_utc: Option<f64>) -> Post {
        Post {
            title: title.into(),
            created_utc,
            ups: Some(12),
            num_comments: None,
        }
    }

    fn client(server: &MockServer) -> RedditClient {
        let config = UpstreamConfig {
            reddit_auth_url: server.uri(),
            reddit_api_url: server.uri(),
            reddit_client_id: "id".into(),
            reddit_client_secret: "secret".into(),
            reddit_limit: 3,
            ..Default::default()
        };
        RedditClient::new(Client::new(), &config)
    }

    #[test]
    fn post_maps_to_social_update() {
        let social = SocialPost::from_post(post("Magnesium made me dizzy", Some(1_700_000_000.0))).unwrap();
        assert_eq!(social.platform, "Reddit");
        assert_eq!(social.date, "2023-11-14T22:13:20.000Z");
        assert_eq!(social.content, "Magnesium made me dizzy");
        assert_eq!(
            social.engagement,
            Engagement { likes: 12, shares: 0, comments: 0 }
        );
        assert_eq!(social.sentiment, "neutral");
    }

    #[test]
    fn post_without_creation_time_is_dropped() {
        assert!(SocialPost::from_post(post("No timestamp", None)).is_none());
    }

    #[test]
    fn subreddit_names_are_single_segments() {
        assert!(is_valid_subreddit("Supplements"));
        assert!(is_valid_subreddit("ask_a_pharmacist"));
        for name in ["", "../../api/v1/me", "a/b", "name?x=1", "tooooooooooooooooolong"] {
            assert!(!is_valid_subreddit(name), "accepted {:?}", name);
        }
    }

    #[tokio::test]
    async fn traversal_attempt_never_reaches_reddit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server).newest_posts("../../api/v1/me").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Invalid subreddit name"));
    }

    #[tokio::test]
    async fn listing_skips_posts_without_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/r/Nootropics/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "children": [
                    { "data": { "title": "dated", "created_utc": 1700000000.0 } },
                    { "data": { "title": "undated" } }
                ] }
            })))
            .mount(&server)
            .await;

        let posts = client(&server).newest_posts("Nootropics").await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "dated");
    }
}

#![allow(dead_code)]

use actix_web::web;
use adr::config::Config;
use adr::db::Database;
use adr::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Configuration pointing every upstream at `upstream` (a wiremock URI).
pub fn test_config(upstream: &str) -> Config {
    let mut config = Config::default();
    config.session.secret = TEST_SECRET.into();
    config.upstream.fda_base_url = upstream.into();
    config.upstream.reddit_auth_url = upstream.into();
    config.upstream.reddit_api_url = upstream.into();
    config.upstream.reddit_client_id = "client-id".into();
    config.upstream.reddit_client_secret = "client-secret".into();
    config.upstream.reddit_limit = 5;
    config.upstream.detection_url = format!("{}/detect_adverse_events", upstream);
    config
}

pub async fn test_state(upstream: &str) -> web::Data<AppState> {
    let db = Database::in_memory().await.expect("in-memory database");
    web::Data::new(AppState::new(db, &test_config(upstream)))
}

/// Initializes the full route table over `$state`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(adr::api::configure),
        )
        .await
    };
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use marketplace_api::auth::jwt::{generate_access_token, JwtConfig};
use marketplace_api::config::ServerConfig;
use marketplace_api::orchestrator::AssetOrchestrator;
use marketplace_api::router::build_app_router;
use marketplace_api::state::AppState;
use marketplace_core::asset::AssetType;
use marketplace_core::types::DbId;
use marketplace_db::models::asset::CreateAsset;
use marketplace_db::repositories::InMemoryAssetStore;
use marketplace_db::store::AssetStore;
use tower::ServiceExt;

pub const ADMIN_ID: DbId = 1;
pub const SELLER_ID: DbId = 10;
pub const OTHER_SELLER_ID: DbId = 11;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        slug_max_attempts: 25,
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

pub fn memory_store() -> Arc<dyn AssetStore> {
    Arc::new(InMemoryAssetStore::new())
}

pub fn orchestrator() -> AssetOrchestrator {
    AssetOrchestrator::new(memory_store())
}

/// Build the full application router over `store`, with the same middleware
/// stack the binary uses.
pub fn build_test_app(store: Arc<dyn AssetStore>) -> Router {
    let config = test_config();
    let orchestrator = AssetOrchestrator::new(store)
        .with_slug_max_attempts(config.slug_max_attempts);

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for `user_id` with `role`, signed with the test secret.
pub fn token(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

/// A SaaS listing with no financials, website, or media.
pub fn listing(title: &str) -> CreateAsset {
    CreateAsset {
        owner_id: None,
        asset_type: AssetType::Saas,
        title: title.to_string(),
        short_description: "A small software business".to_string(),
        full_description: None,
        asking_price: 100_000.0,
        currency: None,
        monthly_revenue: None,
        monthly_profit: None,
        mrr: None,
        arr: None,
        churn_rate: None,
        cac: None,
        ltv: None,
        annual_growth_rate: None,
        website_url: None,
        performance: None,
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> Response {
    send(app, Method::GET, uri, bearer, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    bearer: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, bearer, Some(body)).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

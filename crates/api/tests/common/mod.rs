#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use kortex_api::config::{ServerConfig, DEV_SECRET_KEY};
use kortex_api::router::build_app_router;
use kortex_api::state::AppState;
use kortex_core::scripting::registry::{AllowedScript, ScriptRegistry};

/// The repository's `scripts/` directory.
pub fn repo_scripts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../scripts")
        .canonicalize()
        .expect("scripts directory should exist")
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(scripts_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".to_string()],
        request_timeout_secs: 60,
        script_timeout_secs: 30,
        scripts_dir: scripts_dir.to_path_buf(),
        secret_key: DEV_SECRET_KEY.to_string(),
    }
}

/// Full application router over the real allow-list and scripts.
pub fn build_test_app() -> Router {
    let dir = repo_scripts_dir();
    let config = test_config(&dir);
    build_app(config, ScriptRegistry::new(&dir))
}

/// Full application router over a custom config and registry.
pub fn build_app(config: ServerConfig, registry: ScriptRegistry) -> Router {
    let state = AppState::new(config.clone(), registry);
    build_app_router(state, &config)
}

/// Allow-list row for a script in a test directory.
pub fn script_entry(name: &'static str, file_name: &'static str) -> AllowedScript {
    AllowedScript {
        name,
        file_name,
        description: "test script",
    }
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

#[cfg(target_os = "linux")]
pub use kortex_core::testing::process_running;

use axum::extract::{Path, Request, State};
use axum::handler::HandlerWithoutStateExt;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::di::ServiceContainer;
use crate::logo::LogoResolution;

/// Logo files the CDN fallback is allowed to fill in
const LOGO_FILES: [&str; 2] = ["logo.png", "logo.svg"];

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Asset not found" })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_asset(
    State(services): State<Arc<ServiceContainer>>,
    Path((chain, token_id)): Path<(String, String)>,
) -> Response {
    match services.asset_interactor().get_asset(&chain, &token_id).await {
        Ok(Some(asset)) => Json(asset).into_response(),
        Ok(None) => not_found().await,
        Err(e) => {
            error!("Failed to resolve asset {}/{}: {}", chain, token_id, e);
            internal_error()
        }
    }
}

pub async fn get_logo(
    State(services): State<Arc<ServiceContainer>>,
    Path((chain, token_id, file_name)): Path<(String, String, String)>,
    request: Request,
) -> Response {
    if !LOGO_FILES.contains(&file_name.as_str()) {
        return static_file(State(services), request).await;
    }

    match services
        .cdn_fallback()
        .resolve(&chain, &token_id, &file_name)
        .await
    {
        LogoResolution::Local(_) => static_file(State(services), request).await,
        LogoResolution::Fetched { bytes, source, .. } => (
            [
                (CONTENT_TYPE, content_type_for(&file_name)),
                (
                    HeaderName::from_static("x-cached-from"),
                    source.header_value(),
                ),
            ],
            bytes,
        )
            .into_response(),
        LogoResolution::NotFound => not_found().await,
    }
}

/// Serves a file from the repository root
pub async fn static_file(
    State(services): State<Arc<ServiceContainer>>,
    request: Request,
) -> Response {
    let serve_dir =
        ServeDir::new(&services.config().root_dir).not_found_service(not_found.into_service());

    match serve_dir.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

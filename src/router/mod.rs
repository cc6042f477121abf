use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::di::ServiceContainer;

pub mod handlers;

const STATIC_CACHE_CONTROL: &str = "public, max-age=86400";

// Base router trait
pub trait Router: Send + Sync {
    fn setup_routes(&self) -> axum::Router;
}

/// HTTP router for asset lookups, logo fallbacks and static files
pub struct AssetsRouter {
    services: Arc<ServiceContainer>,
}

impl AssetsRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

impl Router for AssetsRouter {
    fn setup_routes(&self) -> axum::Router {
        axum::Router::new()
            .route("/health", get(handlers::health))
            .route("/api/assets/:chain/:token_id", get(handlers::get_asset))
            .route(
                "/blockchains/:chain/assets/:token_id/:file_name",
                get(handlers::get_logo),
            )
            .fallback(handlers::static_file)
            .layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static(STATIC_CACHE_CONTROL),
            ))
            .layer(CorsLayer::permissive())
            .with_state(self.services.clone())
    }
}

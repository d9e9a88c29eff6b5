use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use config::Config;
use middleware::rate_limit::RateLimitState;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let rate_limiter =
            RateLimitState::new(config.rate_limit_max_requests, config.rate_limit_window_secs);
        Self {
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Builds the full application router. The server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()` for rate limiting.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/mood/analyze", post(handlers::mood::analyze_mood))
        .route(
            "/api/training-log/parse",
            post(handlers::training_log::parse_log),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_api,
        ));

    let public_routes = Router::new().route("/health", get(handlers::health::health_check));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

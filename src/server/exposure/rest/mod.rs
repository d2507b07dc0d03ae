//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the API
//! routes, health checks, request tracing and CORS.

pub mod handlers;

use super::super::host::ServerHost;
use crate::server::router::build_api_routes;
use axum::extract::Request;
use axum::http::{Method, header};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::{ServiceBuilder, ServiceExt, service_fn};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// # Arguments
    ///
    /// * `host` - The server host containing all shared state
    /// * `custom_routes` - Additional custom routes to merge
    ///
    /// # Returns
    ///
    /// A fully configured Axum router with:
    /// - Health check routes
    /// - Course library API routes
    /// - Custom routes
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let enable_cors = host.config.server.enable_cors;

        let mut app = Self::health_routes().merge(build_api_routes(host));
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let app = if enable_cors {
            Self::with_cors(app)
        } else {
            app
        };

        app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Cross-origin policy; clients must be able to read paging and
    /// location headers
    fn cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([
                header::LOCATION,
                handlers::X_PAGINATION,
            ])
    }

    /// Apply the CORS policy to everything except plain `OPTIONS` requests
    ///
    /// `CorsLayer` answers any `OPTIONS` itself, so requests without
    /// `Access-Control-Request-Method` bypass it and reach the route's own
    /// `OPTIONS` handler.
    fn with_cors(app: Router) -> Router {
        let plain = app.clone();
        let cors = app.layer(Self::cors_layer());

        Router::new().fallback_service(service_fn(move |request: Request| {
            let router = if request.method() == Method::OPTIONS && !is_cors_preflight(&request) {
                plain.clone()
            } else {
                cors.clone()
            };
            router.oneshot(request)
        }))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "course-library"
        }))
    }
}

fn is_cors_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

pub mod v1;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::delivery::http::v1::comments::{
    create_comment, delete_comment, like_comment, list_comments, update_comment,
};
use crate::delivery::http::v1::middleware::actor_middleware;
use crate::delivery::http::v1::system::{healthz, hi, metrics};
use crate::AppState;

#[derive(Debug, Default)]
pub struct RouterOptions {
    /// Allowed cross-origin caller, if any.
    pub cors_origin: Option<HeaderValue>,
    /// Directory holding a prebuilt front end. Unmatched paths get its
    /// `index.html`.
    pub spa_dir: Option<PathBuf>,
}

pub fn router(state: Arc<AppState>, options: RouterOptions) -> Router {
    let comments_api = Router::new()
        .route("/api/hi", get(hi))
        .route("/api/comments", get(list_comments))
        .route("/api/comments/like/{id}", post(like_comment))
        .route("/api/comments/update/{id}", put(update_comment))
        .route("/api/comments/create", post(create_comment))
        .route("/api/comments/delete/{id}", delete(delete_comment))
        .layer(middleware::from_fn(actor_middleware));

    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(comments_api);

    if let Some(dir) = options.spa_dir {
        tracing::info!(dir = %dir.display(), "serving front end bundle");
        let index = dir.join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router = router.layer(TraceLayer::new_for_http());

    if let Some(origin) = options.cors_origin {
        tracing::info!(?origin, "CORS enabled");
        router = router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    router.with_state(state)
}

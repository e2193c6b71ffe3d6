use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::router::strip_base;
use crate::server::AssetServer;

/// Middleware answering requests under the asset prefix from the embedded
/// tree. Everything else is handed to `next` untouched.
pub async fn serve_embedded(
    State(server): State<Arc<AssetServer>>,
    request: Request,
    next: Next,
) -> Response {
    match strip_base(request.uri().path()) {
        Some(relative) => server.serve(request.method(), request.headers(), relative),
        None => next.run(request).await,
    }
}

/// Put the embedded asset middleware in front of `next_stage`
pub fn app(server: Arc<AssetServer>, next_stage: Router) -> Router {
    next_stage.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(server, serve_embedded)),
    )
}

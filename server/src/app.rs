use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use tower_http::trace::{self, TraceLayer};
use tracing::Level;
use trimbox::{BbxQueue, ImageAccess};

use crate::{image_router::create_image_router, settings::ImgSource};

pub fn create_app<A: ImageAccess>(
    img_sources: Vec<ImgSource>,
    image_access: A,
    queue: BbxQueue,
) -> Router {
    let image_router = create_image_router(img_sources, image_access, queue.clone());

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/counters", get(counters).with_state(queue))
        .merge(image_router)
        .fallback(handler_404)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn index() -> impl IntoResponse {
    (StatusCode::OK, "welcome to trimbox")
}

async fn health() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn counters(State(queue): State<BbxQueue>) -> impl IntoResponse {
    Json(queue.counters())
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

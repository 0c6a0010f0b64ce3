use axum::{
    response::{IntoResponse, Response},
    Json,
};
use trimbox::BoundingBox;

#[derive(Clone)]
pub struct BbxResult(pub BoundingBox);

impl IntoResponse for BbxResult {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

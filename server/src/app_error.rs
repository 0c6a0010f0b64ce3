use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use trimbox::ImageError;

pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<ImageError>() {
            Some(ImageError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(err) if err.is_input_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(%status, "an error occured while processing image | {}", self.0);
        (
            status,
            Json(serde_json::json!({"err": "an error occured while processing image", "msg": format!("{}", self.0)}))
        ).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;
use crate::error::TagError;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("error in the request body: {0}")]
    MalformedBody(#[from] JsonRejection),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Tag(e) => e.status_code(),
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Tag(TagError::Internal(ref e)) = self {
            error!("Generic error: {:?}", e);
        }

        let body = Json(json!({ "message": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

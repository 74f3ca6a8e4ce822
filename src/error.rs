use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("an internal server error occurred: {0}")]
    Internal(#[source] anyhow::Error),
}

impl TagError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(anyhow::Error::new(cause))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read/write DB file: {0}")]
    DbIOError(std::io::Error),
    #[error("Failed to serialize/deserialize DB operation: {0}")]
    DbSerializationError(serde_json::Error),
}

impl From<StoreError> for TagError {
    fn from(value: StoreError) -> Self {
        TagError::internal(value)
    }
}

#[derive(Error, Debug)]
pub enum PostsApiError {
    #[error("network error: {0}")]
    NetworkError(reqwest::Error),
    #[error("posts api responded with status {0}")]
    NonSuccessfulStatusCode(StatusCode),
}

impl From<PostsApiError> for TagError {
    fn from(value: PostsApiError) -> Self {
        TagError::internal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(TagError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(TagError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(TagError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        let internal: TagError = PostsApiError::NonSuccessfulStatusCode(StatusCode::BAD_GATEWAY).into();
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_keeps_original_cause() {
        let err: TagError = PostsApiError::NonSuccessfulStatusCode(StatusCode::SERVICE_UNAVAILABLE).into();
        let TagError::Internal(cause) = err else { panic!("expected internal error") };
        let cause = cause.downcast_ref::<PostsApiError>().unwrap();
        assert!(matches!(cause, PostsApiError::NonSuccessfulStatusCode(StatusCode::SERVICE_UNAVAILABLE)));
    }
}

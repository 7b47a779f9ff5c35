use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use snip_shortener::ShortenError;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error surface of the HTTP API.
#[derive(Debug)]
pub enum ApiError {
    /// The request was syntactically unusable (bad body, bad path param).
    BadRequest(String),
    /// A service-level failure, mapped to a status by error class.
    Shorten(ShortenError),
}

impl From<ShortenError> for ApiError {
    fn from(value: ShortenError) -> Self {
        Self::Shorten(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Shorten(err) => {
                let status = match &err {
                    ShortenError::EmptyUrl
                    | ShortenError::DuplicateUrl(_)
                    | ShortenError::InvalidShortCode(_) => StatusCode::BAD_REQUEST,
                    ShortenError::NotFound(_) => StatusCode::NOT_FOUND,
                    ShortenError::Generator(_) | ShortenError::Storage(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

use crate::errors::Error;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use tracing::error;

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidPrice { .. }
            | Self::InvalidProduct { .. }
            | Self::InvalidPagination { .. }
            | Self::InvalidSort { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::DataSource { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config { .. }
            | Self::Database(_)
            | Self::Credential(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side detail stays in the logs
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            match self {
                Self::Database(_) | Self::DataSource { .. } => "Failed to load products".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        let mut response = (status, Json(serde_json::json!({ "error": message }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

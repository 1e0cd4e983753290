use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::ClientError(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::UpstreamError(message) => {
                (StatusCode::BAD_GATEWAY, message)
            }
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    /// Remote-side failure: the message is relayed verbatim.
    fn upstream_error(self) -> ApiResponse<T>;
    fn server_error(self) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn upstream_error(self) -> ApiResponse<T> {
        self.map_err(|e| {
            error!("{:?}", e);
            ApiError::UpstreamError(e.to_string())
        })
    }

    fn server_error(self) -> ApiResponse<T> {
        self.map_err(|e| {
            error!("{:?}", e);
            ApiError::ServerError(e.to_string())
        })
    }
}

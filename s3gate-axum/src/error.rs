use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use s3gate_store::StoreError;
use thiserror::Error;

/// Failures surfaced by the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Directory-style keys are never served
    #[error("Forbidden")]
    Forbidden { key: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {message}")]
    Config { message: String },

    /// Body copy failed after headers were committed; only ever logged
    #[error("stream copy failed: {source}")]
    StreamCopy {
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } | Self::Store(StoreError::InvalidPath { .. }) => StatusCode::FORBIDDEN,
            Self::Store(_) | Self::Config { .. } | Self::StreamCopy { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses() {
        assert_eq!(GatewayError::Forbidden { key: "a/".into() }.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            GatewayError::from(StoreError::invalid_path("a/")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GatewayError::from(StoreError::InvalidBucket).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::from(StoreError::UpstreamStatus { status: 404 }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_render_their_description() {
        let response = GatewayError::from(StoreError::not_found("media", "a.txt")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tokio::task::JoinError;

use crate::domain::entities::upload::FileError;
use crate::error::{ExportError, IngestError, StoreError};
use crate::usecase::services::export_service::ExportFormat;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
    files: Vec<FileError>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<FileError>,
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "InvalidRequest",
            message: message.into(),
            files: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store request failed");
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            kind: "StoreUnavailable",
            message: err.to_string(),
            files: Vec::new(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidRequest(message) => Self::invalid_request(message),
            IngestError::AllFilesFailed { errors } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                kind: "AllFilesFailed",
                message: format!("all {} uploaded files failed to decode", errors.len()),
                files: errors,
            },
            IngestError::Store(err) => err.into(),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => Self {
                status: StatusCode::BAD_REQUEST,
                kind: "ExportError",
                message: err.to_string(),
                files: Vec::new(),
            },
            ExportError::Serialize(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                kind: "ExportError",
                message: err.to_string(),
                files: Vec::new(),
            },
            ExportError::Store(err) => err.into(),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        tracing::error!(error = %err, "blocking task failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "Internal",
            message: "request worker failed".to_string(),
            files: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                kind: self.kind,
                message: self.message,
                files: self.files,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// File download with a `Content-Disposition` that makes browsers save it.
pub fn attachment(bytes: Vec<u8>, format: ExportFormat, stem: &str) -> Response {
    let file_name = format!("{stem}.{}", format.extension());
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        let store = StoreError::Unavailable("disk gone".to_string());
        assert_eq!(
            ApiError::from(store.clone()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(IngestError::Store(store.clone())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ExportError::Store(store)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(IngestError::AllFilesFailed { errors: Vec::new() }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ExportError::Empty).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_request("bad").status(),
            StatusCode::BAD_REQUEST
        );
    }
}

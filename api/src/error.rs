use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::store::StoreError;

/// Errors caused by the request itself, answered with their own status code
/// and message.
pub trait ApiRequestError: std::error::Error {
    fn status_code(&self) -> StatusCode;
}

#[derive(Debug)]
pub enum AppError {
    Request {
        status: StatusCode,
        msg: String,
    },
    ServerError {
        error: StoreError,

        #[cfg(debug_assertions)]
        backtrace: backtrace::Backtrace,
    },
}

#[derive(Serialize)]
struct ErrorResponse {
    msg: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::Request {
            status: StatusCode::BAD_REQUEST,
            msg: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::Request {
            status: StatusCode::NOT_FOUND,
            msg: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Request { status, msg } => {
                (status, Json(ErrorResponse { msg })).into_response()
            }
            AppError::ServerError {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => {
                #[cfg(debug_assertions)]
                tracing::error!(
                    %error,
                    frames = ?filter_backtrace(&backtrace),
                    "Request failed on a store call"
                );
                #[cfg(not(debug_assertions))]
                tracing::error!(%error, "Request failed on a store call");

                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::ServerError {
            error,

            #[cfg(debug_assertions)]
            backtrace: backtrace::Backtrace::new(),
        }
    }
}

impl From<(&'static str, StatusCode)> for AppError {
    fn from((msg, status): (&'static str, StatusCode)) -> Self {
        AppError::Request {
            status,
            msg: msg.into(),
        }
    }
}

#[cfg(debug_assertions)]
#[derive(Debug)]
#[allow(dead_code)]
struct FrameInfo {
    name: String,
    loc: String,
}

/// Keeps only the frames that belong to this crate.
#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename(),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.display(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}

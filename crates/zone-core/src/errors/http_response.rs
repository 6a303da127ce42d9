// ABOUTME: Axum IntoResponse implementation for AppError
// ABOUTME: Renders errors as a JSON envelope with the error code's HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

/// HTTP error response format
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: ErrorResponseDetails<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorResponseDetails<'a> {
    code: ErrorCode,
    message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: ErrorResponseDetails {
                code: self.code,
                message: &self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - token builder の失敗は中身を出さず "Server error" に丸める
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::rtc_token::TokenBuildError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is required")]
    MissingParameter(&'static str),
    #[error("invalid request body")]
    InvalidBody,
    #[error("Server error")]
    Internal,
}

impl AppError {
    pub fn missing(param: &'static str) -> Self {
        Self::MissingParameter(param)
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::InvalidBody => StatusCode::BAD_REQUEST,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<TokenBuildError> for AppError {
    fn from(_: TokenBuildError) -> Self {
        AppError::Internal
    }
}

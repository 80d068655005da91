/*
 * Responsibility
 * - RTC token 発行 handler (method 不問)
 * - OPTIONS は 204 で即終了
 * - body → DTO validation → service 呼び出し → {"token": ...}
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    api::v1::dto::token::{IssueParams, TokenRequest, TokenResponse},
    error::AppError,
    state::AppState,
};

pub async fn generate_token(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let req = TokenRequest::from_body(&body)?;
    info!(channel_name = ?req.channel_name, uid = ?req.uid, "received token request");

    let IssueParams { channel_name, uid } = req.validate()?;
    let issued = state.tokens.issue(&channel_name, uid)?;

    info!(
        channel_name = %channel_name,
        expires_at = %issued.expires_at,
        "token generated for channel"
    );

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            token: issued.token,
        }),
    )
        .into_response())
}

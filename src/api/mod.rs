/*
 * Responsibility
 * - URL 構造のトップレベル
 * - 関数 URL 互換のパス (`/`, `/generateAgoraToken`) と /api/v1 をまとめる
 */
use axum::{Router, routing::any};

use crate::api::v1::handlers::token::generate_token;
use crate::state::AppState;

pub mod v1;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", any(generate_token))
        .route("/generateAgoraToken", any(generate_token))
        .nest("/api/v1", v1::routes())
}

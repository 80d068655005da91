/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - token は method を問わず受ける (OPTIONS は handler 側で 204)
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::api::v1::handlers::{health::health, token::generate_token};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/token", any(generate_token))
}

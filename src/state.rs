/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc で cheap)
 * - リクエスト間で可変な状態は持たない
 */
use std::sync::Arc;

use crate::services::rtc_token::RtcTokenService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub tokens: Arc<RtcTokenService>,
}

impl AppState {
    pub fn new(tokens: Arc<RtcTokenService>) -> Self {
        Self { tokens }
    }
}

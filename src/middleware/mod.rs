/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 各 module は `apply(router) -> Router` を持つ
 */
pub mod cors;
pub mod http;

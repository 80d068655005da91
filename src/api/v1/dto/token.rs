/*
 * Responsibility
 * - token 発行の request/response DTO
 * - 各フィールドは一旦 JSON 値で受け、falsy 判定 → 型チェックの順で validate() する
 */
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::AppError;
use crate::services::rtc_token::Uid;

/// Request body for token issuance.
///
/// Fields stay raw JSON until `validate()`: a falsy value of any type
/// (`null`, `false`, `""`, `0`) must read as "<field> is required", not as a
/// malformed body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub channel_name: Option<Value>,
    pub uid: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, PartialEq)]
pub struct IssueParams {
    pub channel_name: String,
    pub uid: Uid,
}

impl TokenRequest {
    /// Parse a raw body. An empty body reads as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|_| AppError::InvalidBody)
    }

    /// `channelName` is checked before `uid`. Truthy values of the wrong type
    /// are rejected as an invalid body.
    pub fn validate(self) -> Result<IssueParams, AppError> {
        let channel_name = match present(self.channel_name) {
            None => return Err(AppError::missing("channelName")),
            Some(Value::String(s)) => s,
            Some(_) => return Err(AppError::InvalidBody),
        };

        let uid = match present(self.uid) {
            None => return Err(AppError::missing("uid")),
            Some(Value::String(s)) => Uid::parse_leading(&s),
            Some(Value::Number(n)) => coerce_number(&n),
            Some(_) => return Err(AppError::InvalidBody),
        };

        Ok(IssueParams { channel_name, uid })
    }
}

/// Drop falsy values so only meaningful input is left.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn coerce_number(n: &Number) -> Uid {
    match n.as_i64() {
        Some(v) => Uid::Int(v),
        None => n.as_f64().map_or(Uid::NaN, Uid::from_f64),
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

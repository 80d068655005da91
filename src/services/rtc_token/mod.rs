/*
 * Responsibility
 * - RTC token 発行の service 層
 * - TokenBuilder trait を境界にして、署名フォーマットの実装を差し替え可能にする
 * - handler からはこの module の公開型だけを使う
 */
pub mod access_token;
pub mod service;
#[cfg(test)]
pub mod testing;
pub mod uid;

use std::fmt;

use thiserror::Error;

pub use access_token::AccessToken2Builder;
pub use service::RtcTokenService;
pub use uid::Uid;

/// Capability level encoded in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcRole {
    /// Full participant: join plus publish audio/video/data.
    Publisher,
    /// Receive only.
    Subscriber,
}

/// Application credentials issued by the RTC vendor.
#[derive(Clone, PartialEq, Eq)]
pub struct RtcCredentials {
    app_id: String,
    app_certificate: String,
}

impl RtcCredentials {
    pub fn new(app_id: impl Into<String>, app_certificate: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_certificate: app_certificate.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_certificate(&self) -> &str {
        &self.app_certificate
    }
}

impl fmt::Debug for RtcCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RtcCredentials")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenBuildError {
    #[error("app id must be 32 hex characters")]
    InvalidAppId,
    #[error("app certificate must be 32 hex characters")]
    InvalidAppCertificate,
    #[error("expiration {expires_at} is not after issue time {issued_at}")]
    ExpirationNotAfterIssue { issued_at: i64, expires_at: i64 },
    #[error("issue time {now} does not fit in 32 bits")]
    IssueTimeOutOfRange { now: i64 },
    #[error("expiration window of {seconds}s does not fit in 32 bits")]
    ExpirationOutOfRange { seconds: i64 },
    #[error("{field} exceeds {max} bytes")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("compression failed: {0}")]
    Compression(String),
}

/// Produces a signed token for one participant of one channel.
///
/// Implementations must be pure computation: the service calls them inline on
/// the request path.
pub trait TokenBuilder: Send + Sync {
    fn build_token_with_uid(
        &self,
        credentials: &RtcCredentials,
        channel_name: &str,
        uid: Uid,
        role: RtcRole,
        privilege_expires_at: i64,
    ) -> Result<String, TokenBuildError>;
}

use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{debug, error};

use super::{RtcCredentials, RtcRole, TokenBuildError, TokenBuilder, Uid};

/// Every token is valid for 24 hours from the moment it is issued.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Tokens issued here always grant full publishing rights.
pub const ISSUED_ROLE: RtcRole = RtcRole::Publisher;

/// Service-level return type to keep handlers thin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedRtcToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues publisher tokens for the configured application.
///
/// Holds only immutable data; one instance serves every request.
#[derive(Clone)]
pub struct RtcTokenService {
    credentials: RtcCredentials,
    builder: Arc<dyn TokenBuilder>,
}

impl fmt::Debug for RtcTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RtcTokenService")
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl RtcTokenService {
    pub fn new(credentials: RtcCredentials, builder: Arc<dyn TokenBuilder>) -> Self {
        Self {
            credentials,
            builder,
        }
    }

    pub fn issue(&self, channel_name: &str, uid: Uid) -> Result<IssuedRtcToken, TokenBuildError> {
        self.issue_at(channel_name, uid, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        channel_name: &str,
        uid: Uid,
        now: DateTime<Utc>,
    ) -> Result<IssuedRtcToken, TokenBuildError> {
        // Whole seconds: tokens carry second precision.
        let issued_at = now.timestamp();
        let expires_at = issued_at + TOKEN_TTL_SECONDS;

        debug!(channel_name, %uid, expires_at, "building RTC token");

        let token = self
            .builder
            .build_token_with_uid(&self.credentials, channel_name, uid, ISSUED_ROLE, expires_at)
            .map_err(|e| {
                error!(channel_name, %uid, error = %e, "failed to build RTC token");
                e
            })?;

        let expires_at = DateTime::from_timestamp(expires_at, 0)
            .unwrap_or_else(|| now + ChronoDuration::seconds(TOKEN_TTL_SECONDS));

        Ok(IssuedRtcToken { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::services::rtc_token::testing::{
        APP_CERT, APP_ID, FailingBuilder, RecordingBuilder, credentials,
    };

    fn service_with(builder: Arc<dyn TokenBuilder>) -> RtcTokenService {
        RtcTokenService::new(credentials(), builder)
    }

    #[test]
    fn passes_publisher_role_and_day_long_expiry() {
        let builder = Arc::new(RecordingBuilder::default());
        let service = service_with(builder.clone());

        let before = Utc::now().timestamp();
        let issued = service.issue("room1", Uid::Int(42)).unwrap();
        let after = Utc::now().timestamp();

        let calls = builder.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.app_id, APP_ID);
        assert_eq!(call.app_certificate, APP_CERT);
        assert_eq!(call.channel_name, "room1");
        assert_eq!(call.uid, Uid::Int(42));
        assert_eq!(call.role, RtcRole::Publisher);
        assert!(call.privilege_expires_at >= before + 86_400);
        assert!(call.privilege_expires_at <= after + 86_400);

        assert_eq!(issued.expires_at.timestamp(), call.privilege_expires_at);
        assert!(!issued.token.is_empty());
    }

    #[test]
    fn same_second_same_token() {
        let service = service_with(Arc::new(RecordingBuilder::default()));
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let later_in_second = now + ChronoDuration::milliseconds(900);

        let a = service.issue_at("lobby", Uid::Int(7), now).unwrap();
        let b = service.issue_at("lobby", Uid::Int(7), later_in_second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn expiry_moves_with_wall_clock() {
        let service = service_with(Arc::new(RecordingBuilder::default()));
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

        let a = service.issue_at("lobby", Uid::Int(7), now).unwrap();
        let b = service
            .issue_at("lobby", Uid::Int(7), now + ChronoDuration::seconds(5))
            .unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!((b.expires_at - a.expires_at).num_seconds(), 5);
    }

    #[test]
    fn nan_uid_reaches_builder() {
        let builder = Arc::new(RecordingBuilder::default());
        let service = service_with(builder.clone());

        service.issue("lobby", Uid::NaN).unwrap();
        assert_eq!(builder.calls()[0].uid, Uid::NaN);
    }

    #[test]
    fn builder_failure_propagates() {
        let service = service_with(Arc::new(FailingBuilder));
        let err = service.issue("lobby", Uid::Int(7)).unwrap_err();
        assert_eq!(err, TokenBuildError::InvalidAppCertificate);
    }
}

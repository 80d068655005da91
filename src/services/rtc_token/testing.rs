//! Builder stubs for exercising the service and handlers without real signing.

use std::sync::Mutex;

use super::{RtcCredentials, RtcRole, TokenBuildError, TokenBuilder, Uid};

pub const APP_ID: &str = "e699bb8476824950a5e0c382274bde54";
pub const APP_CERT: &str = "03104b75504e407fb38d08f6dbb93864";

pub fn credentials() -> RtcCredentials {
    RtcCredentials::new(APP_ID, APP_CERT)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildCall {
    pub app_id: String,
    pub app_certificate: String,
    pub channel_name: String,
    pub uid: Uid,
    pub role: RtcRole,
    pub privilege_expires_at: i64,
}

/// Deterministic builder: the token is a function of its inputs. Records every call.
#[derive(Default)]
pub struct RecordingBuilder {
    calls: Mutex<Vec<BuildCall>>,
}

impl RecordingBuilder {
    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl TokenBuilder for RecordingBuilder {
    fn build_token_with_uid(
        &self,
        credentials: &RtcCredentials,
        channel_name: &str,
        uid: Uid,
        role: RtcRole,
        privilege_expires_at: i64,
    ) -> Result<String, TokenBuildError> {
        self.calls.lock().unwrap().push(BuildCall {
            app_id: credentials.app_id().to_string(),
            app_certificate: credentials.app_certificate().to_string(),
            channel_name: channel_name.to_string(),
            uid,
            role,
            privilege_expires_at,
        });
        Ok(format!("stub:{channel_name}:{uid}:{role:?}:{privilege_expires_at}"))
    }
}

/// Always fails, as a builder given bad credentials would.
pub struct FailingBuilder;

impl TokenBuilder for FailingBuilder {
    fn build_token_with_uid(
        &self,
        _credentials: &RtcCredentials,
        _channel_name: &str,
        _uid: Uid,
        _role: RtcRole,
        _privilege_expires_at: i64,
    ) -> Result<String, TokenBuildError> {
        Err(TokenBuildError::InvalidAppCertificate)
    }
}

//! AccessToken2 (`007`) encoder for RTC channel tokens.
//!
//! Layout: `"007" + base64(zlib(pack_bytes(signature) + content))`, where
//! `content` is the little-endian packed app id, issue time, expire window,
//! salt and one RTC service (privileges, channel name, account).
//!
//! Signing key: `HMAC(key=issue_ts, data=app_certificate)`, then
//! `HMAC(key=salt, data=previous)`. The signature is `HMAC(signing_key, content)`.

use std::collections::BTreeMap;
use std::io::Write as _;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use super::{RtcCredentials, RtcRole, TokenBuildError, TokenBuilder, Uid};

type HmacSha256 = Hmac<Sha256>;

pub const VERSION: &str = "007";

const SERVICE_TYPE_RTC: u16 = 1;

const PRIVILEGE_JOIN_CHANNEL: u16 = 1;
const PRIVILEGE_PUBLISH_AUDIO: u16 = 2;
const PRIVILEGE_PUBLISH_VIDEO: u16 = 3;
const PRIVILEGE_PUBLISH_DATA: u16 = 4;

const MAX_SALT: u32 = 99_999_999;

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessToken2Builder;

impl AccessToken2Builder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a token for a fixed issue time and salt.
    ///
    /// `expires_at` is absolute unix seconds; the token stores it relative to
    /// `issued_at`, for both the token and every privilege.
    #[allow(clippy::too_many_arguments)]
    pub fn build_at(
        &self,
        credentials: &RtcCredentials,
        channel_name: &str,
        uid: Uid,
        role: RtcRole,
        expires_at: i64,
        issued_at: u32,
        salt: u32,
    ) -> Result<String, TokenBuildError> {
        if !is_hex_id(credentials.app_id()) {
            return Err(TokenBuildError::InvalidAppId);
        }
        if !is_hex_id(credentials.app_certificate()) {
            return Err(TokenBuildError::InvalidAppCertificate);
        }

        let expire = expire_window(i64::from(issued_at), expires_at)?;

        let mut privileges = BTreeMap::new();
        privileges.insert(PRIVILEGE_JOIN_CHANNEL, expire);
        if role == RtcRole::Publisher {
            privileges.insert(PRIVILEGE_PUBLISH_AUDIO, expire);
            privileges.insert(PRIVILEGE_PUBLISH_VIDEO, expire);
            privileges.insert(PRIVILEGE_PUBLISH_DATA, expire);
        }

        let mut content = Vec::new();
        pack_string(&mut content, credentials.app_id(), "app id")?;
        pack_u32(&mut content, issued_at);
        pack_u32(&mut content, expire);
        pack_u32(&mut content, salt);

        // One service: RTC.
        pack_u16(&mut content, 1);
        pack_u16(&mut content, SERVICE_TYPE_RTC);
        pack_u16(&mut content, privileges.len() as u16);
        for (&key, &value) in &privileges {
            pack_u16(&mut content, key);
            pack_u32(&mut content, value);
        }
        pack_string(&mut content, channel_name, "channel name")?;
        pack_string(&mut content, &uid.account(), "uid")?;

        let signing_key = signing_key(credentials.app_certificate(), issued_at, salt);
        let signature = hmac_sha256(&signing_key, &content);

        let mut payload = Vec::with_capacity(2 + signature.len() + content.len());
        pack_string_bytes(&mut payload, &signature);
        payload.extend_from_slice(&content);

        let compressed = zlib_compress(&payload)?;
        Ok(format!("{VERSION}{}", STANDARD.encode(compressed)))
    }
}

impl TokenBuilder for AccessToken2Builder {
    fn build_token_with_uid(
        &self,
        credentials: &RtcCredentials,
        channel_name: &str,
        uid: Uid,
        role: RtcRole,
        privilege_expires_at: i64,
    ) -> Result<String, TokenBuildError> {
        let issued_at = issue_time(Utc::now().timestamp())?;
        let salt = rand::thread_rng().gen_range(1..=MAX_SALT);

        self.build_at(
            credentials,
            channel_name,
            uid,
            role,
            privilege_expires_at,
            issued_at,
            salt,
        )
    }
}

fn is_hex_id(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn issue_time(now: i64) -> Result<u32, TokenBuildError> {
    u32::try_from(now).map_err(|_| TokenBuildError::IssueTimeOutOfRange { now })
}

fn expire_window(issued_at: i64, expires_at: i64) -> Result<u32, TokenBuildError> {
    let seconds = expires_at - issued_at;
    if seconds <= 0 {
        return Err(TokenBuildError::ExpirationNotAfterIssue {
            issued_at,
            expires_at,
        });
    }
    u32::try_from(seconds).map_err(|_| TokenBuildError::ExpirationOutOfRange { seconds })
}

fn signing_key(app_certificate: &str, issued_at: u32, salt: u32) -> Vec<u8> {
    let first = hmac_sha256(&issued_at.to_le_bytes(), app_certificate.as_bytes());
    hmac_sha256(&salt.to_le_bytes(), &first)
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn zlib_compress(data: &[u8]) -> Result<Vec<u8>, TokenBuildError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| TokenBuildError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| TokenBuildError::Compression(e.to_string()))
}

// Little-endian packing.

fn pack_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn pack_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn pack_string(buf: &mut Vec<u8>, value: &str, field: &'static str) -> Result<(), TokenBuildError> {
    if value.len() > usize::from(u16::MAX) {
        return Err(TokenBuildError::FieldTooLong {
            field,
            max: usize::from(u16::MAX),
        });
    }
    pack_string_bytes(buf, value.as_bytes());
    Ok(())
}

fn pack_string_bytes(buf: &mut Vec<u8>, value: &[u8]) {
    pack_u16(buf, value.len() as u16);
    buf.extend_from_slice(value);
}

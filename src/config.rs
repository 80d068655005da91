/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, AGORA_APP_ID, AGORA_APP_CERTIFICATE など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::rtc_token::RtcCredentials;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub rtc_credentials: RtcCredentials,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// `from_env` is the only production caller; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let app_id = required(&lookup, "AGORA_APP_ID")?;
        let app_certificate = required(&lookup, "AGORA_APP_CERTIFICATE")?;

        Ok(Self {
            addr,
            app_env,
            rtc_credentials: RtcCredentials::new(app_id, app_certificate),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const APP_ID: &str = "e699bb8476824950a5e0c382274bde54";
    const APP_CERT: &str = "03104b75504e407fb38d08f6dbb93864";

    #[test]
    fn defaults_port_and_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("AGORA_APP_ID", APP_ID),
            ("AGORA_APP_CERTIFICATE", APP_CERT),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.rtc_credentials.app_id(), APP_ID);
        assert_eq!(config.rtc_credentials.app_certificate(), APP_CERT);
    }

    #[test]
    fn reads_port_and_production_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("APP_ENV", "PROD"),
            ("AGORA_APP_ID", APP_ID),
            ("AGORA_APP_CERTIFICATE", APP_CERT),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert!(config.app_env.is_production());
    }

    #[test]
    fn missing_credentials_fail() {
        let err = Config::from_lookup(lookup_from(&[("AGORA_APP_CERTIFICATE", APP_CERT)]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("AGORA_APP_ID"));

        let err = Config::from_lookup(lookup_from(&[
            ("AGORA_APP_ID", APP_ID),
            ("AGORA_APP_CERTIFICATE", "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("AGORA_APP_CERTIFICATE"));
    }

    #[test]
    fn bad_port_is_invalid() {
        let err = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("AGORA_APP_ID", APP_ID),
            ("AGORA_APP_CERTIFICATE", APP_CERT),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn debug_output_hides_certificate() {
        let config = Config::from_lookup(lookup_from(&[
            ("AGORA_APP_ID", APP_ID),
            ("AGORA_APP_CERTIFICATE", APP_CERT),
        ]))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(rendered.contains(APP_ID));
        assert!(!rendered.contains(APP_CERT));
    }
}

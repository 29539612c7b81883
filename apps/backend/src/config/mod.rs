//! Process configuration, read once from the environment at startup.
//!
//! Environment variables must be set by the runtime environment (container
//! env file, or sourced manually for local runs). Missing required values
//! abort startup.

pub mod magic_link;

use std::env;

use url::Url;

use crate::error::AppError;
use crate::mail::SmtpSettings;
use crate::provider::SupabaseConfig;
use crate::state::security_config::SecurityConfig;
pub use magic_link::{MagicLinkSettings, ProvisioningMode};

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Session cookie attributes that may vary per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieSettings {
    /// Set the `Secure` attribute (disable only for plain-http local runs)
    pub secure: bool,
}

impl Default for SessionCookieSettings {
    fn default() -> Self {
        Self { secure: true }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub security: SecurityConfig,
    pub supabase: SupabaseConfig,
    pub smtp: SmtpSettings,
    pub magic_link: MagicLinkSettings,
    pub session_cookie: SessionCookieSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| AppError::config(format!("{key} must be set")))
        };

        let host = get("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_port("BACKEND_PORT", get("BACKEND_PORT"), 8000)?;

        let mut security = SecurityConfig::new(require("SUPABASE_JWT_SECRET")?.into_bytes());
        if let Some(aud) = get("SUPABASE_JWT_AUDIENCE") {
            security = security.with_audience(aud);
        }

        let supabase = SupabaseConfig {
            url: parse_url("SUPABASE_URL", &require("SUPABASE_URL")?)?,
            service_role_key: require("SUPABASE_SERVICE_ROLE")?,
        };

        let smtp = SmtpSettings {
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: parse_port("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            username: require("SMTP_USER")?,
            password: require("SMTP_PASS")?,
            from: get("SMTP_FROM"),
        };

        let frontend_url = get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let provisioning = get("MAGIC_LINK_PROVISIONING")
            .unwrap_or_default()
            .parse::<ProvisioningMode>()?;
        let magic_link =
            MagicLinkSettings::new(parse_url("FRONTEND_URL", &frontend_url)?, provisioning);

        let session_cookie = SessionCookieSettings {
            secure: match get("SESSION_COOKIE_SECURE") {
                None => true,
                Some(raw) => raw.parse::<bool>().map_err(|_| {
                    AppError::config("SESSION_COOKIE_SECURE must be `true` or `false`")
                })?,
            },
        };

        Ok(Self {
            host,
            port,
            database_url: require("DATABASE_URL")?,
            security,
            supabase,
            smtp,
            magic_link,
            session_cookie,
        })
    }
}

fn parse_port(key: &str, raw: Option<String>, default: u16) -> Result<u16, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("{key} must be a valid port number"))),
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::config(format!("{key} is not a valid URL: {e}")))
}

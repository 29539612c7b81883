use std::sync::Arc;

use url::Url;

use crate::adapters::users_sea::UserDirectorySea;
use crate::config::{AppConfig, MagicLinkSettings, ProvisioningMode, SessionCookieSettings};
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::mail::{Notifier, SmtpNotifier};
use crate::provider::{IdentityProvider, SupabaseAdminClient};
use crate::repos::users::IdentityDirectory;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    magic_link: Option<MagicLinkSettings>,
    session_cookie: SessionCookieSettings,
    directory: Option<Arc<dyn IdentityDirectory>>,
    provider: Option<Arc<dyn IdentityProvider>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            magic_link: None,
            session_cookie: SessionCookieSettings::default(),
            directory: None,
            provider: None,
            notifier: None,
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_magic_link(mut self, settings: MagicLinkSettings) -> Self {
        self.magic_link = Some(settings);
        self
    }

    pub fn with_session_cookie(mut self, settings: SessionCookieSettings) -> Self {
        self.session_cookie = settings;
        self
    }

    pub fn with_directory(mut self, directory: Arc<dyn IdentityDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Wire the production collaborators described by `config`: the sea-orm
    /// directory, the Supabase admin client and the SMTP notifier.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let db = connect_db(&config.database_url).await?;

        Ok(Self::new()
            .with_security(config.security.clone())
            .with_magic_link(config.magic_link.clone())
            .with_session_cookie(config.session_cookie)
            .with_directory(Arc::new(UserDirectorySea::new(db)))
            .with_provider(Arc::new(SupabaseAdminClient::new(config.supabase.clone())))
            .with_notifier(Arc::new(SmtpNotifier::new(config.smtp.clone()))))
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let missing = |what: &str| AppError::config(format!("{what} not configured"));

        let magic_link = match self.magic_link {
            Some(settings) => settings,
            None => MagicLinkSettings::new(
                Url::parse("http://localhost:5173")
                    .map_err(|e| AppError::config(format!("default frontend URL: {e}")))?,
                ProvisioningMode::Strict,
            ),
        };

        Ok(AppState {
            directory: self.directory.ok_or_else(|| missing("identity directory"))?,
            provider: self.provider.ok_or_else(|| missing("identity provider"))?,
            notifier: self.notifier.ok_or_else(|| missing("notifier"))?,
            security: self.security_config,
            magic_link,
            session_cookie: self.session_cookie,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::config::{MagicLinkSettings, SessionCookieSettings};
use crate::mail::Notifier;
use crate::provider::IdentityProvider;
use crate::repos::users::IdentityDirectory;

/// Application state shared by all workers.
///
/// External collaborators are injected as trait objects so tests can swap
/// in fakes; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn IdentityDirectory>,
    pub provider: Arc<dyn IdentityProvider>,
    pub notifier: Arc<dyn Notifier>,
    /// Session token verification settings
    pub security: SecurityConfig,
    pub magic_link: MagicLinkSettings,
    pub session_cookie: SessionCookieSettings,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("magic_link", &self.magic_link)
            .field("session_cookie", &self.session_cookie)
            .finish_non_exhaustive()
    }
}

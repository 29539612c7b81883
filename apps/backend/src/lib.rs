#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod mail;
pub mod middleware;
pub mod provider;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::{verify_session_token, verify_token_subject, SessionClaims, VerifiedIdentity};
pub use config::{AppConfig, MagicLinkSettings, ProvisioningMode, SessionCookieSettings};
pub use error::AppError;
pub use extractors::{AuthToken, CookieUser, CurrentUser, SessionCookie};
pub use infra::db::connect_db;
pub use infra::state::{build_state, StateBuilder};
pub use mail::Notifier;
pub use middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
pub use provider::IdentityProvider;
pub use repos::users::{IdentityDirectory, Role, UserRecord};
pub use state::{AppState, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}

//! External identity provider that signs magic-link tokens.

pub mod supabase;

use async_trait::async_trait;

pub use supabase::{SupabaseAdminClient, SupabaseConfig};

/// Result of a link-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLink {
    /// Verification URL embedding the single-use token; `None` when the
    /// provider answered without one.
    pub action_link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider {operation} returned {status}: {detail}")]
    Api {
        operation: &'static str,
        status: u16,
        detail: String,
    },
}

/// Admin-side operations this service needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask the provider for a signed `magiclink` for `email` that redirects to
    /// `redirect_to` once verified.
    async fn generate_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<GeneratedLink, ProviderError>;
}

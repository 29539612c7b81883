//! Magic-link issuance settings.

use std::str::FromStr;

use url::Url;

use crate::error::AppError;

/// What to do when a magic link is requested for an email the directory
/// does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisioningMode {
    /// Reject with 404
    #[default]
    Strict,
    /// Insert the address with role `user` and continue
    AutoProvision,
}

impl FromStr for ProvisioningMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "strict" => Ok(Self::Strict),
            "auto" | "auto-provision" | "auto_provision" => Ok(Self::AutoProvision),
            other => Err(AppError::config(format!(
                "MAGIC_LINK_PROVISIONING must be `strict` or `auto`, got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MagicLinkSettings {
    /// Frontend origin that hosts `/admin`, `/dashboard` and `/magic-callback`
    pub frontend_url: Url,
    pub provisioning: ProvisioningMode,
}

impl MagicLinkSettings {
    pub fn new(frontend_url: Url, provisioning: ProvisioningMode) -> Self {
        Self {
            frontend_url,
            provisioning,
        }
    }

    /// `frontend_url` with `segment` appended to its path.
    pub fn frontend_route(&self, segment: &str) -> Url {
        let mut url = self.frontend_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}/{segment}"));
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{GeneratedLink, IdentityProvider, ProviderError};
use crate::logging::pii::{redact_link, Redacted};

const GENERATE_LINK_PATH: &str = "auth/v1/admin/generate_link";

/// Connection settings for the Supabase (GoTrue) admin API.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Url,
    pub service_role_key: String,
}

/// Admin API client authenticated with the service-role key.
pub struct SupabaseAdminClient {
    config: SupabaseConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateLinkRequest<'a> {
    #[serde(rename = "type")]
    link_type: &'static str,
    email: &'a str,
    redirect_to: &'a str,
}

#[derive(Debug, Deserialize, Default)]
struct LinkProperties {
    #[serde(default)]
    action_link: Option<String>,
}

/// GoTrue answers with the user object flattened next to the link fields;
/// some proxies nest the link under `properties` instead.
#[derive(Debug, Deserialize, Default)]
struct GenerateLinkResponse {
    #[serde(default)]
    action_link: Option<String>,
    #[serde(default)]
    properties: Option<LinkProperties>,
}

impl GenerateLinkResponse {
    fn into_action_link(self) -> Option<String> {
        self.action_link
            .or_else(|| self.properties.and_then(|p| p.action_link))
            .filter(|link| !link.trim().is_empty())
    }
}

impl SupabaseAdminClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    fn endpoint(&self) -> Url {
        let mut base = self.config.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        // Joining a relative path onto a directory-style base cannot fail.
        base.join(GENERATE_LINK_PATH).unwrap_or(base)
    }

    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, ProviderError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Api {
            operation,
            status,
            detail: Redacted(&body).to_string(),
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAdminClient {
    async fn generate_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<GeneratedLink, ProviderError> {
        let payload = GenerateLinkRequest {
            link_type: "magiclink",
            email,
            redirect_to,
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("apikey", &self.config.service_role_key)
            .bearer_auth(&self.config.service_role_key)
            .json(&payload)
            .send()
            .await?;

        let response = Self::ensure_success(response, "generate_link").await?;
        let body = response.json::<GenerateLinkResponse>().await?;
        let action_link = body.into_action_link();

        debug!(
            email = %Redacted(email),
            action_link = %action_link.as_deref().map(redact_link).unwrap_or_default(),
            "generate_link answered"
        );

        Ok(GeneratedLink { action_link })
    }
}

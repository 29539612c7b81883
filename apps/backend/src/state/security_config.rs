use jsonwebtoken::Algorithm;

/// Verification settings for provider-issued session tokens.
///
/// One secret, one algorithm. Tokens signed any other way are rejected.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared HMAC secret (the provider's JWT secret)
    pub jwt_secret: Vec<u8>,
    /// Pinned signing algorithm (HS256)
    pub algorithm: Algorithm,
    /// Expected `aud` claim; `None` skips audience validation
    pub audience: Option<String>,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            audience: None,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}

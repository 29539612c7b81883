use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Regex patterns used for PII redaction.
///
/// All patterns are vetted literals, so construction cannot fail.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Standard email addresses
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Opaque base64/base64url-like runs of 16 chars or more (JWT segments, OTP hashes)
    pub fn opaque_token() -> &'static Regex {
        static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/_-]{16,}={0,2}\b").unwrap()
        });
        &TOKEN_REGEX
    }
}

/// Masks emails (first character of the local part is kept) and opaque tokens.
///
/// Emails are processed first so the domain survives token masking.
pub fn redact(input: &str) -> String {
    let email_redacted = PiiRegexRegistry::email().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(0) | None => full_match.to_string(),
            Some(at_pos) => {
                let first_char = &full_match[..1];
                format!("{first_char}***{}", &full_match[at_pos..])
            }
        }
    });

    PiiRegexRegistry::opaque_token()
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// Drops the query string and fragment of a link, which is where magic-link
/// tokens and redirect targets live.
pub fn redact_link(link: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            let had_query = url.query().is_some();
            url.set_query(None);
            url.set_fragment(None);
            if had_query {
                format!("{url}?[REDACTED]")
            } else {
                url.to_string()
            }
        }
        Err(_) => "[UNPARSEABLE_LINK]".to_string(),
    }
}

/// Wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

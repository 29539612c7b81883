use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Magic link requested for an email the directory does not know.
pub fn unknown_email(email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_UNKNOWN_EMAIL",
        %trace_id,
        email = %Redacted(email),
        "Magic link requested for unknown email"
    );
}

/// A presented credential was rejected. `source` is `header`, `cookie` or `callback`.
pub fn token_rejected(source: &'static str, reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        source,
        reason,
        "Session token rejected"
    );
}

/// A provider token was promoted to a session cookie.
pub fn session_established(subject: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_SESSION_ESTABLISHED",
        %trace_id,
        subject = %Redacted(subject),
        "Session cookie issued"
    );
}

//! Magic-link issuance: directory check, role-based redirect, provider link
//! generation, redirect override and delivery.

use std::str::FromStr;
use std::sync::LazyLock;

use lettre::Address;
use regex::Regex;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::config::{MagicLinkSettings, ProvisioningMode};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::logging::pii::{redact_link, Redacted};
use crate::logging::security;
use crate::repos::users::{Role, UserRecord};
use crate::state::app_state::AppState;

const REDIRECT_PARAM: &str = "redirect_to";

/// Outcome of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct MagicLinkSent {
    /// Address the link was sent to
    pub email: String,
    /// Where the link lands after verification
    pub redirect_to: Url,
}

impl MagicLinkSent {
    pub fn message(&self) -> String {
        format!("Magic link sent! Check {} for the email.", self.email)
    }
}

fn email_shape() -> &'static Regex {
    static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").unwrap()
    });
    &EMAIL_SHAPE
}

/// Trim, NFKC-normalize and lowercase the domain of an email address,
/// rejecting anything that isn't `local@domain.tld` shaped.
///
/// The local part keeps its case; directory lookups match it exactly.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let invalid = || AppError::invalid(ErrorCode::InvalidEmail, "value is not a valid email address");

    let normalized: String = raw.trim().nfkc().collect();
    if !email_shape().is_match(&normalized) {
        return Err(invalid());
    }
    let (local, domain) = normalized.rsplit_once('@').ok_or_else(invalid)?;
    let email = format!("{local}@{}", domain.to_lowercase());

    // Must also be deliverable: the notifier parses the same mailbox syntax.
    Address::from_str(&email).map_err(|_| invalid())?;
    Ok(email)
}

/// Admins land on `/admin`, everyone else on `/dashboard`.
pub fn redirect_target(settings: &MagicLinkSettings, role: Role) -> Url {
    match role {
        Role::Admin => settings.frontend_route("admin"),
        Role::User => settings.frontend_route("dashboard"),
    }
}

/// Set the `redirect_to` query parameter of `action_link` to `target`.
///
/// The first existing `redirect_to` is replaced in place and any duplicates
/// dropped; if none exists it is appended. Other parameters keep their order.
pub fn override_redirect(action_link: &str, target: &Url) -> Result<String, url::ParseError> {
    let mut url = Url::parse(action_link)?;

    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == REDIRECT_PARAM {
            if !replaced {
                pairs.push((key.into_owned(), target.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }
    if !replaced {
        pairs.push((REDIRECT_PARAM.to_string(), target.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url.to_string())
}

async fn resolve_user(state: &AppState, email: &str) -> Result<UserRecord, AppError> {
    if let Some(user) = state.directory.find_by_email(email).await? {
        return Ok(user);
    }

    match state.magic_link.provisioning {
        ProvisioningMode::Strict => {
            security::unknown_email(email);
            Err(AppError::not_found(ErrorCode::UserNotFound, "User not found"))
        }
        ProvisioningMode::AutoProvision => {
            match state.directory.create_user(email, Role::User).await {
                Ok(user) => Ok(user),
                // Lost a race with a concurrent first request for the same address.
                Err(DomainError::Conflict(ConflictKind::UniqueEmail, _)) => state
                    .directory
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found")),
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Issue a magic link for `raw_email` and mail it to the user.
pub async fn request_magic_link(
    state: &AppState,
    raw_email: &str,
) -> Result<MagicLinkSent, AppError> {
    let email = normalize_email(raw_email)?;
    let user = resolve_user(state, &email).await?;

    let target = redirect_target(&state.magic_link, user.role);

    let generated = state
        .provider
        .generate_magic_link(&user.email, target.as_str())
        .await
        .map_err(|e| {
            warn!(email = %Redacted(&email), error = %e, "Magic link generation request failed");
            AppError::internal(ErrorCode::ProviderError, e.to_string())
        })?;

    let action_link = generated.action_link.ok_or_else(|| {
        AppError::internal(
            ErrorCode::MagicLinkGenerationFailed,
            "Magic link generation failed",
        )
    })?;

    let action_link = override_redirect(&action_link, &target).map_err(|e| {
        AppError::internal(
            ErrorCode::ProviderError,
            format!("identity provider returned an unusable action link: {e}"),
        )
    })?;

    state
        .notifier
        .send_login_email(&user.email, &action_link, user.display_name())
        .await?;

    info!(
        email = %Redacted(&user.email),
        role = user.role.as_str(),
        redirect_to = %target,
        action_link = %redact_link(&action_link),
        "Magic link sent"
    );

    Ok(MagicLinkSent {
        email,
        redirect_to: target,
    })
}

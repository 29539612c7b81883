use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::config::SessionCookieSettings;
use crate::AppError;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Lifetime of the session cookie.
pub const SESSION_MAX_AGE: Duration = Duration::days(1);

/// Raw token from the `session` cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub token: String,
}

impl FromRequest for SessionCookie {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req
            .cookie(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .map(|token| SessionCookie { token })
            .ok_or_else(AppError::unauthorized_no_session_cookie);

        std::future::ready(token)
    }
}

/// Build the cookie that carries a verified provider token verbatim.
pub fn session_cookie(token: &str, settings: SessionCookieSettings) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME, token.to_string())
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(SESSION_MAX_AGE)
        .finish()
}

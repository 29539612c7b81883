use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::auth::claims::VerifiedIdentity;
use crate::auth::jwt::verify_session_token;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::auth_token::AuthToken;
use crate::extractors::session_cookie::SessionCookie;
use crate::logging::security;
use crate::state::app_state::AppState;

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal(ErrorCode::InternalError, "AppState not available"))
}

/// Identity proven by an `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub VerifiedIdentity);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let token = AuthToken::from_request(req, payload);
        let state = app_state(req);

        Box::pin(async move {
            let token = token.await?;
            let state = state?;

            verify_session_token(&token.token, &state.security)
                .map(CurrentUser)
                .map_err(|reason| {
                    security::token_rejected("header", reason.as_str());
                    AppError::unauthorized_invalid_token()
                })
        })
    }
}

/// Identity proven by the `session` cookie.
#[derive(Debug, Clone)]
pub struct CookieUser(pub VerifiedIdentity);

impl FromRequest for CookieUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let cookie = SessionCookie::from_request(req, payload);
        let state = app_state(req);

        Box::pin(async move {
            let cookie = cookie.await?;
            let state = state?;

            verify_session_token(&cookie.token, &state.security)
                .map(CookieUser)
                .map_err(|reason| {
                    security::token_rejected("cookie", reason.as_str());
                    AppError::unauthorized_invalid_session_cookie()
                })
        })
    }
}

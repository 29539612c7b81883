use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Raw bearer token from the `Authorization` header.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    /// Parse `Bearer <token>`; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                Some(AuthToken {
                    token: token.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(AuthToken::parse)
            .ok_or_else(AppError::unauthorized_missing_bearer);

        std::future::ready(token)
    }
}

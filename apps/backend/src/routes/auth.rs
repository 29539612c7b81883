use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::verify_token_subject;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::{CookieUser, CurrentUser};
use crate::extractors::session_cookie::session_cookie;
use crate::logging::security;
use crate::services::magic_link;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    #[serde(rename = "Email", alias = "email")]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub token: Option<String>,
}

/// Look up the user, mint a provider magic link pointing at the role's
/// landing page and email it.
async fn request_magic_link(
    body: web::Json<MagicLinkRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let sent = magic_link::request_magic_link(&app_state, &body.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: sent.message(),
    }))
}

async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user.0))
}

async fn me_cookie(user: CookieUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user.0))
}

/// Promote a provider token into the `session` cookie. Nothing is set
/// unless the token verifies and carries a subject.
async fn establish_session(
    query: web::Query<CallbackQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = query
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request(ErrorCode::MissingToken, "Missing token"))?;

    let claims = verify_token_subject(token, &app_state.security).map_err(|reason| {
        security::token_rejected("callback", reason.as_str());
        AppError::unauthorized_invalid_token()
    })?;

    security::session_established(claims.sub.as_deref().unwrap_or_default());

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, app_state.session_cookie))
        .json(MessageResponse {
            message: "Session established".to_string(),
        }))
}

/// Provider redirects that pass through the backend are bounced to the
/// frontend callback route, which reads the tokens from the URL fragment.
async fn callback_redirect(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut target = app_state.magic_link.frontend_route("magic-callback");
    let query = req.query_string();
    if !query.is_empty() {
        target.set_query(Some(query));
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, target.to_string()))
        .finish())
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid request body: {err}")).into()
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/request-magic-link").route(web::post().to(request_magic_link)))
        .service(web::resource("/me").route(web::get().to(me)))
        .service(web::resource("/me-cookie").route(web::get().to(me_cookie)))
        .service(
            web::resource("/callback")
                .route(web::post().to(establish_session))
                .route(web::get().to(callback_redirect)),
        );
}

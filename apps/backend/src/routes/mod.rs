use actix_web::web;

pub mod auth;

/// Mount every route group under its scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Auth routes: /auth/**
    cfg.service(web::scope("/auth").configure(auth::configure_routes));
}

use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Origins the Co-Buy frontends are served from during development.
const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
];

/// Parse a comma-separated origin list, keeping only http(s) entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// CORS for browser clients. Credentials are allowed so the `session`
/// cookie travels with cross-origin requests; origins therefore have to be
/// listed explicitly (`CORS_ALLOWED_ORIGINS`).
pub fn cors_middleware() -> Cors {
    let configured = parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
    let origins: Vec<String> = if configured.is_empty() {
        DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        configured
    };

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

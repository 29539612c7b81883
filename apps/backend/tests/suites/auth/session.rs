// Integration tests for GET /auth/me and GET /auth/me-cookie.

use actix_web::cookie::Cookie;
use actix_web::test;
use cobuy_backend::state::SecurityConfig;
use serde_json::{json, Value};

use crate::common::assert_problem_details_structure;
use crate::support::tokens::{
    expired_token, now_secs, sign, user_claims, valid_token, TEST_SECRET,
};
use crate::support::{create_test_app, harness};

fn me_with_bearer(token: &str) -> actix_http::Request {
    test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request()
}

fn me_cookie_with(token: &str) -> actix_http::Request {
    test::TestRequest::get()
        .uri("/auth/me-cookie")
        .cookie(Cookie::new("session", token.to_string()))
        .to_request()
}

// ============================================================================
// Header-based
// ============================================================================

#[actix_web::test]
async fn me_returns_verified_identity() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let token = valid_token("8f3c0c9e-user", "a@x.com", "Admin");
    let resp = test::call_service(&app, me_with_bearer(&token)).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "id": "8f3c0c9e-user", "email": "a@x.com", "role": "admin", "Name": "a@x.com" })
    );
}

#[actix_web::test]
async fn me_uses_name_claim_and_defaults_role() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let mut claims = user_claims("u-2", "b@x.com", "authenticated");
    claims["name"] = json!("Bea");
    let token = sign(&claims, TEST_SECRET);

    let resp = test::call_service(&app, me_with_bearer(&token)).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["Name"], "Bea");
    assert_eq!(body["role"], "user");
}

#[actix_web::test]
async fn me_rejects_expired_token() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let resp = test::call_service(&app, me_with_bearer(&expired_token("u-1", "a@x.com"))).await;

    assert_problem_details_structure(
        resp,
        401,
        "UNAUTHORIZED_INVALID_TOKEN",
        "Invalid or expired token",
    )
    .await;
}

#[actix_web::test]
async fn me_rejects_token_signed_with_other_secret() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let token = sign(&user_claims("u-1", "a@x.com", "admin"), "some-other-secret");
    let resp = test::call_service(&app, me_with_bearer(&token)).await;

    assert_problem_details_structure(
        resp,
        401,
        "UNAUTHORIZED_INVALID_TOKEN",
        "Invalid or expired token",
    )
    .await;
}

#[actix_web::test]
async fn me_rejects_tokens_missing_subject_or_email() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let no_email = sign(&json!({ "sub": "u-1", "exp": now_secs() + 600 }), TEST_SECRET);
    let no_sub = sign(
        &json!({ "email": "a@x.com", "exp": now_secs() + 600 }),
        TEST_SECRET,
    );

    for token in [no_email, no_sub] {
        let resp = test::call_service(&app, me_with_bearer(&token)).await;
        assert_problem_details_structure(
            resp,
            401,
            "UNAUTHORIZED_INVALID_TOKEN",
            "Invalid or expired token",
        )
        .await;
    }
}

#[actix_web::test]
async fn me_requires_bearer_header() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let missing = test::TestRequest::get().uri("/auth/me").to_request();
    let basic = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let empty = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", "Bearer"))
        .to_request();

    for req in [missing, basic, empty] {
        let resp = test::call_service(&app, req).await;
        assert_problem_details_structure(
            resp,
            401,
            "UNAUTHORIZED_MISSING_BEARER",
            "Missing or malformed Bearer token",
        )
        .await;
    }
}

#[actix_web::test]
async fn configured_audience_is_enforced() {
    let h = harness()
        .security(SecurityConfig::new(TEST_SECRET.as_bytes()).with_audience("authenticated"))
        .build()
        .await;
    let app = create_test_app(h.state).await;

    let good = valid_token("u-1", "a@x.com", "user");
    let resp = test::call_service(&app, me_with_bearer(&good)).await;
    assert_eq!(resp.status().as_u16(), 200);

    let mut claims = user_claims("u-1", "a@x.com", "user");
    claims["aud"] = json!("anon");
    let wrong_aud = sign(&claims, TEST_SECRET);
    let resp = test::call_service(&app, me_with_bearer(&wrong_aud)).await;
    assert_eq!(resp.status().as_u16(), 401);
}

// ============================================================================
// Cookie-based
// ============================================================================

#[actix_web::test]
async fn me_cookie_returns_identity() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let token = valid_token("u-9", "c@x.com", "user");
    let resp = test::call_service(&app, me_cookie_with(&token)).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "id": "u-9", "email": "c@x.com", "role": "user", "Name": "c@x.com" })
    );
}

#[actix_web::test]
async fn me_cookie_without_cookie() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let req = test::TestRequest::get().uri("/auth/me-cookie").to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_structure(
        resp,
        401,
        "UNAUTHORIZED_NO_SESSION_COOKIE",
        "No session cookie",
    )
    .await;
}

#[actix_web::test]
async fn me_cookie_with_invalid_cookie() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    for token in [
        "not-a-jwt".to_string(),
        expired_token("u-1", "a@x.com"),
        sign(&user_claims("u-1", "a@x.com", "user"), "some-other-secret"),
    ] {
        let resp = test::call_service(&app, me_cookie_with(&token)).await;
        assert_problem_details_structure(
            resp,
            401,
            "UNAUTHORIZED_INVALID_SESSION_COOKIE",
            "Invalid or expired session cookie",
        )
        .await;
    }
}

#[actix_web::test]
async fn bearer_header_does_not_satisfy_cookie_endpoint() {
    let h = harness().build().await;
    let app = create_test_app(h.state).await;

    let req = test::TestRequest::get()
        .uri("/auth/me-cookie")
        .insert_header((
            "Authorization",
            format!("Bearer {}", valid_token("u-1", "a@x.com", "user")),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
}

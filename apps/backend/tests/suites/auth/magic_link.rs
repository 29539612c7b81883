// Integration tests for POST /auth/request-magic-link.

use actix_web::test;
use cobuy_backend::config::ProvisioningMode;
use cobuy_backend::entities::users;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use url::Url;

use crate::common::assert_problem_details_structure;
use crate::support::app_builder::FRONTEND;
use crate::support::db::seed_user;
use crate::support::fakes::{FakeProvider, ProviderReply, RecordingNotifier};
use crate::support::{create_test_app, harness};

fn request(body: Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/auth/request-magic-link")
        .set_json(body)
        .to_request()
}

fn query_pairs(link: &str) -> Vec<(String, String)> {
    Url::parse(link)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

// ============================================================================
// Happy Path Tests
// ============================================================================

#[actix_web::test]
async fn admin_gets_admin_redirect_and_email() {
    let h = harness().build().await;
    seed_user(&h.db, "a@x.com", "Admin", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "a@x.com" }))).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Magic link sent! Check a@x.com for the email." }));

    let calls = h.provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].email, "a@x.com");
    assert_eq!(calls[0].redirect_to, format!("{FRONTEND}/admin"));

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert_eq!(sent[0].display_name, "a@x.com");
    assert_eq!(
        query_pairs(&sent[0].action_link),
        vec![
            ("token".to_string(), "pkce_abc123".to_string()),
            ("type".to_string(), "magiclink".to_string()),
            ("redirect_to".to_string(), format!("{FRONTEND}/admin")),
        ]
    );
}

#[actix_web::test]
async fn regular_user_lands_on_dashboard_and_is_greeted_by_name() {
    let h = harness().build().await;
    seed_user(&h.db, "pat@x.com", " user ", Some("Pat")).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "pat@x.com" }))).await;
    assert_eq!(resp.status().as_u16(), 200);

    assert_eq!(h.provider.calls()[0].redirect_to, format!("{FRONTEND}/dashboard"));
    let sent = h.notifier.sent();
    assert_eq!(sent[0].display_name, "Pat");
    assert!(sent[0]
        .action_link
        .ends_with("redirect_to=http%3A%2F%2Flocalhost%3A5173%2Fdashboard"));
}

#[actix_web::test]
async fn unknown_role_strings_are_treated_as_user() {
    let h = harness().build().await;
    seed_user(&h.db, "ops@x.com", "superuser", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "ops@x.com" }))).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(h.provider.calls()[0].redirect_to, format!("{FRONTEND}/dashboard"));
}

#[actix_web::test]
async fn lowercase_field_and_padded_address_are_accepted() {
    let h = harness().build().await;
    seed_user(&h.db, "a@x.com", "admin", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "email": "  a@X.com " }))).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Magic link sent! Check a@x.com for the email.");
    assert_eq!(h.notifier.sent()[0].to, "a@x.com");
}

// ============================================================================
// Provisioning
// ============================================================================

#[actix_web::test]
async fn strict_mode_rejects_unknown_email() {
    let h = harness().build().await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "nobody@x.com" }))).await;

    assert_problem_details_structure(resp, 404, "USER_NOT_FOUND", "User not found").await;
    assert!(h.provider.calls().is_empty());
    assert!(h.notifier.sent().is_empty());
}

#[actix_web::test]
async fn auto_provision_creates_plain_user() {
    let h = harness()
        .provisioning(ProvisioningMode::AutoProvision)
        .build()
        .await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "new@x.com" }))).await;
    assert_eq!(resp.status().as_u16(), 200);

    let row = users::Entity::find()
        .filter(users::Column::Email.eq("new@x.com"))
        .one(&h.db)
        .await
        .unwrap()
        .expect("user provisioned");
    assert_eq!(row.role, "user");
    assert_eq!(row.name, None);

    assert_eq!(h.provider.calls()[0].redirect_to, format!("{FRONTEND}/dashboard"));
    assert_eq!(h.notifier.sent()[0].to, "new@x.com");
}

#[actix_web::test]
async fn auto_provision_reuses_existing_record() {
    let h = harness()
        .provisioning(ProvisioningMode::AutoProvision)
        .build()
        .await;
    seed_user(&h.db, "a@x.com", "Admin", Some("Ada")).await;
    let app = create_test_app(h.state.clone()).await;

    for _ in 0..2 {
        let resp = test::call_service(&app, request(json!({ "Email": "a@x.com" }))).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    let count = users::Entity::find()
        .filter(users::Column::Email.eq("a@x.com"))
        .count(&h.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert!(h
        .provider
        .calls()
        .iter()
        .all(|c| c.redirect_to == format!("{FRONTEND}/admin")));
    assert_eq!(h.notifier.sent().len(), 2);
}

// ============================================================================
// Validation
// ============================================================================

#[actix_web::test]
async fn malformed_email_is_rejected() {
    let h = harness().build().await;
    let app = create_test_app(h.state.clone()).await;

    for bad in ["", "not-an-email", "a@b", "two words@x.com"] {
        let resp = test::call_service(&app, request(json!({ "Email": bad }))).await;
        assert_problem_details_structure(
            resp,
            400,
            "INVALID_EMAIL",
            "value is not a valid email address",
        )
        .await;
    }
    assert!(h.provider.calls().is_empty());
}

#[actix_web::test]
async fn undeliverable_address_is_rejected_before_provisioning() {
    let h = harness()
        .provisioning(ProvisioningMode::AutoProvision)
        .build()
        .await;
    let app = create_test_app(h.state.clone()).await;

    for bad in ["a@x..com", "a@.x.com", "a..b@x.com", "<a>@x.com"] {
        let resp = test::call_service(&app, request(json!({ "Email": bad }))).await;
        assert_problem_details_structure(
            resp,
            400,
            "INVALID_EMAIL",
            "value is not a valid email address",
        )
        .await;
    }

    let rows = users::Entity::find().count(&h.db).await.unwrap();
    assert_eq!(rows, 0);
    assert!(h.provider.calls().is_empty());
    assert!(h.notifier.sent().is_empty());
}

#[actix_web::test]
async fn missing_email_field_is_bad_request() {
    let h = harness().build().await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "address": "a@x.com" }))).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

// ============================================================================
// Upstream Failures
// ============================================================================

#[actix_web::test]
async fn provider_without_action_link_is_fatal() {
    let h = harness()
        .provider(FakeProvider::new(ProviderReply::NoLink))
        .build()
        .await;
    seed_user(&h.db, "a@x.com", "user", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "a@x.com" }))).await;

    assert_problem_details_structure(
        resp,
        500,
        "MAGIC_LINK_GENERATION_FAILED",
        "Magic link generation failed",
    )
    .await;
    assert!(h.notifier.sent().is_empty());
}

#[actix_web::test]
async fn provider_error_surfaces_message() {
    let h = harness()
        .provider(FakeProvider::new(ProviderReply::Fails {
            status: 422,
            detail: "Signups not allowed for this instance".to_string(),
        }))
        .build()
        .await;
    seed_user(&h.db, "a@x.com", "user", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "a@x.com" }))).await;

    assert_problem_details_structure(
        resp,
        500,
        "PROVIDER_ERROR",
        "identity provider generate_link returned 422: Signups not allowed for this instance",
    )
    .await;
    assert!(h.notifier.sent().is_empty());
}

#[actix_web::test]
async fn unparseable_action_link_is_internal_error() {
    let h = harness()
        .provider(FakeProvider::new(ProviderReply::Link(
            "/relative/verify?token=abc".to_string(),
        )))
        .build()
        .await;
    seed_user(&h.db, "a@x.com", "user", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "a@x.com" }))).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "PROVIDER_ERROR");
    assert!(h.notifier.sent().is_empty());
}

#[actix_web::test]
async fn delivery_failure_fails_the_request() {
    let h = harness()
        .notifier(RecordingNotifier::unconfigured("SMTP_USER and SMTP_PASS must be set"))
        .build()
        .await;
    seed_user(&h.db, "a@x.com", "user", None).await;
    let app = create_test_app(h.state.clone()).await;

    let resp = test::call_service(&app, request(json!({ "Email": "a@x.com" }))).await;

    assert_problem_details_structure(
        resp,
        500,
        "CONFIG_ERROR",
        "SMTP_USER and SMTP_PASS must be set",
    )
    .await;
    assert_eq!(h.provider.calls().len(), 1);
}

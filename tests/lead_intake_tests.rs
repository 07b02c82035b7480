#[macro_use]
mod test_utils;

use std::net::SocketAddr;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use portfolio_site::{entities::lead::NewLeadForm, errors::AppError};
use serde_json::{json, Value};
use test_utils::TestApp;

fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([198, 51, 100, last_octet], 40000))
}

fn lead_body(n: usize) -> Value {
    json!({
        "name": format!("Visitor {}", n),
        "email": format!("  Visitor{}@Example.COM ", n),
        "company": "Acme",
        "message": "I need a trading bot",
        "service_interest": "trading"
    })
}

fn lead_form(n: usize) -> NewLeadForm {
    serde_json::from_value(lead_body(n)).expect("valid lead form")
}

#[actix_rt::test]
async fn accepted_lead_is_stored_and_echoed() {
    let app = TestApp::new();
    let service = init_app!(app.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/leads")
        .peer_addr(peer(1))
        .set_json(lead_body(1))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Thank you for your interest! I will get back to you soon.");
    assert_eq!(body["data"]["email"], "visitor1@example.com");
    assert_eq!(body["data"]["service_interest"], "trading");
    assert!(body["data"].get("contacted").is_none());

    let rows = app.leads.rows.lock();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].contacted);
    assert_eq!(rows[0].notes, "");
}

#[actix_rt::test]
async fn sixth_submission_from_same_client_is_rejected() {
    let app = TestApp::new();
    let service = init_app!(app.state);

    for n in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/v1/leads")
            .peer_addr(peer(2))
            .set_json(lead_body(n))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED, "submission {} should pass", n);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/leads")
        .peer_addr(peer(2))
        .set_json(lead_body(6))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_header = resp
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .expect("Retry-After header");
    assert!(retry_header > 0 && retry_header <= 3600);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "rate_limited");
    assert_eq!(body["retry_after"].as_u64(), Some(retry_header));
    assert_eq!(app.lead_count(), 5);

    // Another client has its own budget.
    let req = test::TestRequest::post()
        .uri("/api/v1/leads")
        .peer_addr(peer(3))
        .set_json(lead_body(7))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(app.lead_count(), 6);
}

#[actix_rt::test]
async fn invalid_submission_reports_fields_and_stores_nothing() {
    let app = TestApp::new();
    let service = init_app!(app.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/leads")
        .peer_addr(peer(4))
        .set_json(json!({
            "name": "  ",
            "email": "not-an-email",
            "message": "",
            "service_interest": "design"
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .expect("details array")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    for field in ["email", "message", "name", "service_interest"] {
        assert!(fields.contains(&field), "missing error for {}", field);
    }

    assert_eq!(app.lead_count(), 0);
    assert_eq!(app.quota.count("198.51.100.4", Utc::now()), 0);
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let service = init_app!(app.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/leads")
        .peer_addr(peer(5))
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
    assert_eq!(app.lead_count(), 0);
}

#[actix_rt::test]
async fn quota_reopens_once_the_window_slides() {
    let app = TestApp::new();
    let handler = &app.state.lead_handler;
    let start = Utc::now() - Duration::hours(3);

    for n in 0..5 {
        let at = start + Duration::minutes(10 * n as i64);
        handler
            .submit_lead_at(lead_form(n), "203.0.113.9", at)
            .await
            .expect("within quota");
    }

    let denied = handler
        .submit_lead_at(lead_form(5), "203.0.113.9", start + Duration::minutes(59))
        .await;
    assert!(matches!(denied, Err(AppError::RateLimited { retry_after_secs: 60 })));

    handler
        .submit_lead_at(lead_form(6), "203.0.113.9", start + Duration::minutes(61))
        .await
        .expect("first event has left the window");
    assert_eq!(app.lead_count(), 6);
}

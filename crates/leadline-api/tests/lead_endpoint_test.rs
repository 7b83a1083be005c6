//! Integration tests for the lead endpoint.
//!
//! Drives `GET /` through the full router with an in-memory store and
//! checks precondition errors, routing, validation and persistence.

use std::time::Duration;

use http::StatusCode;
use leadline_api::PipelineSettings;
use leadline_testing::{QueryBuilder, TestApp};
use serde_json::json;

/// A request without any parameters gets the `data/missing` envelope.
#[tokio::test]
async fn no_parameters_reports_missing_data() {
    let app = TestApp::new();

    let response = app.get("/").await.expect("request");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().unwrap(), json!({"status": "error", "msg": "Missing ALL data."}));
}

#[tokio::test]
async fn missing_action_is_reported() {
    let app = TestApp::new();

    let response = app.send(&QueryBuilder::product_lead().without("action")).await.unwrap();

    assert_eq!(response.json().unwrap()["msg"], "Missing `action` data.");
}

#[tokio::test]
async fn missing_method_is_reported() {
    let app = TestApp::new();

    let response = app.send(&QueryBuilder::product_lead().without("method")).await.unwrap();

    assert_eq!(response.json().unwrap()["msg"], "Missing `method` data.");
}

#[tokio::test]
async fn missing_action_is_checked_before_missing_method() {
    let app = TestApp::new();

    let response = app.get("/?name=Bob").await.unwrap();

    assert_eq!(response.json().unwrap()["msg"], "Missing `action` data.");
}

#[tokio::test]
async fn action_outside_allowed_set_is_invalid() {
    let app = TestApp::new();

    for action in ["patch", "", "putt", "PUT", "Put"] {
        let query = QueryBuilder::product_lead().without("action").param("action", action);
        let response = app.send(&query).await.unwrap();

        assert_eq!(
            response.json().unwrap(),
            json!({"status": "error", "msg": "Action requested isn't allowed."}),
            "action {action:?}"
        );
    }
}

#[tokio::test]
async fn unknown_action_method_pairs_are_invalid() {
    let app = TestApp::new();

    for (action, method) in [
        ("get", "product_lead"),
        ("delete", "contact_lead"),
        ("put", "Product_Lead"),
        ("put", "lead"),
        ("put", ""),
    ] {
        let response = app.get(&format!("/?action={action}&method={method}")).await.unwrap();

        assert_eq!(
            response.json().unwrap(),
            json!({"status": "error", "msg": "Method requested doesn't exist."}),
            "pair ({action}, {method})"
        );
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn upper_case_action_is_rejected() {
    let app = TestApp::new();
    let query = QueryBuilder::contact_lead().without("action").param("action", "PUT");

    let response = app.send(&query).await.unwrap();

    assert_eq!(
        response.json().unwrap(),
        json!({"status": "error", "msg": "Action requested isn't allowed."})
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn product_lead_is_stored_and_id_returned() {
    let app = TestApp::new();
    let query = QueryBuilder::product_lead().param("email", " bob@acme.com ");

    let response = app.send(&query).await.unwrap();

    let body = response.json().unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["msg"],
        "One of our consultants will contact you as soon as possible. Thank you!"
    );
    assert_eq!(body["id"], 1);
    assert!(body.get("debug").is_none());

    let rows = app.store.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].columns, vec![
        ("DOMAIN".to_string(), "acme.com".to_string()),
        ("NAME".to_string(), "Bob".to_string()),
        ("TELEPHONE".to_string(), "555-1234".to_string()),
        ("PRODUCT".to_string(), "Widget".to_string()),
        ("EMAIL".to_string(), "bob@acme.com".to_string()),
        ("LEAD_TYPE".to_string(), "product".to_string()),
    ]);
}

#[tokio::test]
async fn consecutive_leads_get_distinct_ids() {
    let app = TestApp::new();

    let first = app.send(&QueryBuilder::contact_lead()).await.unwrap().json().unwrap();
    let second = app.send(&QueryBuilder::consultant_lead()).await.unwrap().json().unwrap();

    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);
    assert_eq!(app.store.rows().await[1].get("LEAD_TYPE"), Some("consultant"));
}

#[tokio::test]
async fn contact_lead_with_only_domain_lists_missing_fields() {
    let app = TestApp::new();
    let query = QueryBuilder::put(leadline_core::LeadKind::Contact).param("domain", "acme.com");

    let response = app.send(&query).await.unwrap();

    insta::assert_snapshot!(
        response.body,
        @r#"{"status":"error","msg":"Missing required data.","debug":["`name` is missing.","`telephone` is missing."]}"#
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn empty_values_count_as_missing() {
    let app = TestApp::new();
    let query = QueryBuilder::consultant_lead().without("email").param("email", "");

    let body = app.send(&query).await.unwrap().json().unwrap();

    assert_eq!(body["debug"], json!(["`email` is missing."]));
}

#[tokio::test]
async fn whitespace_only_fields_pass_validation_and_store_trimmed() {
    let app = TestApp::new();
    let query = QueryBuilder::contact_lead().without("name").param("name", "   ");

    let body = app.send(&query).await.unwrap().json().unwrap();

    assert_eq!(body["status"], "success");
    assert_eq!(app.store.rows().await[0].get("NAME"), Some(""));
}

#[tokio::test]
async fn store_failure_is_reported_without_details() {
    let app = TestApp::new();
    app.store.fail_inserts("FATAL: password authentication failed for user leads_rw").await;

    let response = app.send(&QueryBuilder::product_lead()).await.unwrap();

    assert_eq!(
        response.json().unwrap(),
        json!({"status": "error", "msg": "Problem occured on insertion into database."})
    );
    assert!(!response.body.contains("leads_rw"));
}

#[tokio::test]
async fn slow_store_times_out_as_insert_error() {
    let app = TestApp::with_settings(PipelineSettings {
        store_timeout: Duration::from_millis(20),
        ..PipelineSettings::default()
    });
    app.store.set_latency(Duration::from_millis(500)).await;

    let body = app.send(&QueryBuilder::contact_lead()).await.unwrap().json().unwrap();

    assert_eq!(body["msg"], "Problem occured on insertion into database.");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn missing_profile_is_reported_after_input_checks() {
    let app = TestApp::unconfigured("PRODUCTION");

    let missing_data = app.get("/").await.unwrap().json().unwrap();
    let lead = app.send(&QueryBuilder::product_lead()).await.unwrap().json().unwrap();

    assert_eq!(missing_data["msg"], "Missing ALL data.");
    assert_eq!(
        lead,
        json!({"status": "error", "msg": "Database configuration file is missing."})
    );
}

#[tokio::test]
async fn missing_profile_is_reported_before_unknown_method() {
    let app = TestApp::unconfigured("PRODUCTION");

    let response = app.get("/?action=put&method=nope").await.unwrap();

    assert_eq!(
        response.json().unwrap(),
        json!({"status": "error", "msg": "Database configuration file is missing."})
    );
}

#[tokio::test]
async fn request_deadline_is_answered_with_an_envelope() {
    let app = TestApp::with_deadlines(
        PipelineSettings { store_timeout: Duration::from_secs(5), ..PipelineSettings::default() },
        Duration::from_millis(50),
    );
    app.store.set_latency(Duration::from_millis(500)).await;

    let response = app.send(&QueryBuilder::contact_lead()).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json().unwrap(),
        json!({"status": "error", "msg": "Problem occured on insertion into database."})
    );
    assert!(response.request_id.is_some());
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn request_deadline_keeps_the_jsonp_callback() {
    let app = TestApp::with_deadlines(
        PipelineSettings { store_timeout: Duration::from_secs(5), ..PipelineSettings::default() },
        Duration::from_millis(50),
    );
    app.store.set_latency(Duration::from_millis(500)).await;

    let response =
        app.send(&QueryBuilder::consultant_lead().param("callback", "onLead")).await.unwrap();

    let body = response.jsonp("onLead").unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["msg"], "Problem occured on insertion into database.");
}

#[tokio::test]
async fn duplicate_keys_use_the_last_value() {
    let app = TestApp::new();
    let query = QueryBuilder::contact_lead().param("name", "Eve");

    app.send(&query).await.unwrap();

    assert_eq!(app.store.rows().await[0].get("NAME"), Some("Eve"));
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = TestApp::new();

    let response = app.get("/").await.unwrap();

    assert!(response.request_id.is_some());
}

//! End-to-end lead submission scenarios.
//!
//! Exercises the whole request path, from query string through the
//! pipeline and store to the emitted JSON or JSONP body.

use anyhow::Result;
use leadline_testing::{QueryBuilder, TestApp};
use serde_json::json;

/// A complete product lead is stored and answered with its new id.
#[tokio::test]
async fn product_lead_golden_path() -> Result<()> {
    let app = TestApp::new();

    let response = app
        .get("/?action=put&method=product_lead&domain=acme.com&name=Bob&telephone=555-1234&product=Widget")
        .await?;

    let body = response.json()?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["id"], 1);

    let rows = app.store.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].table, "leads");
    assert_eq!(rows[0].get("PRODUCT"), Some("Widget"));
    assert_eq!(rows[0].get("LEAD_TYPE"), Some("product"));
    Ok(())
}

/// A contact lead with only the domain lists both missing fields.
#[tokio::test]
async fn contact_lead_with_only_domain() -> Result<()> {
    let app = TestApp::new();

    let response = app.get("/?action=put&method=contact_lead&domain=acme.com").await?;

    assert_eq!(
        response.json()?,
        json!({
            "status": "error",
            "msg": "Missing required data.",
            "debug": ["`name` is missing.", "`telephone` is missing."]
        })
    );
    assert!(app.store.is_empty().await);
    Ok(())
}

/// A JSONP consumer receives the success envelope wrapped in its callback.
#[tokio::test]
async fn jsonp_consumer_receives_wrapped_success() -> Result<()> {
    let app = TestApp::new();

    let response = app.send(&QueryBuilder::consultant_lead().param("callback", "cb123")).await?;

    insta::assert_snapshot!(
        response.body,
        @r#"cb123({"status":"success","msg":"One of our consultants will contact you as soon as possible. Thank you!","id":1})"#
    );
    Ok(())
}

/// Mixed traffic: rejected requests never reach the store and do not
/// consume ids.
#[tokio::test]
async fn rejected_requests_leave_no_trace() -> Result<()> {
    let app = TestApp::new();

    app.get("/").await?;
    app.get("/?action=put").await?;
    app.get("/?action=post&method=product_lead").await?;
    app.send(&QueryBuilder::product_lead().without("product")).await?;
    let accepted = app.send(&QueryBuilder::contact_lead()).await?.json()?;

    assert_eq!(accepted["id"], 1);
    assert_eq!(app.store.len().await, 1);
    Ok(())
}

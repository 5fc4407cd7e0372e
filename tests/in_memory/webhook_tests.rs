//! Inbound webhook intake over HTTP.

use super::helpers::{ORGANIZATION_SLUG, test_app};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use eyre::{ensure, eyre};
use fieldline::request::{
    domain::ServiceRequestId,
    ports::{RequestFilter, RequestQuery},
};
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

const WEBHOOK: &str = "/api/webhooks/service-requests";

fn submission(slug: &str) -> Value {
    json!({
        "organization_slug": slug,
        "customer_name": "Jane Doe",
        "customer_phone": "+44 (20) 7946-0958",
        "address": "12 Harbour Street",
        "service_type": "plumb",
        "source": "website form",
        "problem_description": "Water heater leaking in the basement",
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_submission_is_stored_pending() -> eyre::Result<()> {
    let app = test_app().await?;
    let plumbing = app.service_type("Emergency Plumbing").await?;

    let (status, receipt) = app
        .send(Method::POST, WEBHOOK, Some(submission(ORGANIZATION_SLUG)))
        .await?;

    ensure!(status == StatusCode::CREATED, "{receipt}");
    ensure!(receipt["organization_id"] == app.organization_id.to_string());
    let raw_id = receipt["request_id"]
        .as_str()
        .ok_or_else(|| eyre!("receipt has no request id: {receipt}"))?;
    let request_id = ServiceRequestId::from_uuid(Uuid::parse_str(raw_id)?);
    let stored = app.state.requests.find(app.organization_id, request_id).await?;
    ensure!(stored.status().as_str() == "pending");
    ensure!(stored.service_type_id() == Some(plumbing));
    ensure!(stored.assigned_provider_id().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unmatched_service_type_is_left_empty() -> eyre::Result<()> {
    let app = test_app().await?;
    app.service_type("Electrical").await?;

    let (status, _) = app
        .send(Method::POST, WEBHOOK, Some(submission(ORGANIZATION_SLUG)))
        .await?;
    let stored = app
        .state
        .requests
        .list(app.organization_id, &RequestQuery::new(RequestFilter::default()))
        .await?;

    ensure!(status == StatusCode::CREATED);
    ensure!(stored.len() == 1);
    ensure!(stored.first().is_some_and(|request| request.service_type_id().is_none()));
    Ok(())
}

#[rstest]
#[case::unknown_slug(submission("nobody-here"))]
#[case::malformed_slug(submission("Not A Slug"))]
#[case::missing_name({
    let mut body = submission(ORGANIZATION_SLUG);
    body["customer_name"] = Value::Null;
    body
})]
#[case::short_description({
    let mut body = submission(ORGANIZATION_SLUG);
    body["problem_description"] = json!("leak");
    body
})]
#[tokio::test(flavor = "multi_thread")]
async fn every_rejection_looks_the_same(#[case] body: Value) -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app.send(Method::POST, WEBHOOK, Some(body)).await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(reply == json!({ "status": "fail", "message": "invalid request" }), "{reply}");
    let stored = app.state.requests.count(app.organization_id, &RequestFilter::default()).await?;
    ensure!(stored == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_body_gets_the_generic_rejection() -> eyre::Result<()> {
    let app = test_app().await?;
    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))?;

    let (status, reply) = app.send_raw(request).await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(reply["message"] == "invalid request");
    Ok(())
}

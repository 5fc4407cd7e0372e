//! Status codes and envelopes of the tenant HTTP surface.

use super::helpers::{test_app, TestApp};
use axum::http::{Method, StatusCode};
use eyre::{ensure, eyre};
use rstest::rstest;
use serde_json::{Value, json};

fn request_body(name: &str) -> Value {
    json!({
        "customer_name": name,
        "customer_email": "jane@example.com",
        "address": "12 Harbour Street",
        "problem_description": "Water heater leaking in the basement",
    })
}

async fn create(app: &TestApp, body: Value) -> eyre::Result<String> {
    let (status, reply) = app
        .send(Method::POST, &app.tenant("/requests"), Some(body))
        .await?;
    ensure!(status == StatusCode::CREATED, "create returned {status}: {reply}");
    reply["data"]["id"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| eyre!("created request has no id: {reply}"))
}

fn field_names(reply: &Value) -> Vec<String> {
    reply["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error["field"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_reports_ok() -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app.send(Method::GET, "/health", None).await?;

    ensure!(status == StatusCode::OK);
    ensure!(reply["status"] == "ok");
    Ok(())
}

#[rstest]
#[case("not-a-uuid")]
#[case("4f9c2d6e-1b7a-4c3e-9d2f-0a8b6c5e4d31")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_organizations_are_not_found(#[case] organization: &str) -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app
        .send(
            Method::GET,
            &format!("/api/organizations/{organization}/requests"),
            None,
        )
        .await?;

    ensure!(status == StatusCode::NOT_FOUND);
    ensure!(reply["status"] == "fail");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_request_starts_pending() -> eyre::Result<()> {
    let app = test_app().await?;
    let (status, reply) = app
        .send(
            Method::POST,
            &app.tenant("/requests"),
            Some(request_body("Jane Doe")),
        )
        .await?;

    ensure!(status == StatusCode::CREATED);
    ensure!(reply["status"] == "success");
    let data = &reply["data"];
    ensure!(data["status"] == "pending");
    ensure!(data["priority"] == "normal");
    ensure!(data["customer"]["name"] == "Jane Doe");
    ensure!(data["assigned_provider_id"].is_null());
    ensure!(data["organization_id"] == app.organization_id.to_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_request_lists_every_field() -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app
        .send(
            Method::POST,
            &app.tenant("/requests"),
            Some(json!({
                "customer_name": "",
                "customer_email": "not-an-email",
                "address": "12 Harbour Street",
                "problem_description": "short",
                "priority": "whenever",
            })),
        )
        .await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(reply["message"] == "validation failed");
    let fields = field_names(&reply);
    for expected in ["customer_name", "customer_email", "problem_description", "priority"] {
        ensure!(
            fields.iter().any(|field| field == expected),
            "missing {expected} in {fields:?}"
        );
    }
    ensure!(!fields.iter().any(|field| field == "address"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_a_bad_request() -> eyre::Result<()> {
    let app = test_app().await?;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri(app.tenant("/requests"))
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"customer_name\": "))?;

    let (status, reply) = app.send_raw(request).await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(reply["status"] == "fail");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_then_complete_over_http() -> eyre::Result<()> {
    let app = test_app().await?;
    let provider = app.provider("Pat Fixit").await?;
    let request_id = create(&app, request_body("Jane Doe")).await?;
    let status_uri = app.tenant("/requests/status");

    let (assigned, reply) = app
        .send(
            Method::PUT,
            &status_uri,
            Some(json!({
                "id": request_id,
                "status": "assigned",
                "assigned_provider_id": provider.to_string(),
            })),
        )
        .await?;
    ensure!(assigned == StatusCode::OK, "{reply}");
    ensure!(reply["data"]["assigned_provider_id"] == provider.to_string());

    for next in ["in_progress", "completed"] {
        let (status, body) = app
            .send(
                Method::PUT,
                &status_uri,
                Some(json!({ "id": request_id, "status": next })),
            )
            .await?;
        ensure!(status == StatusCode::OK, "{next}: {body}");
    }

    let (status, reply) = app
        .send(
            Method::GET,
            &app.tenant(&format!("/requests/{request_id}")),
            None,
        )
        .await?;
    ensure!(status == StatusCode::OK);
    ensure!(reply["data"]["status"] == "completed");
    ensure!(!reply["data"]["completed_at"].is_null());
    ensure!(reply["data"]["assigned_provider_id"] == provider.to_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skipping_a_step_is_a_conflict() -> eyre::Result<()> {
    let app = test_app().await?;
    let request_id = create(&app, request_body("Jane Doe")).await?;

    let (status, reply) = app
        .send(
            Method::PUT,
            &app.tenant("/requests/status"),
            Some(json!({ "id": request_id, "status": "completed" })),
        )
        .await?;

    ensure!(status == StatusCode::CONFLICT);
    let message = reply["message"].as_str().unwrap_or_default();
    ensure!(message.contains("pending -> completed"), "{message}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_an_unknown_provider_is_not_found() -> eyre::Result<()> {
    let app = test_app().await?;
    let request_id = create(&app, request_body("Jane Doe")).await?;

    let (status, _) = app
        .send(
            Method::PUT,
            &app.tenant("/requests/status"),
            Some(json!({
                "id": request_id,
                "status": "assigned",
                "assigned_provider_id": "0e6f3b1c-8a2d-4f7e-b5c9-3d1a7e9f2b40",
            })),
        )
        .await?;

    ensure!(status == StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[case(json!({ "id": "abc", "status": "assigned" }), "id")]
#[case(json!({ "id": "0e6f3b1c-8a2d-4f7e-b5c9-3d1a7e9f2b40", "status": "finished" }), "status")]
#[case(json!({ "id": "0e6f3b1c-8a2d-4f7e-b5c9-3d1a7e9f2b40", "status": "active" }), "status")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_status_updates_name_the_field(
    #[case] body: Value,
    #[case] field: &str,
) -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app
        .send(Method::PUT, &app.tenant("/requests/status"), Some(body))
        .await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(field_names(&reply).iter().any(|name| name == field), "{reply}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allowed_transitions_follow_the_table() -> eyre::Result<()> {
    let app = test_app().await?;
    let request_id = create(&app, request_body("Jane Doe")).await?;

    let (status, reply) = app
        .send(
            Method::GET,
            &app.tenant(&format!("/requests/{request_id}/transitions")),
            None,
        )
        .await?;

    ensure!(status == StatusCode::OK);
    ensure!(reply["data"] == json!(["assigned", "cancelled"]), "{reply}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_and_pages() -> eyre::Result<()> {
    let app = test_app().await?;
    create(&app, request_body("Jane Doe")).await?;
    create(&app, request_body("John Smith")).await?;
    let mut urgent_body = request_body("Janet Urgent");
    urgent_body["priority"] = json!("urgent");
    create(&app, urgent_body).await?;

    let (status, reply) = app
        .send(
            Method::GET,
            &app.tenant("/requests?search=jane&limit=1"),
            None,
        )
        .await?;
    ensure!(status == StatusCode::OK);
    ensure!(reply["data"]["total"] == 2, "{reply}");
    ensure!(reply["data"]["limit"] == 1);
    ensure!(reply["data"]["requests"].as_array().map(Vec::len) == Some(1));

    let (_, by_priority) = app
        .send(Method::GET, &app.tenant("/requests?priority=urgent"), None)
        .await?;
    ensure!(by_priority["data"]["total"] == 1);
    ensure!(by_priority["data"]["requests"][0]["customer"]["name"] == "Janet Urgent");
    Ok(())
}

#[rstest]
#[case("limit=0", "limit")]
#[case("limit=101", "limit")]
#[case("offset=-1", "offset")]
#[case("status=active", "status")]
#[case("order=sideways", "order")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_listing_parameters_are_rejected(
    #[case] query: &str,
    #[case] field: &str,
) -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app
        .send(Method::GET, &app.tenant(&format!("/requests?{query}")), None)
        .await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(field_names(&reply).iter().any(|name| name == field), "{reply}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_request_is_fetchable_but_unlisted() -> eyre::Result<()> {
    let app = test_app().await?;
    let request_id = create(&app, request_body("Jane Doe")).await?;
    let request_uri = app.tenant(&format!("/requests/{request_id}"));

    let (deleted, _) = app.send(Method::DELETE, &request_uri, None).await?;
    ensure!(deleted == StatusCode::OK);

    let (status, reply) = app.send(Method::GET, &request_uri, None).await?;
    ensure!(status == StatusCode::OK);
    ensure!(!reply["data"]["deleted_at"].is_null());

    let (_, listing) = app
        .send(Method::GET, &app.tenant("/requests"), None)
        .await?;
    ensure!(listing["data"]["total"] == 0);

    let (_, summary) = app
        .send(Method::GET, &app.tenant("/requests/summary"), None)
        .await?;
    ensure!(summary["data"]["total"] == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_counts_each_status() -> eyre::Result<()> {
    let app = test_app().await?;
    create(&app, request_body("Jane Doe")).await?;
    let cancelled = create(&app, request_body("John Smith")).await?;
    app.send(
        Method::PUT,
        &app.tenant("/requests/status"),
        Some(json!({ "id": cancelled, "status": "cancelled" })),
    )
    .await?;

    let (status, reply) = app
        .send(Method::GET, &app.tenant("/requests/summary"), None)
        .await?;

    ensure!(status == StatusCode::OK);
    let counts = &reply["data"]["counts"];
    ensure!(counts["pending"] == 1, "{reply}");
    ensure!(counts["cancelled"] == 1);
    ensure!(counts["completed"] == 0);
    ensure!(reply["data"]["total"] == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn requests_are_scoped_to_their_organization() -> eyre::Result<()> {
    let app = test_app().await?;
    let request_id = create(&app, request_body("Jane Doe")).await?;
    let other = app.add_organization("other-plumbing").await?;
    let foreign_uri = format!("/api/organizations/{other}/requests/{request_id}");

    let (status, _) = app.send(Method::GET, &foreign_uri, None).await?;
    let (_, listing) = app
        .send(
            Method::GET,
            &format!("/api/organizations/{other}/requests"),
            None,
        )
        .await?;

    ensure!(status == StatusCode::NOT_FOUND);
    ensure!(listing["data"]["total"] == 0);
    Ok(())
}

//! Provider management over HTTP: registration, status, skills and deletion.

use super::helpers::{TestApp, test_app};
use axum::http::{Method, StatusCode};
use eyre::{ensure, eyre};
use rstest::rstest;
use serde_json::{Value, json};

async fn register(app: &TestApp, body: Value) -> eyre::Result<String> {
    let (status, reply) = app
        .send(Method::POST, &app.tenant("/providers"), Some(body))
        .await?;
    ensure!(status == StatusCode::CREATED, "register returned {status}: {reply}");
    reply["data"]["id"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| eyre!("registered provider has no id: {reply}"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registration_applies_defaults() -> eyre::Result<()> {
    let app = test_app().await?;
    let provider_id = register(&app, json!({ "name": "Pat Fixit" })).await?;

    let (status, reply) = app
        .send(
            Method::GET,
            &app.tenant(&format!("/providers/{provider_id}")),
            None,
        )
        .await?;

    ensure!(status == StatusCode::OK);
    ensure!(reply["data"]["status"] == "active");
    ensure!(reply["data"]["total_jobs_completed"] == 0);
    ensure!(reply["data"]["deleted_at"].is_null());
    Ok(())
}

#[rstest]
#[case(json!({ "name": "P" }), "name")]
#[case(json!({ "name": "Pat Fixit", "rating": 7.5 }), "rating")]
#[case(json!({ "name": "Pat Fixit", "status": "pending" }), "status")]
#[case(json!({ "name": "Pat Fixit", "phone": "call me" }), "phone")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_registration_names_the_field(
    #[case] body: Value,
    #[case] field: &str,
) -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, reply) = app
        .send(Method::POST, &app.tenant("/providers"), Some(body))
        .await?;

    ensure!(status == StatusCode::BAD_REQUEST);
    ensure!(reply["errors"][0]["field"] == field, "{reply}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_update_uses_the_provider_vocabulary() -> eyre::Result<()> {
    let app = test_app().await?;
    let provider_id = register(&app, json!({ "name": "Pat Fixit" })).await?;
    let status_uri = app.tenant(&format!("/providers/{provider_id}/status"));

    let (accepted, reply) = app
        .send(Method::PUT, &status_uri, Some(json!({ "status": "inactive" })))
        .await?;
    ensure!(accepted == StatusCode::OK, "{reply}");
    ensure!(reply["data"]["status"] == "inactive");

    let (rejected, reply) = app
        .send(Method::PUT, &status_uri, Some(json!({ "status": "busy" })))
        .await?;
    ensure!(rejected == StatusCode::BAD_REQUEST);
    ensure!(reply["errors"][0]["field"] == "status");
    let message = reply["errors"][0]["message"].as_str().unwrap_or_default();
    ensure!(message.contains("roster"), "{message}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_by_status() -> eyre::Result<()> {
    let app = test_app().await?;
    register(&app, json!({ "name": "Pat Fixit" })).await?;
    register(&app, json!({ "name": "Sam Spanner", "status": "inactive" })).await?;

    let (status, reply) = app
        .send(Method::GET, &app.tenant("/providers?status=inactive"), None)
        .await?;

    ensure!(status == StatusCode::OK);
    let providers = reply["data"]
        .as_array()
        .ok_or_else(|| eyre!("provider listing is not an array: {reply}"))?;
    ensure!(providers.len() == 1);
    ensure!(providers.first().is_some_and(|found| found["name"] == "Sam Spanner"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skills_are_replaced_wholesale() -> eyre::Result<()> {
    let app = test_app().await?;
    let provider_id = register(&app, json!({ "name": "Pat Fixit" })).await?;
    let plumbing = app.service_type("Plumbing").await?;
    let heating = app.service_type("Heating").await?;
    let skills_uri = app.tenant(&format!("/providers/{provider_id}/skills"));

    app.send(
        Method::PUT,
        &skills_uri,
        Some(json!({ "service_type_ids": [plumbing.to_string(), heating.to_string()] })),
    )
    .await?;
    let (status, reply) = app
        .send(
            Method::PUT,
            &skills_uri,
            Some(json!({ "service_type_ids": [heating.to_string(), heating.to_string()] })),
        )
        .await?;
    ensure!(status == StatusCode::OK, "{reply}");

    let (_, listed) = app.send(Method::GET, &skills_uri, None).await?;
    let skills = listed["data"]
        .as_array()
        .ok_or_else(|| eyre!("skill listing is not an array: {listed}"))?;
    ensure!(skills.len() == 1);
    ensure!(skills.first().is_some_and(|skill| skill["service_type_id"] == heating.to_string()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_skill_leaves_the_set_untouched() -> eyre::Result<()> {
    let app = test_app().await?;
    let provider_id = register(&app, json!({ "name": "Pat Fixit" })).await?;
    let plumbing = app.service_type("Plumbing").await?;
    let skills_uri = app.tenant(&format!("/providers/{provider_id}/skills"));
    app.send(
        Method::PUT,
        &skills_uri,
        Some(json!({ "service_type_ids": [plumbing.to_string()] })),
    )
    .await?;

    let (unknown, _) = app
        .send(
            Method::PUT,
            &skills_uri,
            Some(json!({ "service_type_ids": ["9b2e4c7a-5d1f-4e8b-a3c6-7f0d2b9e1a54"] })),
        )
        .await?;
    let (malformed, reply) = app
        .send(
            Method::PUT,
            &skills_uri,
            Some(json!({ "service_type_ids": ["plumbing"] })),
        )
        .await?;

    ensure!(unknown == StatusCode::NOT_FOUND);
    ensure!(malformed == StatusCode::BAD_REQUEST);
    ensure!(reply["errors"][0]["field"] == "service_type_ids");
    let (_, listed) = app.send(Method::GET, &skills_uri, None).await?;
    ensure!(listed["data"].as_array().map(Vec::len) == Some(1));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_reports_orphaned_requests() -> eyre::Result<()> {
    let app = test_app().await?;
    let provider_id = register(&app, json!({ "name": "Pat Fixit" })).await?;
    let (created, reply) = app
        .send(
            Method::POST,
            &app.tenant("/requests"),
            Some(json!({
                "customer_name": "Jane Doe",
                "address": "12 Harbour Street",
                "problem_description": "Water heater leaking in the basement",
                "assigned_provider_id": provider_id,
            })),
        )
        .await?;
    ensure!(created == StatusCode::CREATED, "{reply}");
    ensure!(reply["data"]["status"] == "assigned");
    let request_id = reply["data"]["id"].as_str().unwrap_or_default().to_owned();

    let (status, deletion) = app
        .send(
            Method::POST,
            &app.tenant("/providers/delete"),
            Some(json!({ "id": provider_id })),
        )
        .await?;

    ensure!(status == StatusCode::OK, "{deletion}");
    ensure!(deletion["data"]["orphaned_requests"] == 1);
    ensure!(!deletion["data"]["provider"]["deleted_at"].is_null());
    let (_, request) = app
        .send(
            Method::GET,
            &app.tenant(&format!("/requests/{request_id}")),
            None,
        )
        .await?;
    ensure!(request["data"]["assigned_provider_id"].is_null());
    ensure!(request["data"]["status"] == "assigned");

    let (status_after, _) = app
        .send(
            Method::PUT,
            &app.tenant(&format!("/providers/{provider_id}/status")),
            Some(json!({ "status": "inactive" })),
        )
        .await?;
    ensure!(status_after == StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[case(json!({ "id": "nope" }), StatusCode::BAD_REQUEST)]
#[case(json!({ "id": "5c8d1e3f-7a2b-4d9c-8e6f-1b3a5c7d9e02" }), StatusCode::NOT_FOUND)]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_unknown_providers_fails(
    #[case] body: Value,
    #[case] expected: StatusCode,
) -> eyre::Result<()> {
    let app = test_app().await?;

    let (status, _) = app
        .send(Method::POST, &app.tenant("/providers/delete"), Some(body))
        .await?;

    ensure!(status == expected);
    Ok(())
}

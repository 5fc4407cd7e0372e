//! Then steps for dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use axum::http::{Method, StatusCode};
use eyre::{WrapErr, ensure, eyre};
use fieldline::provider::ports::ProviderQuery;
use fieldline::request::{
    domain::{RequestStatus, ServiceRequest},
    ports::{RequestFilter, RequestQuery},
};
use rstest_bdd_macros::then;
use serde_json::json;

fn stored_request(world: &DispatchWorld) -> Result<ServiceRequest, eyre::Report> {
    let organization_id = world.organization_id()?;
    let request_id = world.current_request()?;
    run_async(world.state.requests.find(organization_id, request_id)).wrap_err("load request")
}

#[then("the update succeeds")]
fn update_succeeds(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let reply = world.reply()?;
    ensure!(
        reply.status == StatusCode::OK,
        "expected 200, got {} with {}",
        reply.status,
        reply.body
    );
    ensure!(reply.body["status"] == "success");
    Ok(())
}

#[then("the update is rejected with status {code:u16}")]
fn update_rejected(world: &DispatchWorld, code: u16) -> Result<(), eyre::Report> {
    let reply = world.reply()?;
    ensure!(
        reply.status.as_u16() == code,
        "expected {code}, got {}",
        reply.status
    );
    ensure!(reply.body["status"] == "fail");
    Ok(())
}

#[then(r#"the request is assigned to "{name}""#)]
fn request_assigned_to(world: &DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let request = stored_request(world)?;
    ensure!(request.assigned_provider_id() == Some(world.provider(&name)?));
    Ok(())
}

#[then("the request has no provider")]
fn request_unassigned(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let request = stored_request(world)?;
    ensure!(request.assigned_provider_id().is_none());
    Ok(())
}

#[then(r#"the stored request status is "{status}""#)]
fn stored_status_is(world: &DispatchWorld, status: String) -> Result<(), eyre::Report> {
    let request = stored_request(world)?;
    ensure!(
        request.status().as_str() == status,
        "expected {status}, found {}",
        request.status()
    );
    Ok(())
}

#[then("the request has a completion time")]
fn request_completed_at(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let request = stored_request(world)?;
    ensure!(request.completed_at().is_some());
    Ok(())
}

#[then("{count:u64} requests were orphaned")]
fn requests_orphaned(world: &DispatchWorld, count: u64) -> Result<(), eyre::Report> {
    let reply = world.reply()?;
    ensure!(reply.status == StatusCode::OK, "deletion failed: {}", reply.body);
    ensure!(reply.body["data"]["orphaned_requests"] == json!(count));
    Ok(())
}

#[then(r#"no request is assigned to "{name}""#)]
fn no_request_assigned(world: &DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let organization_id = world.organization_id()?;
    let provider_id = world.provider(&name)?;
    for request_id in &world.requests {
        let request = run_async(world.state.requests.find(organization_id, *request_id))
            .wrap_err("load request")?;
        ensure!(request.assigned_provider_id() != Some(provider_id));
    }
    Ok(())
}

#[then(r#"the provider "{name}" is absent from the provider listing"#)]
fn provider_absent(world: &DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let organization_id = world.organization_id()?;
    let provider_id = world.provider(&name)?;
    let listed = run_async(
        world
            .state
            .providers
            .list_providers(organization_id, &ProviderQuery::default()),
    )
    .wrap_err("list providers")?;
    ensure!(listed.iter().all(|provider| provider.id() != provider_id));
    let stored = run_async(world.state.providers.find_provider(organization_id, provider_id))
        .wrap_err("load provider")?;
    ensure!(stored.is_deleted());
    Ok(())
}

#[then("{count:usize} requests are still listed")]
fn requests_still_listed(world: &DispatchWorld, count: usize) -> Result<(), eyre::Report> {
    let organization_id = world.organization_id()?;
    let listed = run_async(
        world
            .state
            .requests
            .list(organization_id, &RequestQuery::new(RequestFilter::default())),
    )
    .wrap_err("list requests")?;
    ensure!(listed.len() == count, "expected {count}, found {}", listed.len());
    Ok(())
}

#[then("the webhook responds with status {code:u16}")]
fn webhook_status(world: &DispatchWorld, code: u16) -> Result<(), eyre::Report> {
    let reply = world.reply()?;
    ensure!(
        reply.status.as_u16() == code,
        "expected {code}, got {} with {}",
        reply.status,
        reply.body
    );
    Ok(())
}

#[then(r#"the response matches an invalid submission to "{slug}""#)]
fn matches_invalid_submission(world: &mut DispatchWorld, slug: String) -> Result<(), eyre::Report> {
    let unknown = world.reply()?.clone();
    let invalid = world.send(
        Method::POST,
        "/api/webhooks/service-requests",
        Some(json!({
            "organization_slug": slug,
            "customer_name": "J",
            "address": "12 Harbour Street",
        })),
    )?;
    ensure!(unknown.status == invalid.status);
    ensure!(
        unknown.body == invalid.body,
        "bodies differ: {} vs {}",
        unknown.body,
        invalid.body
    );
    ensure!(unknown.body == json!({ "status": "fail", "message": "invalid request" }));
    Ok(())
}

#[then("the pending request count is {count:u64}")]
fn pending_count(world: &DispatchWorld, count: u64) -> Result<(), eyre::Report> {
    let organization_id = world.organization_id()?;
    let filter = RequestFilter::default().with_status(RequestStatus::Pending);
    let pending = run_async(world.state.requests.count(organization_id, &filter))
        .wrap_err("count pending requests")?;
    ensure!(pending == count, "expected {count}, found {pending}");
    Ok(())
}

#[then("the webhook receipt names the organization")]
fn receipt_names_organization(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let reply = world.reply()?;
    let organization_id = world.organization_id()?;
    let named = reply.body["organization_id"]
        .as_str()
        .ok_or_else(|| eyre!("receipt lacks organization_id: {}", reply.body))?;
    ensure!(named == organization_id.to_string());
    ensure!(reply.body["request_id"].is_string());
    Ok(())
}

//! When steps for dispatch BDD scenarios.

use super::world::DispatchWorld;
use axum::http::Method;
use rstest_bdd_macros::when;
use serde_json::{Value, json};

fn update_status(world: &mut DispatchWorld, body: &Value) -> Result<(), eyre::Report> {
    let uri = world.tenant_uri("/requests/status")?;
    world.send(Method::PUT, &uri, Some(body.clone()))?;
    Ok(())
}

#[when(r#"the request is dispatched to "{name}""#)]
fn dispatch_request(world: &mut DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let body = json!({
        "id": world.current_request()?.to_string(),
        "status": "assigned",
        "assigned_provider_id": world.provider(&name)?.to_string(),
    });
    update_status(world, &body)
}

#[when("the request is returned to the queue")]
fn return_to_queue(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let body = json!({
        "id": world.current_request()?.to_string(),
        "status": "pending",
        "assigned_provider_id": null,
    });
    update_status(world, &body)
}

#[when(r#"the request status is set to "{status}""#)]
fn set_status(world: &mut DispatchWorld, status: String) -> Result<(), eyre::Report> {
    let body = json!({
        "id": world.current_request()?.to_string(),
        "status": status,
    });
    update_status(world, &body)
}

#[when(r#"the provider "{name}" is deleted"#)]
fn delete_provider(world: &mut DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let uri = world.tenant_uri("/providers/delete")?;
    let body = json!({ "id": world.provider(&name)?.to_string() });
    world.send(Method::POST, &uri, Some(body))?;
    Ok(())
}

#[when(r#"a webhook submission names the organization "{slug}""#)]
fn submit_webhook(world: &mut DispatchWorld, slug: String) -> Result<(), eyre::Report> {
    let body = json!({
        "organization_slug": slug,
        "customer_name": "Jane Doe",
        "customer_email": "jane@example.com",
        "address": "12 Harbour Street",
        "service_type": "plumbing",
        "problem_description": "Water heater leaking in the basement",
    });
    world.send(Method::POST, "/api/webhooks/service-requests", Some(body))?;
    Ok(())
}

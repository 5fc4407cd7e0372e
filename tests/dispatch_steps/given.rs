//! Given steps for dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use eyre::WrapErr;
use fieldline::provider::services::RegisterProvider;
use fieldline::request::services::CreateServiceRequest;
use rstest_bdd_macros::given;

const SCENARIO_SLUG: &str = "fieldline-demo";

fn leaking_heater(customer: &str) -> CreateServiceRequest {
    CreateServiceRequest::new(
        customer,
        "12 Harbour Street",
        "Water heater leaking in the basement",
    )
}

#[given(r#"an organization with slug "{slug}""#)]
fn organization_with_slug(world: &mut DispatchWorld, slug: String) -> Result<(), eyre::Report> {
    world.create_organization(&slug)?;
    Ok(())
}

#[given(r#"an organization with a provider named "{name}""#)]
fn organization_with_provider(
    world: &mut DispatchWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let organization_id = world.create_organization(SCENARIO_SLUG)?;
    let provider = run_async(
        world
            .state
            .providers
            .register_provider(organization_id, RegisterProvider::new(&name)),
    )
    .wrap_err("register scenario provider")?;
    world.providers.insert(name, provider.id());
    Ok(())
}

#[given(r#"a pending request for "{customer}""#)]
fn pending_request(world: &mut DispatchWorld, customer: String) -> Result<(), eyre::Report> {
    let organization_id = world.organization_id()?;
    let request = run_async(
        world
            .state
            .requests
            .create_request(organization_id, leaking_heater(&customer)),
    )
    .wrap_err("open pending request")?;
    world.requests.push(request.id());
    Ok(())
}

#[given(r#"{count:usize} requests assigned to "{name}""#)]
fn assigned_requests(
    world: &mut DispatchWorld,
    count: usize,
    name: String,
) -> Result<(), eyre::Report> {
    let organization_id = world.organization_id()?;
    let provider_id = world.provider(&name)?;
    for index in 0..count {
        let input = leaking_heater(&format!("Customer {index:02}"))
            .with_provider_id(provider_id.to_string());
        let request = run_async(world.state.requests.create_request(organization_id, input))
            .wrap_err("open assigned request")?;
        world.requests.push(request.id());
    }
    Ok(())
}

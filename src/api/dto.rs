//! Wire types for the HTTP surface.

use crate::persistence::{Page, SortOrder};
use crate::provider::{
    domain::{ProviderId, ProviderStatus, ServiceProvider},
    ports::ProviderQuery,
    services::{ProviderDeletion, RegisterProvider},
};
use crate::request::{
    domain::{Priority, RequestStatus},
    ports::{RequestFilter, RequestQuery},
    services::CreateServiceRequest,
};
use crate::service_type::ServiceTypeId;
use crate::validation::{RuleViolation, ValidationErrors, ValidationReport, rules};
use serde::{Deserialize, Deserializer, Serialize};

const SORT_ORDERS: &[&str] = &["asc", "desc"];

/// Success envelope shared by every tenant endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `"success"`.
    pub status: String,
    /// Short description of the outcome.
    pub message: String,
    /// Payload, when the operation returns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload in a success envelope.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_owned(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Body of `POST /requests`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequestDto {
    /// Customer full name.
    pub customer_name: String,
    /// Optional customer email.
    pub customer_email: Option<String>,
    /// Optional customer phone.
    pub customer_phone: Option<String>,
    /// Service address.
    pub address: String,
    /// What needs fixing.
    pub problem_description: String,
    /// Optional service type identifier.
    pub service_type_id: Option<String>,
    /// Optional priority; defaults to `normal`.
    pub priority: Option<String>,
    /// Optional origin label.
    pub source: Option<String>,
    /// Provider to dispatch immediately.
    pub assigned_provider_id: Option<String>,
}

impl From<CreateRequestDto> for CreateServiceRequest {
    fn from(dto: CreateRequestDto) -> Self {
        let mut input = Self::new(dto.customer_name, dto.address, dto.problem_description);
        if let Some(email) = dto.customer_email {
            input = input.with_email(email);
        }
        if let Some(phone) = dto.customer_phone {
            input = input.with_phone(phone);
        }
        if let Some(service_type_id) = dto.service_type_id {
            input = input.with_service_type_id(service_type_id);
        }
        if let Some(priority) = dto.priority {
            input = input.with_priority(priority);
        }
        if let Some(source) = dto.source {
            input = input.with_source(source);
        }
        if let Some(provider_id) = dto.assigned_provider_id {
            input = input.with_provider_id(provider_id);
        }
        input
    }
}

/// Body of `PUT /requests/status`.
///
/// `assigned_provider_id` keeps absent and `null` apart: absent leaves the
/// assignment alone, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatusDto {
    /// Request identifier.
    pub id: String,
    /// Target status.
    pub status: String,
    /// Assignment change.
    #[serde(deserialize_with = "double_option")]
    pub assigned_provider_id: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Query string of `GET /requests`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestListParams {
    /// Status filter.
    pub status: Option<String>,
    /// Assigned provider filter.
    pub provider_id: Option<String>,
    /// Priority filter.
    pub priority: Option<String>,
    /// Customer name search term.
    pub search: Option<String>,
    /// `asc` or `desc` by creation time.
    pub order: Option<String>,
    /// Rows to skip.
    pub offset: Option<String>,
    /// Page size, at most 100.
    pub limit: Option<String>,
}

impl RequestListParams {
    /// Parses the parameters into a listing query.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming every malformed parameter.
    pub fn into_query(self) -> Result<RequestQuery, ValidationErrors> {
        let mut report = ValidationReport::new();
        let status = present(self.status.as_deref()).and_then(|raw| {
            report.check(
                "status",
                rules::member::<RequestStatus>(raw, RequestStatus::NAMES),
            )
        });
        let provider = present(self.provider_id.as_deref())
            .and_then(|raw| report.check("provider_id", rules::identifier(raw)));
        let priority = present(self.priority.as_deref()).and_then(|raw| {
            report.check("priority", rules::member::<Priority>(raw, Priority::NAMES))
        });
        let order = present(self.order.as_deref())
            .and_then(|raw| report.check("order", rules::member::<SortOrder>(raw, SORT_ORDERS)));
        let page = parse_page(&mut report, self.offset.as_deref(), self.limit.as_deref());
        report.finish()?;

        let mut filter = RequestFilter::default();
        if let Some(value) = status {
            filter = filter.with_status(value);
        }
        if let Some(uuid) = provider {
            filter = filter.with_provider(ProviderId::from_uuid(uuid));
        }
        if let Some(value) = priority {
            filter = filter.with_priority(value);
        }
        if let Some(term) = present(self.search.as_deref()) {
            filter = filter.with_search(term);
        }
        Ok(RequestQuery::new(filter)
            .with_order(order.unwrap_or_default())
            .with_page(page))
    }
}

/// Body of `POST /providers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterProviderDto {
    /// Provider name.
    pub name: String,
    /// Optional email.
    pub email: Option<String>,
    /// Optional phone.
    pub phone: Option<String>,
    /// Rating between 0 and 5.
    pub rating: Option<f64>,
    /// Initial status; defaults to `active`.
    pub status: Option<String>,
}

impl From<RegisterProviderDto> for RegisterProvider {
    fn from(dto: RegisterProviderDto) -> Self {
        let mut input = Self::new(dto.name);
        if let Some(email) = dto.email {
            input = input.with_email(email);
        }
        if let Some(phone) = dto.phone {
            input = input.with_phone(phone);
        }
        if let Some(rating) = dto.rating {
            input = input.with_rating(rating);
        }
        if let Some(status) = dto.status {
            input = input.with_status(status);
        }
        input
    }
}

/// Body of `PUT /providers/{id}/status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderStatusDto {
    /// New status.
    pub status: String,
}

/// Body of `PUT /providers/{id}/skills`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplaceSkillsDto {
    /// Complete new skill set.
    pub service_type_ids: Vec<String>,
}

impl ReplaceSkillsDto {
    /// Parses every identifier, reporting the field once if any is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming `service_type_ids`.
    pub fn parse_ids(&self) -> Result<Vec<ServiceTypeId>, ValidationErrors> {
        self.service_type_ids
            .iter()
            .map(|raw| rules::identifier(raw).map(ServiceTypeId::from_uuid))
            .collect::<Result<Vec<_>, RuleViolation>>()
            .map_err(|violation| ValidationErrors::single("service_type_ids", violation))
    }
}

/// Body of `POST /providers/delete`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteProviderDto {
    /// Provider identifier.
    pub id: String,
}

/// Query string of `GET /providers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderListParams {
    /// Status filter.
    pub status: Option<String>,
    /// Name search term.
    pub search: Option<String>,
    /// Rows to skip.
    pub offset: Option<String>,
    /// Page size, at most 100.
    pub limit: Option<String>,
}

impl ProviderListParams {
    /// Parses the parameters into a listing query.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming every malformed parameter.
    pub fn into_query(self) -> Result<ProviderQuery, ValidationErrors> {
        let mut report = ValidationReport::new();
        let status = present(self.status.as_deref()).and_then(|raw| {
            report.check(
                "status",
                rules::member::<ProviderStatus>(raw, ProviderStatus::NAMES),
            )
        });
        let page = parse_page(&mut report, self.offset.as_deref(), self.limit.as_deref());
        report.finish()?;

        let mut query = ProviderQuery::default().with_page(page);
        if let Some(value) = status {
            query = query.with_status(value);
        }
        if let Some(term) = present(self.search.as_deref()) {
            query = query.with_search(term);
        }
        Ok(query)
    }
}

/// Result of a provider deletion.
#[derive(Debug, Serialize)]
pub struct ProviderDeletionView {
    /// The deleted provider.
    pub provider: ServiceProvider,
    /// Requests whose assignment was cleared.
    pub orphaned_requests: u64,
}

impl From<ProviderDeletion> for ProviderDeletionView {
    fn from(deletion: ProviderDeletion) -> Self {
        Self {
            provider: deletion.provider,
            orphaned_requests: deletion.orphaned_requests,
        }
    }
}

/// Parses a path or body identifier under the field name `id`.
///
/// # Errors
///
/// Returns [`ValidationErrors`] naming `id`.
pub fn parse_id(raw: &str) -> Result<uuid::Uuid, ValidationErrors> {
    rules::identifier(raw).map_err(|violation| ValidationErrors::single("id", violation))
}

fn parse_page(report: &mut ValidationReport, offset: Option<&str>, limit: Option<&str>) -> Page {
    let skip = present(offset).map_or(Some(0), |raw| {
        report.check(
            "offset",
            raw.parse::<u64>().map_err(|_| RuleViolation::OutOfRange {
                min: "0",
                max: "9223372036854775807",
            }),
        )
    });
    let take = present(limit).map_or(Some(Page::DEFAULT_LIMIT), |raw| {
        report.check(
            "limit",
            raw.parse::<u64>()
                .ok()
                .filter(|value| (1..=Page::MAX_LIMIT).contains(value))
                .ok_or(RuleViolation::OutOfRange { min: "1", max: "100" }),
        )
    });
    Page::new(skip.unwrap_or(0), take.unwrap_or(Page::DEFAULT_LIMIT))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

//! Tool handlers.
//!
//! Each handler validates its arguments before touching the network, runs
//! one pipeline against the injected [`GoOutApi`] and returns the tool's
//! JSON result with `success: true`. Failures are reported as [`ToolError`]
//! and turned into the `success: false` envelope by the registry.

use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use super::tools::ToolHandler;
use crate::api::{shorten_urls, ApiError, GoOutApi, UrlShortener};
use crate::config::Defaults;
use crate::models::{
    Event, EventListResponse, EventsRequest, ParticipantStatus, RawOrder, TicketStatistics,
    TrackingLinksResponse, UserRolesRequest,
};
use crate::utils::{
    collect_salesmen, fetch_participants_with_hidden, fetch_up_to, flatten_order, flatten_orders,
    is_truthy, normalize_phone, optional_bool, optional_str, optional_usize,
    participant_statistics, required_str, sort_by_registrations, summarize_salesmen,
    validate_required, PageWindow, ParticipantQuery, ValidationError,
};

/// Errors surfaced to tool callers
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} is required")]
    MissingArgument(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ValidationError> for ToolError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Missing(name) => ToolError::MissingArgument(name),
            other => ToolError::InvalidArgument(other.to_string()),
        }
    }
}

fn parse_status(args: &Value) -> Result<ParticipantStatus, ToolError> {
    optional_str(args, "status", ParticipantStatus::All.as_str())
        .parse()
        .map_err(ToolError::InvalidArgument)
}

/// Handler for `get_events`
#[derive(Debug)]
pub struct GetEventsHandler {
    pub api: Arc<dyn GoOutApi>,
    pub defaults: Defaults,
}

#[async_trait::async_trait]
impl ToolHandler for GetEventsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let is_active = optional_bool(&args, "isActive", true);
        let search = optional_str(&args, "search", "");
        let limit = optional_usize(&args, "limit", self.defaults.events_limit)?;
        let skip = optional_usize(&args, "skip", 0)?;

        let window = PageWindow {
            limit,
            skip,
            page_size: self.defaults.events_page_size,
            hard_cap: self.defaults.max_events_to_fetch,
        };

        let api = self.api.clone();
        let page = fetch_up_to(window, move |offset| {
            let api = api.clone();
            let request = EventsRequest::new(is_active, search.clone()).skip(offset);
            async move {
                api.fetch_events(&request)
                    .await
                    .map(EventListResponse::into_events)
            }
        })
        .await?;

        let events: Vec<Event> = page.items.into_iter().map(Event::from).collect();

        Ok(json!({
            "success": true,
            "count": events.len(),
            "skip": skip,
            "limit": limit,
            "hasMore": page.has_more,
            "events": serde_json::to_value(&events)?,
        }))
    }
}

/// Handler for `get_event_participants`
#[derive(Debug)]
pub struct GetEventParticipantsHandler {
    pub api: Arc<dyn GoOutApi>,
    pub defaults: Defaults,
}

#[async_trait::async_trait]
impl ToolHandler for GetEventParticipantsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let event_id = required_str(&args, "eventId")?;
        let status = parse_status(&args)?;
        let include_hidden = optional_bool(&args, "includeHidden", true);
        let limit = optional_usize(&args, "limit", self.defaults.participants_limit)?;
        let skip = optional_usize(&args, "skip", 0)?;

        let query = ParticipantQuery::new(event_id.clone())
            .status(status)
            .include_hidden(include_hidden)
            .limit(limit)
            .skip(skip);

        let orders = fetch_participants_with_hidden(self.api.as_ref(), &query).await?;
        let participants = flatten_orders(&orders);

        Ok(json!({
            "success": true,
            "eventId": event_id,
            "orderCount": orders.len(),
            "count": participants.len(),
            "skip": skip,
            "status": query.status_label(),
            "participants": serde_json::to_value(&participants)?,
        }))
    }
}

/// Handler for `get_event_statistics`
#[derive(Debug)]
pub struct GetEventStatisticsHandler {
    pub api: Arc<dyn GoOutApi>,
}

#[async_trait::async_trait]
impl ToolHandler for GetEventStatisticsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let event_id = required_str(&args, "eventId")?;

        let raw = self.api.fetch_participant_statistics(&event_id).await?;
        let statistics = TicketStatistics::from(raw);

        Ok(json!({
            "success": true,
            "eventId": event_id,
            "statistics": serde_json::to_value(statistics)?,
        }))
    }
}

/// Handler for `get_salesman_statistics`
///
/// User roles and tracking links are fetched concurrently. A failed
/// tracking-links call is logged and treated as "no tracking links"; a failed
/// user-roles call fails the tool.
#[derive(Debug)]
pub struct GetSalesmanStatisticsHandler {
    pub api: Arc<dyn GoOutApi>,
}

#[async_trait::async_trait]
impl ToolHandler for GetSalesmanStatisticsHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let event_id = required_str(&args, "eventId")?;
        let search = optional_str(&args, "search", "");
        let skip_num = optional_usize(&args, "skipNum", 0)?;

        let request = UserRolesRequest::new(event_id.clone())
            .skip_num(skip_num)
            .search(search);

        let (user_roles, tracking_links) = tokio::join!(
            self.api.fetch_user_roles(&request),
            self.api.fetch_tracking_links(&event_id)
        );

        let user_roles = user_roles?;
        let tracking_links = tracking_links.unwrap_or_else(|e| {
            tracing::warn!(event_id = %event_id, error = %e, "Tracking links unavailable");
            TrackingLinksResponse::unavailable()
        });

        let mut salesmen = collect_salesmen(user_roles, tracking_links);
        let summary = summarize_salesmen(&salesmen);
        sort_by_registrations(&mut salesmen);

        Ok(json!({
            "success": true,
            "eventId": event_id,
            "salesmen": serde_json::to_value(&salesmen)?,
            "summary": serde_json::to_value(&summary)?,
        }))
    }
}

/// Handler for `get_participants_by_salesman`
///
/// Scans up to `salesman_scan_limit` orders, keeps those referred by the
/// salesman (phones compared after normalization), then pages over the
/// flattened participants.
#[derive(Debug)]
pub struct GetParticipantsBySalesmanHandler {
    pub api: Arc<dyn GoOutApi>,
    pub defaults: Defaults,
}

impl GetParticipantsBySalesmanHandler {
    fn referred_by(order: &RawOrder, salesman_phone: &str) -> bool {
        order.is_referred()
            && order.referrer.as_ref().is_some_and(is_truthy)
            && normalize_phone(order.referrer_phone().as_deref()) == salesman_phone
    }

    fn salesman_info(order: &RawOrder) -> Value {
        let truthy = |v: &Option<Value>| v.clone().filter(is_truthy);
        json!({
            "id": order.referrer,
            "firstName": truthy(&order.ref_first_name),
            "lastName": truthy(&order.ref_last_name),
            "phoneNumber": order.referrer,
        })
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetParticipantsBySalesmanHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        validate_required(&args, &["eventId", "salesmanId"])?;
        let event_id = required_str(&args, "eventId")?;
        let salesman_id = required_str(&args, "salesmanId")?;
        let status = parse_status(&args)?;
        let include_hidden = optional_bool(&args, "includeHidden", true);
        let limit = optional_usize(&args, "limit", self.defaults.participants_limit)?;
        let skip = optional_usize(&args, "skip", 0)?;

        let query = ParticipantQuery::new(event_id.clone())
            .status(status)
            .include_hidden(include_hidden)
            .limit(self.defaults.salesman_scan_limit)
            .skip(0);

        let orders = fetch_participants_with_hidden(self.api.as_ref(), &query).await?;

        let salesman_phone = normalize_phone(Some(&salesman_id));
        let matching: Vec<&RawOrder> = orders
            .iter()
            .filter(|order| Self::referred_by(order, &salesman_phone))
            .collect();

        tracing::debug!(
            event_id = %event_id,
            scanned = orders.len(),
            matched = matching.len(),
            "Filtered orders by salesman"
        );

        let participants: Vec<_> = matching.iter().flat_map(|o| flatten_order(o)).collect();
        let statistics = participant_statistics(&participants);
        let salesman = matching
            .first()
            .map(|order| Self::salesman_info(order))
            .unwrap_or(Value::Null);

        let total_count = participants.len();
        let page: Vec<_> = participants.into_iter().skip(skip).take(limit).collect();

        Ok(json!({
            "success": true,
            "eventId": event_id,
            "salesman": salesman,
            "statistics": serde_json::to_value(&statistics)?,
            "orderCount": matching.len(),
            "totalCount": total_count,
            "count": page.len(),
            "skip": skip,
            "limit": limit,
            "status": query.status_label(),
            "participants": serde_json::to_value(&page)?,
        }))
    }
}

/// Handler for `shorten_links`
#[derive(Debug)]
pub struct ShortenLinksHandler {
    pub shortener: Arc<dyn UrlShortener>,
}

impl ShortenLinksHandler {
    /// Accept a single URL or a list of URLs
    fn urls(args: &Value) -> Result<Vec<String>, ToolError> {
        match args.get("urls") {
            Some(Value::String(url)) => Ok(vec![url.clone()]),
            Some(Value::Array(items)) => Ok(items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()),
            _ => Err(ToolError::InvalidArgument(
                "urls must be a string or an array of strings".to_string(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ShortenLinksHandler {
    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        if validate_required(&args, &["urls"]).is_err() {
            return Err(ToolError::MissingArgument("urls parameter".to_string()));
        }
        let urls = Self::urls(&args)?;
        if urls.is_empty() {
            return Err(ToolError::InvalidArgument(
                "At least one URL is required".to_string(),
            ));
        }

        let results = shorten_urls(self.shortener.as_ref(), &urls).await;
        let successful = results.iter().filter(|r| r.success).count();

        Ok(json!({
            "success": true,
            "total": results.len(),
            "successful": successful,
            "failed": results.len() - successful,
            "results": serde_json::to_value(&results)?,
        }))
    }
}

//! Go-Out REST API access.
//!
//! The tool layer never talks HTTP directly. It goes through the
//! [`GoOutApi`] and [`UrlShortener`] traits so the pipelines can be driven by
//! [`GoOutClient`] in production and by [`MockApi`] in tests.
//!
//! | Method | Endpoint |
//! |---|---|
//! | [`GoOutApi::fetch_events`] | `POST /events/getMyEvents?` |
//! | [`GoOutApi::fetch_participants`] | `POST /getEventParticipants/?` |
//! | [`GoOutApi::fetch_participant_statistics`] | `GET /getParticipantsStatistic/?eventId=` |
//! | [`GoOutApi::fetch_user_roles`] | `POST /getEventUserRoles?` |
//! | [`GoOutApi::fetch_tracking_links`] | `POST /trackingLinks/getTrackingLinks?` |

mod client;
pub mod mock;
mod shortener;

pub use client::GoOutClient;
pub use mock::{MockApi, MockShortener};
pub use shortener::{shorten_urls, IsGdShortener, ShortenResult, IS_GD_ENDPOINT};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    EventListResponse, EventsRequest, ParticipantsRequest, RawOrder, RawParticipantStatistics,
    TrackingLinksResponse, UserRolesRequest, UserRolesResponse,
};

/// Upstream calls used by the tools
#[async_trait]
pub trait GoOutApi: Send + Sync + std::fmt::Debug {
    /// One page of the account's events
    async fn fetch_events(&self, request: &EventsRequest) -> Result<EventListResponse, ApiError>;

    /// One page of orders for an event. A `null` body is an empty page.
    async fn fetch_participants(
        &self,
        request: &ParticipantsRequest,
    ) -> Result<Vec<RawOrder>, ApiError>;

    /// Ticket counters per status
    async fn fetch_participant_statistics(
        &self,
        event_id: &str,
    ) -> Result<RawParticipantStatistics, ApiError>;

    /// Salesmen (user roles) of an event
    async fn fetch_user_roles(
        &self,
        request: &UserRolesRequest,
    ) -> Result<UserRolesResponse, ApiError>;

    /// Tracking links of an event
    async fn fetch_tracking_links(&self, event_id: &str)
        -> Result<TrackingLinksResponse, ApiError>;
}

/// Turns a long URL into a short one
#[async_trait]
pub trait UrlShortener: Send + Sync + std::fmt::Debug {
    async fn shorten(&self, url: &str) -> Result<String, ApiError>;
}

/// Errors from upstream services
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; the body is passed through verbatim
    #[error("Go-Out API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// URL shortener rejected the request
    #[error("{0}")]
    Shortener(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(format!("JSON: {}", err))
    }
}

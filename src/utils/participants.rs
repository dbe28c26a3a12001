//! Fetching orders with Go-Out's hidden-status quirk handled.

use crate::api::{ApiError, GoOutApi};
use crate::models::{ParticipantStatus, ParticipantsRequest, RawOrder};

/// Which orders to fetch for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantQuery {
    pub event_id: String,
    pub status: ParticipantStatus,
    /// With status `All`, also fetch hidden orders
    pub include_hidden: bool,
    pub limit: usize,
    pub skip: usize,
}

impl ParticipantQuery {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            status: ParticipantStatus::All,
            include_hidden: true,
            limit: 50,
            skip: 0,
        }
    }

    pub fn status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Whether this query merges visible and hidden orders
    pub fn merges_hidden(&self) -> bool {
        self.status == ParticipantStatus::All && self.include_hidden
    }

    /// Status label echoed back to tool callers
    pub fn status_label(&self) -> String {
        if self.merges_hidden() {
            "All (including hidden)".to_string()
        } else {
            self.status.to_string()
        }
    }

    fn request(&self, status: ParticipantStatus, hidden: bool) -> ParticipantsRequest {
        ParticipantsRequest::new(self.event_id.clone())
            .status(status)
            .limit(self.limit)
            .skip(self.skip)
            .user_only(false)
            .hidden(hidden)
    }
}

/// Fetch raw orders for `query`.
///
/// Upstream's `All` filter leaves out hidden orders, so `All` with
/// `include_hidden` issues a visible and a hidden request concurrently and
/// concatenates them, visible first. Both must succeed; a failure of either
/// fails the whole fetch.
pub async fn fetch_participants_with_hidden(
    api: &dyn GoOutApi,
    query: &ParticipantQuery,
) -> Result<Vec<RawOrder>, ApiError> {
    if query.merges_hidden() {
        let visible_request = query.request(ParticipantStatus::All, false);
        let hidden_request = query.request(ParticipantStatus::Hidden, true);

        let (mut visible, hidden) = tokio::try_join!(
            api.fetch_participants(&visible_request),
            api.fetch_participants(&hidden_request)
        )?;

        tracing::debug!(
            event_id = %query.event_id,
            visible = visible.len(),
            hidden = hidden.len(),
            "Merged visible and hidden orders"
        );

        visible.extend(hidden);
        return Ok(visible);
    }

    let request = match query.status {
        ParticipantStatus::Hidden => query.request(ParticipantStatus::Hidden, true),
        status => query.request(status, false),
    };

    api.fetch_participants(&request).await
}

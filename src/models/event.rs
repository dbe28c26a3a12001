//! Event records and ticket statistics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event as returned by `events/getMyEvents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "_id")]
    pub id: Option<String>,

    #[serde(rename = "Title")]
    pub title: Option<Value>,

    #[serde(rename = "Url")]
    pub url: Option<Value>,

    // Upstream spelling
    #[serde(rename = "Adress")]
    pub address: Option<Value>,

    #[serde(rename = "StartingDate")]
    pub starting_date: Option<Value>,

    #[serde(rename = "EndingDate")]
    pub ending_date: Option<Value>,

    pub statistics: Option<RawEventStatistics>,
}

/// Per-event counters embedded in [`RawEvent`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawEventStatistics {
    pub accepted: Option<u64>,
    pub pending: Option<u64>,
    pub rejected: Option<u64>,
    pub hidden: Option<u64>,
}

/// Response envelope of `events/getMyEvents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Option<Vec<RawEvent>>,
}

impl EventListResponse {
    /// The page of events, empty when the field is absent
    pub fn into_events(self) -> Vec<RawEvent> {
        self.events.unwrap_or_default()
    }
}

/// Cleaned-up event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Option<String>,
    pub title: Option<Value>,
    pub url: Option<Value>,
    pub address: Option<Value>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
    pub statistics: EventStatistics,
}

/// Status counters of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatistics {
    pub accepted: u64,
    pub pending: u64,
    pub rejected: u64,
    pub hidden: u64,
}

impl From<RawEvent> for Event {
    fn from(event: RawEvent) -> Self {
        let stats = event.statistics.unwrap_or_default();
        Self {
            id: event.id,
            title: event.title,
            url: event.url,
            address: event.address,
            start_date: event.starting_date,
            end_date: event.ending_date,
            statistics: EventStatistics {
                accepted: stats.accepted.unwrap_or(0),
                pending: stats.pending.unwrap_or(0),
                rejected: stats.rejected.unwrap_or(0),
                hidden: stats.hidden.unwrap_or(0),
            },
        }
    }
}

/// Response of `getParticipantsStatistic`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawParticipantStatistics {
    pub accepted: Option<u64>,
    pub pending: Option<u64>,
    pub rejected: Option<u64>,
    pub hidden: Option<u64>,
    pub failed: Option<u64>,
}

/// Ticket statistics reported by `get_event_statistics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatistics {
    pub accepted: u64,
    pub pending: u64,
    pub rejected: u64,
    pub hidden: u64,
    pub failed: u64,
    /// Accepted + pending + rejected + hidden; failed payments are excluded
    pub total: u64,
}

impl From<RawParticipantStatistics> for TicketStatistics {
    fn from(stats: RawParticipantStatistics) -> Self {
        let accepted = stats.accepted.unwrap_or(0);
        let pending = stats.pending.unwrap_or(0);
        let rejected = stats.rejected.unwrap_or(0);
        let hidden = stats.hidden.unwrap_or(0);
        Self {
            accepted,
            pending,
            rejected,
            hidden,
            failed: stats.failed.unwrap_or(0),
            total: accepted + pending + rejected + hidden,
        }
    }
}

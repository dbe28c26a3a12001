//! Request bodies sent to the Go-Out API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Participant status filter accepted by `getEventParticipants`.
///
/// `All` does not include hidden registrations upstream; see
/// [`crate::utils::fetch_participants_with_hidden`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticipantStatus {
    #[default]
    All,
    Pending,
    Accepted,
    Rejected,
    Hidden,
}

impl ParticipantStatus {
    /// Every accepted value, in tool-schema order
    pub const VALUES: [ParticipantStatus; 5] = [
        ParticipantStatus::All,
        ParticipantStatus::Pending,
        ParticipantStatus::Accepted,
        ParticipantStatus::Rejected,
        ParticipantStatus::Hidden,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::All => "All",
            ParticipantStatus::Pending => "Pending",
            ParticipantStatus::Accepted => "Accepted",
            ParticipantStatus::Rejected => "Rejected",
            ParticipantStatus::Hidden => "Hidden",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VALUES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::VALUES.iter().map(|v| v.as_str()).collect();
                format!(
                    "Invalid status '{}'. Expected one of: {}",
                    s,
                    expected.join(", ")
                )
            })
    }
}

/// Body of `getEventParticipants`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsRequest {
    pub event_id: String,
    pub limit: usize,
    pub skip: usize,
    pub status: ParticipantStatus,
    /// Only primary registrants, without companions
    pub user_only: bool,
    pub hidden: bool,
}

impl ParticipantsRequest {
    /// Create a request with the upstream defaults (50 per page, status `All`)
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            limit: 50,
            skip: 0,
            status: ParticipantStatus::All,
            user_only: false,
            hidden: false,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn user_only(mut self, user_only: bool) -> Self {
        self.user_only = user_only;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Query for `events/getMyEvents`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsRequest {
    /// Active (upcoming) events when true, past events otherwise
    pub is_active: bool,
    pub search: String,
    pub skip: usize,
}

impl Default for EventsRequest {
    fn default() -> Self {
        Self {
            is_active: true,
            search: String::new(),
            skip: 0,
        }
    }
}

impl EventsRequest {
    pub fn new(is_active: bool, search: impl Into<String>) -> Self {
        Self {
            is_active,
            search: search.into(),
            skip: 0,
        }
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }
}

/// Body of `getEventUserRoles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRolesRequest {
    pub event_id: String,
    pub skip_num: usize,
    pub search: String,
}

impl UserRolesRequest {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            skip_num: 0,
            search: String::new(),
        }
    }

    pub fn skip_num(mut self, skip_num: usize) -> Self {
        self.skip_num = skip_num;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

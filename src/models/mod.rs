//! Upstream records, request bodies and the cleaned-up shapes returned by tools.

mod event;
mod order;
mod request;
mod salesman;

pub use event::{
    Event, EventListResponse, EventStatistics, RawEvent, RawEventStatistics,
    RawParticipantStatistics, TicketStatistics,
};
pub use order::{Companion, Participant, RawOrder, Referrer, SharedFields};
pub use request::{EventsRequest, ParticipantStatus, ParticipantsRequest, UserRolesRequest};
pub use salesman::{
    PersonRef, RawAddedBy, RawReferer, RawTrackingLink, RawUserRole, RawUserRoleStatistics,
    RoleNames, SalesmanEntry, SalesmanRecord, SalesmanStatistics, SalesmanSummary,
    TopSalesman, TrackingLinkRecord, TrackingLinksResponse, UserRolesResponse,
};

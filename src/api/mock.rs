//! Scripted in-memory API for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, GoOutApi, UrlShortener};
use crate::models::{
    EventListResponse, EventsRequest, ParticipantStatus, ParticipantsRequest, RawEvent, RawOrder,
    RawParticipantStatistics, TrackingLinksResponse, UserRolesRequest, UserRolesResponse,
};

type Scripted<T> = Result<T, String>;

fn upstream_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        body: message.to_string(),
    }
}

/// A mock API that returns predefined responses and records requests.
///
/// Orders are returned as configured per status, ignoring `limit`/`skip`.
/// Events are served from one list, sliced by `skip` and the page size.
#[derive(Debug)]
pub struct MockApi {
    events: Mutex<Scripted<Vec<RawEvent>>>,
    events_page_size: Mutex<usize>,
    participants: Mutex<Vec<(ParticipantStatus, Scripted<Vec<RawOrder>>)>>,
    statistics: Mutex<Scripted<RawParticipantStatistics>>,
    user_roles: Mutex<Scripted<UserRolesResponse>>,
    tracking_links: Mutex<Scripted<TrackingLinksResponse>>,
    events_requests: Mutex<Vec<EventsRequest>>,
    participant_requests: Mutex<Vec<ParticipantsRequest>>,
    user_roles_requests: Mutex<Vec<UserRolesRequest>>,
    statistics_requests: Mutex<Vec<String>>,
    tracking_links_requests: Mutex<Vec<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create a mock with empty responses everywhere.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Ok(Vec::new())),
            events_page_size: Mutex::new(5),
            participants: Mutex::new(Vec::new()),
            statistics: Mutex::new(Ok(RawParticipantStatistics::default())),
            user_roles: Mutex::new(Ok(UserRolesResponse::default())),
            tracking_links: Mutex::new(Ok(TrackingLinksResponse::default())),
            events_requests: Mutex::new(Vec::new()),
            participant_requests: Mutex::new(Vec::new()),
            user_roles_requests: Mutex::new(Vec::new()),
            statistics_requests: Mutex::new(Vec::new()),
            tracking_links_requests: Mutex::new(Vec::new()),
        }
    }

    /// Set the full event list and the page size it is served in.
    pub fn set_events(&self, events: Vec<RawEvent>, page_size: usize) {
        *self.events.lock().unwrap() = Ok(events);
        *self.events_page_size.lock().unwrap() = page_size;
    }

    pub fn fail_events(&self, message: &str) {
        *self.events.lock().unwrap() = Err(message.to_string());
    }

    /// Set the orders returned for a status.
    pub fn set_participants(&self, status: ParticipantStatus, orders: Vec<RawOrder>) {
        self.script_participants(status, Ok(orders));
    }

    /// Make requests for a status fail.
    pub fn fail_participants(&self, status: ParticipantStatus, message: &str) {
        self.script_participants(status, Err(message.to_string()));
    }

    fn script_participants(&self, status: ParticipantStatus, response: Scripted<Vec<RawOrder>>) {
        let mut guard = self.participants.lock().unwrap();
        guard.retain(|(s, _)| *s != status);
        guard.push((status, response));
    }

    pub fn set_statistics(&self, statistics: RawParticipantStatistics) {
        *self.statistics.lock().unwrap() = Ok(statistics);
    }

    pub fn fail_statistics(&self, message: &str) {
        *self.statistics.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_user_roles(&self, response: UserRolesResponse) {
        *self.user_roles.lock().unwrap() = Ok(response);
    }

    pub fn fail_user_roles(&self, message: &str) {
        *self.user_roles.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_tracking_links(&self, response: TrackingLinksResponse) {
        *self.tracking_links.lock().unwrap() = Ok(response);
    }

    pub fn fail_tracking_links(&self, message: &str) {
        *self.tracking_links.lock().unwrap() = Err(message.to_string());
    }

    /// Events requests seen so far, in call order.
    pub fn events_requests(&self) -> Vec<EventsRequest> {
        self.events_requests.lock().unwrap().clone()
    }

    /// Participant requests seen so far, in call order.
    pub fn participant_requests(&self) -> Vec<ParticipantsRequest> {
        self.participant_requests.lock().unwrap().clone()
    }

    pub fn user_roles_requests(&self) -> Vec<UserRolesRequest> {
        self.user_roles_requests.lock().unwrap().clone()
    }

    /// Event ids passed to `fetch_participant_statistics`.
    pub fn statistics_requests(&self) -> Vec<String> {
        self.statistics_requests.lock().unwrap().clone()
    }

    /// Event ids passed to `fetch_tracking_links`.
    pub fn tracking_links_requests(&self) -> Vec<String> {
        self.tracking_links_requests.lock().unwrap().clone()
    }

    /// Total number of upstream calls of any kind.
    pub fn call_count(&self) -> usize {
        self.events_requests.lock().unwrap().len()
            + self.participant_requests.lock().unwrap().len()
            + self.user_roles_requests.lock().unwrap().len()
            + self.statistics_requests.lock().unwrap().len()
            + self.tracking_links_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GoOutApi for MockApi {
    async fn fetch_events(&self, request: &EventsRequest) -> Result<EventListResponse, ApiError> {
        self.events_requests.lock().unwrap().push(request.clone());
        let page_size = *self.events_page_size.lock().unwrap();
        match &*self.events.lock().unwrap() {
            Ok(events) => {
                let page = events
                    .iter()
                    .skip(request.skip)
                    .take(page_size)
                    .cloned()
                    .collect();
                Ok(EventListResponse { events: Some(page) })
            }
            Err(message) => Err(upstream_error(message)),
        }
    }

    async fn fetch_participants(
        &self,
        request: &ParticipantsRequest,
    ) -> Result<Vec<RawOrder>, ApiError> {
        self.participant_requests
            .lock()
            .unwrap()
            .push(request.clone());
        let guard = self.participants.lock().unwrap();
        match guard.iter().find(|(status, _)| *status == request.status) {
            Some((_, Ok(orders))) => Ok(orders.clone()),
            Some((_, Err(message))) => Err(upstream_error(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_participant_statistics(
        &self,
        event_id: &str,
    ) -> Result<RawParticipantStatistics, ApiError> {
        self.statistics_requests.lock().unwrap().push(event_id.to_string());
        self.statistics
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| upstream_error(&message))
    }

    async fn fetch_user_roles(
        &self,
        request: &UserRolesRequest,
    ) -> Result<UserRolesResponse, ApiError> {
        self.user_roles_requests
            .lock()
            .unwrap()
            .push(request.clone());
        self.user_roles
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| upstream_error(&message))
    }

    async fn fetch_tracking_links(
        &self,
        event_id: &str,
    ) -> Result<TrackingLinksResponse, ApiError> {
        self.tracking_links_requests.lock().unwrap().push(event_id.to_string());
        self.tracking_links
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| upstream_error(&message))
    }
}

/// A mock shortener returning `https://is.gd/<n>` for the n-th success.
#[derive(Debug, Default)]
pub struct MockShortener {
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    successes: Mutex<usize>,
}

impl MockShortener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make shortening `url` fail with `message`.
    pub fn fail_for(&self, url: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), message.to_string());
    }

    /// URLs that were passed in, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UrlShortener for MockShortener {
    async fn shorten(&self, url: &str) -> Result<String, ApiError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(message) = self.failures.lock().unwrap().get(url) {
            return Err(ApiError::Shortener(message.clone()));
        }
        let mut successes = self.successes.lock().unwrap();
        let short = format!("https://is.gd/{}", *successes);
        *successes += 1;
        Ok(short)
    }
}

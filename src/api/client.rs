use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiError, GoOutApi};
use crate::config::ApiConfig;
use crate::models::{
    EventListResponse, EventsRequest, ParticipantsRequest, RawOrder, RawParticipantStatistics,
    TrackingLinksResponse, UserRolesRequest, UserRolesResponse,
};
use crate::utils::HttpClient;

/// HTTP implementation of [`GoOutApi`].
///
/// Every request carries the bearer token and a JSON content type. Responses
/// outside 2xx become [`ApiError::Status`] with the raw body.
#[derive(Debug, Clone)]
pub struct GoOutClient {
    client: Arc<HttpClient>,
    base_url: String,
}

impl GoOutClient {
    /// Create a client for `base_url` authenticated with `token`
    pub fn new(base_url: impl Into<String>, token: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = HttpClient::builder()
            .bearer_token(token)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(Arc::new(client), base_url))
    }

    /// Create from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let token = config.token.as_deref().ok_or_else(|| {
            ApiError::Config("GOOUT_TOKEN environment variable is not set".to_string())
        })?;
        Self::new(
            config.base_url.clone(),
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "POST");
        let response = self
            .client
            .client()
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        tracing::debug!(endpoint, "GET");
        let response = self.client.client().get(self.url(endpoint)).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(status = status.as_u16(), "Upstream error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GoOutApi for GoOutClient {
    async fn fetch_events(&self, request: &EventsRequest) -> Result<EventListResponse, ApiError> {
        let body = json!({
            "skip": request.skip,
            "search": request.search,
            "status": request.is_active,
            "currentDate": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        let response: Option<EventListResponse> =
            self.post_json("/events/getMyEvents?", &body).await?;
        Ok(response.unwrap_or_default())
    }

    async fn fetch_participants(
        &self,
        request: &ParticipantsRequest,
    ) -> Result<Vec<RawOrder>, ApiError> {
        let orders: Option<Vec<RawOrder>> =
            self.post_json("/getEventParticipants/?", request).await?;
        Ok(orders.unwrap_or_default())
    }

    async fn fetch_participant_statistics(
        &self,
        event_id: &str,
    ) -> Result<RawParticipantStatistics, ApiError> {
        let endpoint = format!(
            "/getParticipantsStatistic/?eventId={}",
            urlencoding::encode(event_id)
        );
        let stats: Option<RawParticipantStatistics> = self.get_json(&endpoint).await?;
        Ok(stats.unwrap_or_default())
    }

    async fn fetch_user_roles(
        &self,
        request: &UserRolesRequest,
    ) -> Result<UserRolesResponse, ApiError> {
        let response: Option<UserRolesResponse> =
            self.post_json("/getEventUserRoles?", request).await?;
        Ok(response.unwrap_or_default())
    }

    async fn fetch_tracking_links(
        &self,
        event_id: &str,
    ) -> Result<TrackingLinksResponse, ApiError> {
        let body = json!({ "eventId": event_id });
        let response: Option<TrackingLinksResponse> = self
            .post_json("/trackingLinks/getTrackingLinks?", &body)
            .await?;
        Ok(response.unwrap_or_default())
    }
}

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::{ApiError, UrlShortener};
use crate::utils::{validate_url, HttpClient};

/// Default is.gd endpoint
pub const IS_GD_ENDPOINT: &str = "https://is.gd/create.php";

/// [`UrlShortener`] backed by the public is.gd service
#[derive(Debug, Clone)]
pub struct IsGdShortener {
    client: Arc<HttpClient>,
    endpoint: String,
}

impl IsGdShortener {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?), endpoint))
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl UrlShortener for IsGdShortener {
    async fn shorten(&self, url: &str) -> Result<String, ApiError> {
        validate_url(url).map_err(|_| ApiError::InvalidUrl(url.to_string()))?;

        tracing::debug!(url, "Shortening URL");
        let response = self
            .client
            .client()
            .get(&self.endpoint)
            .query(&[("format", "json"), ("url", url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Shortener(format!(
                "is.gd API error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }

        let data: Value = response.json().await?;
        let error_code = data.get("errorcode").filter(|code| match code {
            Value::Null => false,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        });
        if let Some(code) = error_code {
            let message = data
                .get("errormessage")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Error code {}", code));
            return Err(ApiError::Shortener(format!("is.gd error: {}", message)));
        }

        data.get("shorturl")
            .and_then(|s| s.as_str())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Parse("is.gd response has no shorturl".to_string()))
    }
}

/// Outcome for one URL of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenResult {
    pub original: String,
    pub shorturl: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Shorten every URL concurrently.
///
/// A failing URL produces an unsuccessful entry; the batch itself never
/// fails. Results keep the input order.
pub async fn shorten_urls(shortener: &dyn UrlShortener, urls: &[String]) -> Vec<ShortenResult> {
    let tasks = urls.iter().map(|url| async move {
        match shortener.shorten(url).await {
            Ok(short) => ShortenResult {
                original: url.clone(),
                shorturl: Some(short),
                success: true,
                error: None,
            },
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Shortening failed");
                ShortenResult {
                    original: url.clone(),
                    shorturl: None,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    });

    join_all(tasks).await
}

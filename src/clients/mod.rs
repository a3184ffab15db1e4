/// External API clients module
use crate::domain::ApodRecord;
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("nasa-space-viewer/1.0")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Anything that can serve APOD records
#[async_trait]
pub trait ApodSource: Send + Sync {
    /// Fetch the record for `date`, or the service default (today) when `None`
    async fn fetch_apod(&self, date: Option<NaiveDate>) -> ApiResult<ApodRecord>;
}

/// NASA APOD client
pub struct NasaClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url,
            api_key,
        })
    }

    /// Query parameters for one request
    fn query(&self, date: Option<NaiveDate>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("thumbs", "true".to_string()),
        ];
        if let Some(date) = date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

#[async_trait]
impl ApodSource for NasaClient {
    async fn fetch_apod(&self, date: Option<NaiveDate>) -> ApiResult<ApodRecord> {
        debug!(?date, "Requesting APOD");
        let resp = self
            .http_client
            .get_client()
            .get(&self.base_url)
            .query(&self.query(date))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::UpstreamStatus(status.as_u16()));
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

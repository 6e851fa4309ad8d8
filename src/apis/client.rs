/// Base HTTP client shared by the API clients
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// HTTP client wrapper with timeout and typed error mapping
///
/// No retry happens here; callers decide.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET a URL and return the raw body of a 2xx response
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            logger::debug(
                LogTag::Api,
                &format!("GET {} -> HTTP {} in {}ms", url, status, start.elapsed().as_millis()),
            );
            return Err(ApiError::HttpStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        logger::debug(
            LogTag::Api,
            &format!(
                "GET {} -> {} bytes in {}ms",
                url,
                body.len(),
                start.elapsed().as_millis()
            ),
        );

        Ok(body.to_vec())
    }

    /// GET a URL and decode the 2xx body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.get_bytes(url).await?;
        decode_json(&body)
    }
}

/// Decode a JSON body, mapping failures to `ApiError::Decode`
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

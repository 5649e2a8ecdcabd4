use crate::client::traits::ReadingSource;
use crate::client::types::ApiSettings;
use crate::models::{PlanetPosition, ReadingRequest, ReadingResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Error)]
pub enum ReadingError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("missing api key: set api.api_key or ASTROLUMINA_API_KEY")]
    MissingApiKey,
}

impl ReadingError {
    /// Every variant is the same "fetch failed" condition to callers.
    /// There is no retry policy to distinguish them for.
    pub fn is_fetch_failure(&self) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalcResponse {
    dynamic_texts: Vec<PlanetPosition>,
}

/// Client for the remote astrology calculation endpoint
#[derive(Debug, Clone)]
pub struct AstroApiClient {
    http: Client,
    settings: ApiSettings,
}

impl AstroApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ReadingError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("astrolumina/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReadingError::Transport(e.to_string()))?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }
}

#[async_trait]
impl ReadingSource for AstroApiClient {
    async fn fetch_reading(
        &self,
        request: &ReadingRequest,
    ) -> Result<ReadingResult, ReadingError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ReadingError::MissingApiKey)?;

        debug!("POST {} with payload {:?}", self.settings.url, request);

        let response = self
            .http
            .post(&self.settings.url)
            .header("x-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("API request error: {}", e);
                map_reqwest_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Calculation API returned status {}", status);
            return Err(ReadingError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!("Received {} bytes from calculation API", body.len());

        let parsed: CalcResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to decode calculation response: {}", e);
            ReadingError::Decode(e.to_string())
        })?;

        info!("Received {} planet positions", parsed.dynamic_texts.len());

        Ok(ReadingResult {
            dynamic_texts: parsed.dynamic_texts,
        })
    }

    fn source_name(&self) -> &'static str {
        "astromagia"
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ReadingError {
    if e.is_timeout() {
        ReadingError::Timeout
    } else {
        ReadingError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_positions_and_ignores_extra_fields() {
        let body = r#"{
            "dynamicTexts": [
                {"planet": "Sun", "sign": "Taurus", "house": "House 10", "text": "..."}
            ],
            "other": 1
        }"#;
        let parsed: CalcResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.dynamic_texts,
            vec![PlanetPosition::new("Sun", "Taurus", "House 10")]
        );
    }

    #[test]
    fn missing_position_list_is_a_decode_error() {
        assert!(serde_json::from_str::<CalcResponse>(r#"{"foo": []}"#).is_err());
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        let client = AstroApiClient::new(ApiSettings {
            url: "http://127.0.0.1:9/unused".to_string(),
            api_key: None,
            timeout_secs: 1,
        })
        .unwrap();
        let request = ReadingRequest {
            longitude: 0.0,
            latitude: 0.0,
            year: 2000,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
        };

        let err = client.fetch_reading(&request).await.unwrap_err();
        assert!(matches!(err, ReadingError::MissingApiKey));
        assert!(err.is_fetch_failure());
    }
}

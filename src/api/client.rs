use crate::api::traits::PropertyApi;
use crate::api::{ApiError, Endpoint};
use crate::config::AppConfig;
use crate::models::{AutocompleteResponse, ErrorEnvelope, LocationSuggestion, PropertyDetail, PropertyPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// reqwest-backed client for the listings REST API
pub struct HttpPropertyApi {
    client: Client,
    base: Url,
}

impl HttpPropertyApi {
    /// Create a client for the backend named in `config`
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("listing-browser/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, config.api_base_url.clone()))
    }

    /// Use an existing reqwest client; `base` must end with `/`
    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn autocomplete_url(&self, query: &str) -> Result<Url, ApiError> {
        let mut url = self.join(Endpoint::Autocomplete, "api/locations/autocomplete/")?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    pub fn list_url(&self, location: &str, page: u32) -> Result<Url, ApiError> {
        let mut url = self.join(Endpoint::PropertyList, "api/properties/")?;
        url.query_pairs_mut()
            .append_pair("location", location)
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    pub fn detail_url(&self, id: i64) -> Result<Url, ApiError> {
        self.join(Endpoint::PropertyDetail, &format!("api/properties/{id}/"))
    }

    fn join(&self, endpoint: Endpoint, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::transport(endpoint, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;

        decode_response(endpoint, status, &body)
    }
}

/// Turn a raw HTTP status and body into the endpoint's schema type.
///
/// Non-2xx statuses become [`ApiError::Status`], carrying `error.detail` when
/// the body is the backend's error envelope. A 2xx body that does not match
/// the schema becomes [`ApiError::Malformed`].
pub fn decode_response<T: DeserializeOwned>(
    endpoint: Endpoint,
    status: u16,
    body: &[u8],
) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.detail().map(str::to_string));
        warn!("{} request failed with status {}", endpoint, status);
        return Err(ApiError::Status {
            endpoint,
            status,
            detail,
        });
    }

    serde_json::from_slice(body).map_err(|e| {
        warn!("{} response did not match schema: {}", endpoint, e);
        ApiError::Malformed {
            endpoint,
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn autocomplete(&self, query: &str) -> Result<Vec<LocationSuggestion>, ApiError> {
        let url = self.autocomplete_url(query)?;
        let body: AutocompleteResponse = self.get_json(Endpoint::Autocomplete, url).await?;
        Ok(body.results)
    }

    async fn list_properties(&self, location: &str, page: u32) -> Result<PropertyPage, ApiError> {
        let url = self.list_url(location, page)?;
        self.get_json(Endpoint::PropertyList, url).await
    }

    async fn property_detail(&self, id: i64) -> Result<PropertyDetail, ApiError> {
        let url = self.detail_url(id)?;
        self.get_json(Endpoint::PropertyDetail, url).await
    }
}

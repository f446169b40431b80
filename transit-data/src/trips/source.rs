//! HTTP implementation of [`TripSource`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use transit_core::{RouteRef, TripCollection, TripSource, TripSourceError, VehicleRef};
use url::Url;

use super::wire::{LookupItem, labels};

/// Default user agent for trip service requests.
pub const DEFAULT_USER_AGENT: &str = "transit-locator/0.1";

/// Default trip service location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const READY_PATH: &str = "ready";
const VEHICLE_LIST_PATH: &str = "getVehRef";
const ROUTE_LIST_PATH: &str = "getPubLineName";
const TRIPS_BY_VEHICLE_PATH: &str = "getBusTripByVehRef";
const TRIPS_BY_ROUTE_PATH: &str = "getBusTripByPubLineName";

/// Errors raised while constructing an [`HttpTripSource`].
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The base URL does not parse.
    #[error("invalid trip service URL {url:?}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("trip service URL {url:?} cannot be used as a base")]
    UnsupportedBaseUrl {
        /// Rejected URL.
        url: String,
    },
}

/// Configuration for [`HttpTripSource`].
#[derive(Debug, Clone)]
pub struct HttpTripSourceConfig {
    /// Base URL of the trip service (e.g., `"http://localhost:8000"`).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTripSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTripSourceConfig {
    /// Create a configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Trip source backed by the bus-trip HTTP service.
///
/// Identifiers are sent as single percent-encoded path segments, so values
/// containing `/` or spaces cannot escape their endpoint.
#[derive(Debug)]
pub struct HttpTripSource {
    client: Client,
    base_url: Url,
    config: HttpTripSourceConfig,
}

impl HttpTripSource {
    /// Create a source for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpTripSourceConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the HTTP client fails to build.
    pub fn with_config(config: HttpTripSourceConfig) -> Result<Self, SourceBuildError> {
        let trimmed = config.base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|source| SourceBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceBuildError::UnsupportedBaseUrl {
                url: config.base_url.clone(),
            });
        }
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Parsed service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTripSourceConfig {
        &self.config
    }

    /// Build the URL for `segments` below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `with_config`: the base URL accepts path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: &Url) -> Result<Response, TripSourceError> {
        debug!("GET {url}");
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, TripSourceError> {
        let response = self
            .get(url)
            .await?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        serde_json::from_str(&body).map_err(|err| TripSourceError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    async fn fetch_trips(&self, path: &str, id: &str) -> Result<TripCollection, TripSourceError> {
        let url = self.endpoint(&[path, id]);
        let trips: TripCollection = self.fetch_json(&url).await?;
        trips.non_empty().ok_or(TripSourceError::EmptyResult)
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<String>, TripSourceError> {
        let url = self.endpoint(&[path]);
        let items: Vec<LookupItem> = self.fetch_json(&url).await?;
        Ok(labels(items))
    }

    /// Map a `reqwest` error onto [`TripSourceError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TripSourceError {
        if error.is_timeout() {
            return TripSourceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TripSourceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return TripSourceError::Decode {
                url: url.to_owned(),
                message: error.to_string(),
            };
        }

        TripSourceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl TripSource for HttpTripSource {
    async fn trips_by_vehicle(
        &self,
        vehicle: &VehicleRef,
    ) -> Result<TripCollection, TripSourceError> {
        self.fetch_trips(TRIPS_BY_VEHICLE_PATH, vehicle).await
    }

    async fn trips_by_route(&self, route: &RouteRef) -> Result<TripCollection, TripSourceError> {
        self.fetch_trips(TRIPS_BY_ROUTE_PATH, route).await
    }

    async fn vehicle_refs(&self) -> Result<Vec<String>, TripSourceError> {
        self.fetch_list(VEHICLE_LIST_PATH).await
    }

    async fn route_refs(&self) -> Result<Vec<String>, TripSourceError> {
        self.fetch_list(ROUTE_LIST_PATH).await
    }

    async fn is_ready(&self) -> Result<bool, TripSourceError> {
        let url = self.endpoint(&[READY_PATH]);
        let response = self.get(&url).await?;
        Ok(response.status().is_success())
    }
}

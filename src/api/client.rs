//! HTTP client for the location API.
//!
//! Two endpoint dialects are supported. The `path` dialect encodes the parents
//! in the URL path and returns bare JSON arrays. The `envelope` dialect POSTs
//! the parents as JSON and wraps every answer in `{"error", "msg", "data"}`.

use crate::config::model::{ApiConfig, Dialect};
use crate::selector::{FetchOutcome, Level, Ticket};
use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid base URL: {0}")]
    BadUrl(String),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("server reported an error: {0}")]
    Envelope(String),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct StatesData {
    #[serde(default)]
    states: Vec<Named>,
}

#[derive(Serialize)]
struct CountryQuery<'a> {
    country: &'a str,
}

#[derive(Serialize)]
struct StateQuery<'a> {
    country: &'a str,
    state: &'a str,
}

#[derive(Debug, Clone)]
pub struct LocationClient {
    http: reqwest::Client,
    base: Url,
    dialect: Dialect,
}

impl LocationClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url();
        let base = Url::parse(base_url).map_err(|_| FetchError::BadUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::BadUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            base,
            dialect: config.dialect,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Run the fetch a ticket describes and classify the result.
    pub async fn fetch(&self, ticket: &Ticket) -> FetchOutcome {
        let country = ticket.country.as_deref().unwrap_or_default();
        let state = ticket.state.as_deref().unwrap_or_default();
        let result = match ticket.level {
            Level::Country => self.countries().await,
            Level::State => self.states(country).await,
            Level::City => self.cities(country, state).await,
        };
        result.into()
    }

    pub async fn countries(&self) -> Result<Vec<String>, FetchError> {
        match self.dialect {
            Dialect::Path => self.get_list(&["countries"]).await,
            Dialect::Envelope => {
                let url = self.endpoint(&["countries", "iso"])?;
                let data: Vec<Named> = self.unwrap_envelope(self.http.get(url)).await?;
                Ok(data.into_iter().map(|n| n.name).collect())
            }
        }
    }

    pub async fn states(&self, country: &str) -> Result<Vec<String>, FetchError> {
        match self.dialect {
            Dialect::Path => {
                let scope = format!("country={}", country);
                self.get_list(&[scope.as_str(), "states"]).await
            }
            Dialect::Envelope => {
                let url = self.endpoint(&["countries", "states"])?;
                let request = self.http.post(url).json(&CountryQuery { country });
                let data: StatesData = self.unwrap_envelope(request).await?;
                Ok(data.states.into_iter().map(|n| n.name).collect())
            }
        }
    }

    pub async fn cities(&self, country: &str, state: &str) -> Result<Vec<String>, FetchError> {
        match self.dialect {
            Dialect::Path => {
                let country_scope = format!("country={}", country);
                let state_scope = format!("state={}", state);
                self.get_list(&[country_scope.as_str(), state_scope.as_str(), "cities"])
                    .await
            }
            Dialect::Envelope => {
                let url = self.endpoint(&["countries", "state", "cities"])?;
                let request = self.http.post(url).json(&StateQuery { country, state });
                self.unwrap_envelope(request).await
            }
        }
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::BadUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_list(&self, segments: &[&str]) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint(segments)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.json().await?)
    }

    async fn unwrap_envelope<T>(&self, request: reqwest::RequestBuilder) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let envelope: Envelope<T> = response.json().await?;
        if envelope.error {
            return Err(FetchError::Envelope(
                envelope.msg.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(envelope.data.unwrap_or_default())
    }
}

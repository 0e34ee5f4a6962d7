/*
[INPUT]:  HTTP configuration (base URL, timeouts) and the shared session store
[OUTPUT]: Configured reqwest client with bearer auth and envelope handling
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::http::envelope::{self, Envelope};
use crate::http::{NakaroboError, Result};

/// Default API base used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

const NETWORK_ERROR_MESSAGE: &str = "Network error, please try again";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the NakaRobo REST API
///
/// Every request carries the bearer token held by the session store, and
/// every response goes through envelope normalization. A 401 (status or
/// envelope code) clears the store.
#[derive(Debug, Clone)]
pub struct NakaroboClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
    store: SessionStore,
}

impl NakaroboClient {
    /// Create a new client with default configuration
    pub fn new(store: SessionStore) -> Result<Self> {
        Self::with_config(ClientConfig::default(), store)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, store: SessionStore) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: parse_base_url(&config.base_url)?,
            timeout: config.timeout,
            store,
        })
    }

    /// Session store used for the bearer credential
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// API base every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint relative to the API base
    fn endpoint_url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(endpoint.trim_start_matches('/'))
    }

    /// Build a request, attaching the bearer token when a session exists
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        let builder = self.http_client.request(method, url);
        Ok(match self.store.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and deserialize the unwrapped payload
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let value = self.send_value(builder).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a request and return the unwrapped payload as raw JSON
    pub(crate) async fn send_value(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = response.status();
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;

        debug!(%url, status = status.as_u16(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(NakaroboError::AuthorizationExpired);
        }

        if !status.is_success() {
            let code = envelope::code_from_body(&body).unwrap_or(i64::from(status.as_u16()));
            let message = envelope::message_from_body(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            return Err(NakaroboError::Api { code, message });
        }

        let payload: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|err| {
                NakaroboError::InvalidResponse(format!("expected a JSON body: {err}"))
            })?
        };

        let envelope = Envelope::parse(payload);
        if matches!(envelope, Envelope::Unauthorized { .. }) {
            self.expire_session();
        }
        envelope.into_result()
    }

    fn expire_session(&self) {
        warn!("api rejected session token, clearing local credentials");
        if let Err(err) = self.store.clear_session() {
            warn!(error = %err, "failed to clear session after 401");
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> NakaroboError {
        if err.is_timeout() {
            NakaroboError::Timeout {
                duration: self.timeout.as_secs(),
            }
        } else if err.is_connect() || err.is_request() {
            NakaroboError::Network(NETWORK_ERROR_MESSAGE.to_string())
        } else {
            NakaroboError::Http(err)
        }
    }
}

/// Parse a base URL so that relative joins keep its path (`/api` stays).
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NakaroboError::Config("API base URL must not be empty".to_string()));
    }
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Ok(Url::parse(&with_slash)?)
}

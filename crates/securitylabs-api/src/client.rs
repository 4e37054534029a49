//! HTTP request builder and remote operations
//!
//! One `ApiClient` is bound to one (optional) proxy. Every request carries the
//! `HeaderProfile` headers, TLS certificate verification is disabled, and
//! transport failures are retried `RETRY_COUNT` times before surfacing as
//! `Error::Transport`. A completed exchange is never retried: a non-200
//! status is returned as `Error::Remote` with the raw body.

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{ApiConnector, ApiFuture, RewardApi, UserInfo};
use crate::constants::{
    POOL_IDLE_TIMEOUT, POOL_MAX_IDLE_PER_HOST, REQUEST_TIMEOUT, RETRY_COUNT, RETRY_WAIT,
    SIGN_IN_PATH, USER_INFO_PATH, earn_path,
};
use crate::error::{Error, Result};
use crate::headers::HeaderProfile;

/// Body of a successful sign-in; other fields are ignored.
#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// Configured client for the reward API, routed through at most one proxy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    headers: reqwest::header::HeaderMap,
}

impl ApiClient {
    /// Build a client for `base_url`, optionally routed through `proxy`.
    ///
    /// A blank proxy address means a direct connection. Environment proxy
    /// variables are never consulted. An unparsable proxy address is
    /// reported as `Error::Transport`, since no exchange can happen through it.
    pub fn new(base_url: &str, profile: &HeaderProfile, proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT);

        builder = match proxy.map(str::trim).filter(|p| !p.is_empty()) {
            Some(proxy_url) => {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Transport(format!("invalid proxy {proxy_url}: {e}")))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let http = builder
            .build()
            .map_err(|e| Error::Transport(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: profile.headers().clone(),
        })
    }

    /// Send one request and return the body of a 200 response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let max_attempts = RETRY_COUNT + 1;
        let mut last_error = String::new();

        for attempt in 0..max_attempts {
            if attempt > 0 {
                debug!(path, attempt, "retrying after transport failure");
                tokio::time::sleep(RETRY_WAIT).await;
            }

            let mut request = self
                .http
                .request(method.clone(), &url)
                .headers(self.headers.clone());
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(path, attempt, error = %e, "request failed");
                    last_error = e.to_string();
                    continue;
                }
            };

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::Transport(format!("reading {path} response: {e}")))?;

            if status != StatusCode::OK {
                return Err(Error::Remote {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            debug!(path, status = status.as_u16(), "request succeeded");
            return Ok(bytes.to_vec());
        }

        Err(Error::Transport(format!(
            "{method} {path} failed after {max_attempts} attempts: {last_error}"
        )))
    }
}

fn decode<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(format!("{path}: {e}")))
}

impl RewardApi for ApiClient {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let body = serde_json::json!({ "email": email, "password": password });
            let bytes = self
                .execute(Method::POST, SIGN_IN_PATH, None, Some(&body))
                .await?;
            let response: SignInResponse = decode(SIGN_IN_PATH, &bytes)?;
            Ok(response.access_token)
        })
    }

    fn fetch_user_info<'a>(&'a self, token: &'a str) -> ApiFuture<'a, UserInfo> {
        Box::pin(async move {
            let bytes = self
                .execute(Method::GET, USER_INFO_PATH, Some(token), None)
                .await?;
            decode(USER_INFO_PATH, &bytes)
        })
    }

    fn claim_reward<'a>(&'a self, user_id: &'a str, token: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let path = earn_path(user_id);
            self.execute(Method::GET, &path, Some(token), None).await?;
            Ok(())
        })
    }
}

/// Connector producing real HTTP clients against one base URL.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
    profile: HeaderProfile,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>, profile: HeaderProfile) -> Self {
        Self {
            base_url: base_url.into(),
            profile,
        }
    }
}

impl ApiConnector for HttpConnector {
    type Api = ApiClient;

    fn connect(&self, proxy: Option<&str>) -> Result<ApiClient> {
        ApiClient::new(&self.base_url, &self.profile, proxy)
    }
}

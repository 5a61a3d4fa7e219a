//! reqwest-backed [`MovieApi`] client.

use cinesearch_core::{FetchError, MovieId, Outcome};
use reqwest::Url;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::MovieApi;
use crate::{ClientConfig, ConfigError};

pub struct HttpMovieApi {
    api_root: Url,
    client: reqwest::Client,
}

impl HttpMovieApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let api_root = config.api_root()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Http(e.to_string()))?;
        Ok(Self { api_root, client })
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// GET `api_root + path` with query parameters.
    ///
    /// Resolves to [`Outcome::Canceled`] as soon as `cancel` fires, dropping
    /// the in-flight request. A token that is already cancelled sends nothing.
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Outcome<Value> {
        match self.endpoint(&[path.trim_start_matches('/')]) {
            Ok(url) => self.get_url(url, params, cancel).await,
            Err(err) => Outcome::Failed(err),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Network(format!("cannot extend {}", self.api_root)))?
            .pop_if_empty()
            .extend(segments.iter().flat_map(|s| s.split('/')));
        Ok(url)
    }

    async fn get_url(
        &self,
        url: Url,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Outcome<Value> {
        debug!(url = %url, "backend request");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "backend request canceled");
                Outcome::Canceled
            }
            result = self.fetch_json(url.clone(), params) => {
                if let Err(e) = &result {
                    debug!(url = %url, error = %e, "backend request failed");
                }
                Outcome::from(result)
            }
        }
    }

    async fn fetch_json(&self, url: Url, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            // FastAPI errors look like { "detail": "..." }
            let detail = resp.json::<Value>().await.ok().and_then(|body| {
                body.get("detail")
                    .and_then(Value::as_str)
                    .map(|s| s.to_string())
            });
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        resp.json().await.map_err(transport_error)
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

#[async_trait::async_trait]
impl MovieApi for HttpMovieApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &str, cancel: &CancellationToken) -> Outcome<Value> {
        self.get("/search", &[("q", query)], cancel).await
    }

    async fn movie(&self, id: &MovieId, cancel: &CancellationToken) -> Outcome<Value> {
        let url = {
            let mut url = match self.endpoint(&["movie"]) {
                Ok(url) => url,
                Err(err) => return Outcome::Failed(err),
            };
            // The id is one segment, even if it contains a slash.
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push(id.as_str());
            }
            url
        };
        self.get_url(url, &[], cancel).await
    }
}

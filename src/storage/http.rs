//! HTTP stream backend.
//!
//! Relays audio objects from a remote origin. Keys join onto the configured
//! base URL; absolute URLs are accepted only when their host passes the
//! allow-list. Object sizes are learned with an upstream HEAD so ranges can
//! be resolved before the byte transfer starts; when the origin does not
//! report a size, range requests degrade to a full un-lengthed stream.

use async_trait::async_trait;
use axum::body::Body;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, RANGE};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::range::{ByteRange, Span};
use super::{AudioBackend, AudioStream, ObjectInfo, ServedRange, StreamTarget, DEFAULT_AUDIO_MIME};
use crate::error::ApiError;

/// Extra attempts after the first, on connect failures only.
const MAX_UPSTREAM_RETRIES: u32 = 2;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Option<Url>,
    allowed_hosts: Vec<String>,
}

impl HttpBackend {
    pub fn new(
        base_url: Option<String>,
        allowed_hosts: Vec<String>,
        timeout: Duration,
    ) -> anyhow::Result<HttpBackend> {
        let base_url = match base_url {
            Some(raw) => Some(
                Url::parse(&raw)
                    .map_err(|e| anyhow::anyhow!("Invalid audio base URL {raw:?}: {e}"))?,
            ),
            None => None,
        };
        // A whole-request timeout would sever long audio relays mid-body;
        // bound the connect and per-chunk read times instead.
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(HttpBackend {
            client,
            base_url,
            allowed_hosts,
        })
    }

    fn host_allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(host) => host,
            None => return false,
        };
        if let Some(base) = &self.base_url {
            if base.host_str() == Some(host) {
                return true;
            }
        }
        self.allowed_hosts.iter().any(|allowed| allowed == host)
    }

    fn resolve_url(&self, target: &StreamTarget) -> Result<Url, ApiError> {
        match target {
            StreamTarget::Key(key) => {
                let base = self.base_url.as_ref().ok_or_else(|| {
                    ApiError::BadRequest("no audio base URL configured".into())
                })?;
                let joined = format!(
                    "{}/{}",
                    base.as_str().trim_end_matches('/'),
                    key.trim_start_matches('/')
                );
                Url::parse(&joined)
                    .map_err(|_| ApiError::BadRequest(format!("invalid storage key {key:?}")))
            }
            StreamTarget::Url(raw) => {
                let url = Url::parse(raw)
                    .map_err(|_| ApiError::BadRequest(format!("invalid URL {raw:?}")))?;
                if !self.host_allowed(&url) {
                    return Err(ApiError::Forbidden("URL host not allowed".into()));
                }
                Ok(url)
            }
        }
    }

    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let mut attempt = 0;
        loop {
            match build().send().await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_connect() && attempt < MAX_UPSTREAM_RETRIES => {
                    attempt += 1;
                    debug!("Upstream connect failed, retry {attempt}: {err}");
                    tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                }
                Err(err) if err.is_timeout() => return Err(ApiError::UpstreamTimeout),
                Err(err) => return Err(ApiError::UpstreamUnavailable(err.to_string())),
            }
        }
    }

    /// Map an unexpected upstream status. 404 means the reference does not
    /// resolve to an object; everything else is an origin failure.
    fn upstream_error(status: StatusCode) -> ApiError {
        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound
        } else {
            ApiError::UpstreamUnavailable(format!("upstream returned {status}"))
        }
    }

    async fn probe_url(&self, url: &Url) -> Result<ObjectInfo, ApiError> {
        let response = self
            .send_with_retry(|| self.client.head(url.clone()))
            .await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response.status()));
        }

        let total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        Ok(ObjectInfo {
            total,
            content_type: content_type_of(&response),
        })
    }

    async fn full_stream(&self, url: &Url) -> Result<AudioStream, ApiError> {
        let response = self.send_with_retry(|| self.client.get(url.clone())).await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response.status()));
        }

        let total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let content_type = content_type_of(&response);
        Ok(AudioStream {
            range: ServedRange::Full { total },
            content_type,
            body: Body::from_stream(response.bytes_stream()),
        })
    }

    async fn ranged_stream(
        &self,
        url: &Url,
        start: u64,
        end: u64,
        total: u64,
    ) -> Result<AudioStream, ApiError> {
        let response = self
            .send_with_retry(|| {
                self.client
                    .get(url.clone())
                    .header(RANGE, format!("bytes={start}-{end}"))
            })
            .await?;

        match response.status() {
            StatusCode::PARTIAL_CONTENT => {
                let content_type = content_type_of(&response);
                Ok(AudioStream {
                    range: ServedRange::Partial { start, end, total },
                    content_type,
                    body: Body::from_stream(response.bytes_stream()),
                })
            }
            // Origin ignored the range; relay the whole object instead.
            StatusCode::OK => {
                let content_type = content_type_of(&response);
                Ok(AudioStream {
                    range: ServedRange::Full { total: Some(total) },
                    content_type,
                    body: Body::from_stream(response.bytes_stream()),
                })
            }
            status => Err(Self::upstream_error(status)),
        }
    }
}

fn content_type_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_AUDIO_MIME)
        .to_string()
}

#[async_trait]
impl AudioBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn probe(&self, target: &StreamTarget) -> Result<ObjectInfo, ApiError> {
        let url = self.resolve_url(target)?;
        self.probe_url(&url).await
    }

    async fn serve(
        &self,
        target: &StreamTarget,
        range: Option<ByteRange>,
    ) -> Result<AudioStream, ApiError> {
        let url = self.resolve_url(target)?;

        let range = match range {
            None => return self.full_stream(&url).await,
            Some(range) => range,
        };

        let info = self.probe_url(&url).await?;
        let total = match info.total {
            Some(total) => total,
            None => {
                warn!("Origin reports no size for {url}, serving unranged");
                return self.full_stream(&url).await;
            }
        };

        match range
            .resolve(total)
            .map_err(|_| ApiError::RangeNotSatisfiable { total })?
        {
            Span::Full => self.full_stream(&url).await,
            Span::Partial { start, end } => self.ranged_stream(&url, start, end, total).await,
        }
    }
}

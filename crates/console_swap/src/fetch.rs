use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, FetchError, FetchOutput};

/// Header identifying a request as a partial-content fetch, so the server
/// returns a fragment rather than a full document.
pub const PARTIAL_REQUEST_HEADER: &str = "x-requested-with";
pub const PARTIAL_REQUEST_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Transport-level connect timeout. No request timeout is imposed; a slow
    /// request stays in flight until superseded or the transport fails.
    pub connect_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait::async_trait]
pub trait FragmentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FragmentFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .header(PARTIAL_REQUEST_HEADER, PARTIAL_REQUEST_VALUE)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = response.text().await.map_err(map_reqwest_error)?;
        let json = if content_type.as_deref().is_some_and(is_json_content_type) {
            serde_json::from_str(&body).ok()
        } else {
            None
        };

        Ok(FetchOutput {
            request_url: url.to_string(),
            final_url,
            content_type,
            body,
            json,
        })
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    ct.eq_ignore_ascii_case("application/json")
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

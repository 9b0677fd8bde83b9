use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Shared HTTP transport for every outbound call the lens makes.
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let inner = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::from_reqwest_error)?;
        Ok(Self { inner })
    }

    /// GET `url` and decode a JSON body. Non-2xx statuses are errors.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let parsed_url = url::Url::parse(url)?;
        let response = self
            .inner
            .get(parsed_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let body = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest_error)?;
        debug!(status = %status, bytes = body.len(), "json response received");
        Ok(serde_json::from_slice(&body)?)
    }

    /// HEAD `url` with a per-request deadline and report the final status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn head_status(&self, url: &str, timeout: Duration) -> Result<StatusCode, FetchError> {
        let parsed_url = url::Url::parse(url)?;
        let response = self
            .inner
            .head(parsed_url)
            .timeout(timeout)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;
        Ok(response.status())
    }

    /// Download an HTML page and decode it to UTF-8.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;

        let response = self
            .inner
            .get(parsed_url)
            .header(reqwest::header::ACCEPT, HTML_ACCEPT)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Content-Length may be absent or wrong
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        process_response(final_url, status, body_bytes, &content_type)
    }
}

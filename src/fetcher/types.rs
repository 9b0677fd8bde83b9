use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

/// A downloaded HTML document, decoded to UTF-8.
#[derive(Debug)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub body_utf8: String,
    /// WHATWG name of the encoding the body was decoded from.
    pub charset: &'static str,
    pub fetched_at: DateTime<Utc>,
}

//! Citation lookups against the Crossref REST API.
//!
//! API: {base}/works/{doi}

use serde::Deserialize;
use tracing::instrument;

use crate::fetcher::{FetchError, HttpClient};
use crate::metadata::model::{Article, Author, MetadataSource};

const ORCID_BASE: &str = "https://orcid.org/";

#[derive(Debug, Deserialize)]
struct WorkEnvelope {
    message: Option<Work>,
}

#[derive(Debug, Default, Deserialize)]
struct Work {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<WorkAuthor>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    issued: Option<PartialDate>,
    published: Option<PartialDate>,
    #[serde(rename = "published-online")]
    published_online: Option<PartialDate>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    given: Option<String>,
    family: Option<String>,
    /// Set for organisational authors instead of given/family.
    name: Option<String>,
    #[serde(rename = "ORCID")]
    orcid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartialDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

impl PartialDate {
    fn year(&self) -> Option<i64> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

#[derive(Clone, Debug)]
pub struct CrossrefClient {
    http: HttpClient,
    base_url: String,
}

impl CrossrefClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve `doi` to an article. A response without a `message`, or whose
    /// work names no journal, counts as a failed lookup.
    #[instrument(skip(self))]
    pub async fn lookup(&self, doi: &str) -> Result<Article, FetchError> {
        let url = format!("{}/works/{}", self.base_url, doi);
        let envelope: WorkEnvelope = self.http.get_json(&url).await?;
        let work = envelope
            .message
            .ok_or_else(|| FetchError::Decode("response has no message".to_string()))?;
        work_to_article(doi, work)
    }
}

fn work_to_article(doi: &str, work: Work) -> Result<Article, FetchError> {
    let journal = work
        .container_title
        .first()
        .map(|j| decode_ampersands(j.trim()))
        .filter(|j| !j.is_empty())
        .ok_or_else(|| FetchError::Decode("work has no container-title".to_string()))?;

    let year = [&work.issued, &work.published, &work.published_online]
        .into_iter()
        .flatten()
        .find_map(PartialDate::year)
        .map(|y| y.to_string());

    let authors = work.author.into_iter().filter_map(convert_author).collect();

    Ok(Article {
        doi: Some(doi.to_string()),
        title: work.title.into_iter().next().unwrap_or_default(),
        journal,
        year,
        authors,
        source: MetadataSource::Crossref,
    })
}

fn convert_author(author: WorkAuthor) -> Option<Author> {
    let personal = [author.given.as_deref(), author.family.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let name = if personal.is_empty() {
        author.name?.trim().to_string()
    } else {
        personal
    };
    if name.is_empty() {
        return None;
    }

    Some(Author {
        name,
        orcid_link: author.orcid.as_deref().and_then(orcid_link),
        is_corresponding: false,
    })
}

/// `http://orcid.org/0000-0002-1825-0097` becomes a link built from the
/// identifier's last path segment.
fn orcid_link(raw: &str) -> Option<String> {
    let id = raw.trim().trim_end_matches('/').rsplit('/').next()?;
    if id.is_empty() {
        return None;
    }
    Some(format!("{ORCID_BASE}{id}"))
}

fn decode_ampersands(s: &str) -> String {
    s.replace("&amp;", "&")
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub orcid_link: Option<String>,
    pub is_corresponding: bool,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orcid_link: None,
            is_corresponding: false,
        }
    }
}

/// Where the article's fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    Crossref,
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub doi: Option<String>,
    pub title: String,
    pub journal: String,
    /// Four-digit publication year.
    pub year: Option<String>,
    pub authors: Vec<Author>,
    pub source: MetadataSource,
}

impl Article {
    pub fn from_api(&self) -> bool {
        self.source == MetadataSource::Crossref
    }
}

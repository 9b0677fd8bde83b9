//! Decides whether a page is a scholarly article.
//!
//! Any strong signal admits the page on its own; weak signals only count in
//! corroborated pairs. The result is a heuristic and carries no error state.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::page::Page;
use crate::page::doi::{DOI_META_NAMES, extract_doi, find_doi};

static ARTICLE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)/(?:doi|articles?|abs|full|fulltext|content|science/article|papers?|publication)/",
    )
    .unwrap()
});

static DOI_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)doi\.org/10\.\d{4,}/|DOI:\s*10\.\d{4,}/").unwrap());

static ABSTRACT_REGION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"[id*="abstract"], [class*="abstract"], [id*="Abstract"], [class*="Abstract"], [id*="summary"], [class*="summary"]"#,
    )
    .unwrap()
});

static REFERENCES_REGION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"[id*="references"], [class*="references"], [id*="Bib"], [id*="bibliography"], [class*="bibliography"], section[role="doc-bibliography"]"#,
    )
    .unwrap()
});

const AUTHOR_META_NAMES: [&str; 2] = ["citation_author", "dc.creator"];

/// The individual observations the verdict is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub doi_meta: bool,
    pub citation_meta_pair: bool,
    pub article_path: bool,
    pub author_meta: bool,
    pub doi_text: bool,
    pub abstract_region: bool,
    pub references_region: bool,
    pub doi_extracted: bool,
}

impl Signals {
    /// Strong signals, or an article-looking URL backed by one piece of
    /// evidence, or an abstract together with a reference list.
    pub fn is_academic(&self) -> bool {
        let strong = self.doi_meta || self.citation_meta_pair || self.doi_extracted;
        let corroborated_path =
            self.article_path && (self.author_meta || self.doi_text || self.abstract_region);
        let paper_layout = self.abstract_region && self.references_region;
        strong || corroborated_path || paper_layout
    }
}

pub fn classify(page: &Page, config: &Config) -> Signals {
    let signals = Signals {
        doi_meta: DOI_META_NAMES
            .iter()
            .flat_map(|name| page.meta_values(name))
            .any(|value| find_doi(&value).is_some()),
        citation_meta_pair: page.has_meta("citation_journal_title")
            && page.has_meta("citation_title"),
        article_path: ARTICLE_PATH_RE.is_match(page.url().path()),
        author_meta: AUTHOR_META_NAMES.iter().any(|name| page.has_meta(name)),
        doi_text: DOI_TEXT_RE.is_match(page.body_text()),
        abstract_region: page.exists(&ABSTRACT_REGION),
        references_region: page.exists(&REFERENCES_REGION),
        doi_extracted: extract_doi(page, config).is_some(),
    };
    debug!(url = %page.url(), ?signals, "page classified");
    signals
}

pub fn is_academic_page(page: &Page, config: &Config) -> bool {
    classify(page, config).is_academic()
}

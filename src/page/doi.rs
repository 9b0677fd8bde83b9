//! DOI extraction.
//!
//! Strategies run in a fixed order and the first one that yields a
//! syntactically valid DOI wins. There is no voting between them.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use tracing::debug;

use crate::config::Config;
use crate::page::{Page, element_text};

const DOI_PATTERN: &str = r"10\.\d{4,9}/[-._;()/:A-Za-z0-9]+";

/// Meta tags that carry a DOI, most specific first.
pub const DOI_META_NAMES: [&str; 6] = [
    "citation_doi",
    "prism.doi",
    "dc.identifier",
    "bepress_citation_doi",
    "dc.identifier.doi",
    "rft_id",
];

static DOI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(DOI_PATTERN).unwrap());

static URL_DOI_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)doi/(?:full/|abs/|pdf/|epdf/)?({DOI_PATTERN})")).unwrap()
});

static URL_BARE_DOI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"/({DOI_PATTERN})")).unwrap());

static TEXT_DOI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(?:DOI:\s*|doi\.org/)({DOI_PATTERN})")).unwrap()
});

static DOI_ANCHORS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href*="doi.org/10."], a[href^="doi:"], a[href^="DOI:"]"#).unwrap()
});

type Strategy = fn(&Page, &Config) -> Option<String>;

const STRATEGIES: [(&str, Strategy); 5] = [
    ("meta", from_meta),
    ("url", from_url),
    ("anchor", from_anchors),
    ("text", from_text),
    ("publisher", from_publisher_selector),
];

/// The page's DOI, or `None` when no strategy finds one.
pub fn extract_doi(page: &Page, config: &Config) -> Option<String> {
    for (name, strategy) in STRATEGIES {
        if let Some(doi) = strategy(page, config) {
            debug!(strategy = name, doi = %doi, "doi extracted");
            return Some(doi);
        }
    }
    None
}

/// First DOI-shaped substring of `haystack`.
pub fn find_doi(haystack: &str) -> Option<String> {
    DOI_RE.find(haystack).map(|m| clean(m.as_str()))
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    let m = re.captures(haystack)?.get(1)?;
    Some(clean(m.as_str()))
}

/// Sentence punctuation glued to the end of a DOI is not part of it.
fn clean(doi: &str) -> String {
    doi.trim_end_matches(['.', ',', ';', ':']).to_string()
}

fn from_meta(page: &Page, _config: &Config) -> Option<String> {
    DOI_META_NAMES
        .iter()
        .flat_map(|name| page.meta_values(name))
        .find_map(|value| find_doi(&value))
}

fn from_url(page: &Page, _config: &Config) -> Option<String> {
    let path = page.url().path();
    capture(&URL_DOI_PATH_RE, path).or_else(|| capture(&URL_BARE_DOI_RE, path))
}

fn from_anchors(page: &Page, _config: &Config) -> Option<String> {
    page.document()
        .select(&DOI_ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .find_map(find_doi)
}

fn from_text(page: &Page, _config: &Config) -> Option<String> {
    capture(&TEXT_DOI_RE, page.body_text())
}

fn from_publisher_selector(page: &Page, config: &Config) -> Option<String> {
    let selector = config.publisher_for_host(page.host())?.doi_selector_str()?;
    page.select(selector).into_iter().find_map(|el| {
        el.value()
            .attr("href")
            .and_then(find_doi)
            .or_else(|| find_doi(&element_text(&el)))
    })
}

//! On-page metadata, used when the citation API is unavailable or there was
//! no DOI to ask it about.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::config::Config;
use crate::metadata::model::{Article, Author, MetadataSource};
use crate::page::{Page, element_text};

const TITLE_META: [&str; 4] = ["citation_title", "dc.title", "prism.title", "og:title"];
const JOURNAL_META: [&str; 4] = [
    "citation_journal_title",
    "prism.publicationName",
    "citation_journal_abbrev",
    "dc.source",
];
const DATE_META: [&str; 5] = [
    "citation_publication_date",
    "citation_date",
    "prism.publicationDate",
    "dc.date",
    "article:published_time",
];
const AUTHOR_META: [&str; 2] = ["citation_author", "dc.creator"];

/// Longest text an element may carry and still be read as one author name.
const MAX_AUTHOR_NAME_CHARS: usize = 60;
const MAX_AUTHOR_NAME_WORDS: usize = 6;
const MAX_DOM_AUTHORS: usize = 100;

/// First four-digit run, so compact dates like `20200715` still yield a year.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\D)(\d{4})").unwrap());

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

static AUTHOR_NODES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[class*="author"], [id*="author"]"#).unwrap());

static ORCID_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="orcid.org/"]"#).unwrap());

static MAILTO_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="mailto:"]"#).unwrap());

/// Article assembled from the page alone. `None` when the page names no
/// journal, which leaves nothing worth presenting.
pub fn article_from_page(page: &Page, doi: Option<&str>, config: &Config) -> Option<Article> {
    let journal = page.first_meta(&JOURNAL_META)?;

    Some(Article {
        doi: doi.map(str::to_string),
        title: title(page).unwrap_or_default(),
        journal: journal.replace("&amp;", "&"),
        year: year(page),
        authors: authors(page, config),
        source: MetadataSource::Page,
    })
}

pub fn title(page: &Page) -> Option<String> {
    page.first_meta(&TITLE_META).or_else(|| page.title()).or_else(|| {
        page.document()
            .select(&H1)
            .map(|h| element_text(&h))
            .find(|t| !t.is_empty())
    })
}

pub fn year(page: &Page) -> Option<String> {
    DATE_META
        .iter()
        .filter_map(|name| page.meta(name))
        .find_map(|date| YEAR_RE.captures(&date).map(|c| c[1].to_string()))
}

/// Authors from citation meta tags, else the publisher's author selector,
/// else short text elements whose class or id mentions "author".
pub fn authors(page: &Page, config: &Config) -> Vec<Author> {
    let from_meta: Vec<Author> = AUTHOR_META
        .iter()
        .map(|name| page.meta_values(name))
        .find(|values| !values.is_empty())
        .unwrap_or_default()
        .into_iter()
        .map(Author::named)
        .collect();
    if !from_meta.is_empty() {
        return from_meta;
    }

    let publisher_selector = config
        .publisher_for_host(page.host())
        .and_then(|p| p.author_selector_str());
    if let Some(selector) = publisher_selector {
        let found = collect_authors(page.select(selector));
        if !found.is_empty() {
            return found;
        }
    }

    collect_authors(page.document().select(&AUTHOR_NODES))
}

fn collect_authors<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> Vec<Author> {
    let mut authors: Vec<Author> = Vec::new();
    for element in elements {
        if wraps_author_nodes(&element) {
            continue;
        }
        let Some(name) = author_name(&element) else {
            continue;
        };
        if authors.iter().any(|a| a.name == name) {
            continue;
        }
        authors.push(Author {
            name,
            orcid_link: element
                .select(&ORCID_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
            is_corresponding: is_corresponding(&element),
        });
        if authors.len() >= MAX_DOM_AUTHORS {
            break;
        }
    }
    authors
}

/// Author-list wrappers match the same selector as the entries they hold.
fn wraps_author_nodes(element: &ElementRef<'_>) -> bool {
    element
        .select(&AUTHOR_NODES)
        .any(|inner| inner.id() != element.id())
}

/// Names are short. Anything longer is a list container or a bio.
fn author_name(element: &ElementRef<'_>) -> Option<String> {
    let own = text_outside_links(element);
    let text = if own.is_empty() { element_text(element) } else { own };
    let text = text.trim_matches(|c: char| c == ',' || c == ';' || c.is_whitespace());
    if text.is_empty()
        || text.chars().count() > MAX_AUTHOR_NAME_CHARS
        || text.split_whitespace().count() > MAX_AUTHOR_NAME_WORDS
        || text.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }
    let lowered = text.to_lowercase();
    if matches!(lowered.as_str(), "author" | "authors" | "author information" | "affiliations") {
        return None;
    }
    Some(text.to_string())
}

/// Element text minus nested links, which hold ORCID badges and mail icons.
fn text_outside_links(element: &ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let in_link = node
                .ancestors()
                .take_while(|a| a.id() != element.id())
                .any(|a| a.value().as_element().is_some_and(|e| e.name() == "a"));
            (!in_link).then_some(&**text)
        })
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_corresponding(element: &ElementRef<'_>) -> bool {
    let marked = element
        .value()
        .attr("class")
        .is_some_and(|c| c.to_lowercase().contains("corresp"));
    marked || element.select(&MAILTO_LINK).next().is_some()
}

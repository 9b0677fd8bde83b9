//! Read-only view of one scholarly (or not) web page.

pub mod classifier;
pub mod doi;

use scraper::{ElementRef, Html, Selector};
use std::cell::OnceCell;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

pub use classifier::{Signals, classify, is_academic_page};
pub use doi::{extract_doi, find_doi};

static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

const SKIPPED_TEXT_PARENTS: [&str; 3] = ["script", "style", "noscript"];

pub struct Page {
    url: Url,
    document: Html,
    body_text: OnceCell<String>,
}

impl Page {
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
            body_text: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Content of the first non-empty `<meta>` whose `name` or `property`
    /// equals `name`, compared case-insensitively.
    pub fn meta(&self, name: &str) -> Option<String> {
        self.meta_values(name).into_iter().next()
    }

    /// Every non-empty content for `name`, in document order.
    pub fn meta_values(&self, name: &str) -> Vec<String> {
        self.document
            .select(&META)
            .filter(|el| {
                let attrs = el.value();
                [attrs.attr("name"), attrs.attr("property")]
                    .into_iter()
                    .flatten()
                    .any(|n| n.trim().eq_ignore_ascii_case(name))
            })
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// First meta value among `names`, honouring their order.
    pub fn first_meta(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.meta(name))
    }

    pub fn has_meta(&self, name: &str) -> bool {
        self.meta(name).is_some()
    }

    /// Elements matching a CSS selector. Unparseable selectors match nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(e) => {
                debug!(selector = css, error = ?e, "ignoring invalid selector");
                Vec::new()
            }
        }
    }

    pub fn exists(&self, selector: &Selector) -> bool {
        self.document.select(selector).next().is_some()
    }

    /// Contents of `<title>`, trimmed.
    pub fn title(&self) -> Option<String> {
        self.document
            .select(&TITLE)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
    }

    /// Visible text of `<body>` with script and style contents left out.
    pub fn body_text(&self) -> &str {
        self.body_text.get_or_init(|| {
            let Some(body) = self.document.select(&BODY).next() else {
                return String::new();
            };
            let mut text = String::new();
            for node in body.descendants() {
                let Some(chunk) = node.value().as_text() else {
                    continue;
                };
                let hidden = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name()))
                    .is_some_and(|name| SKIPPED_TEXT_PARENTS.contains(&name));
                if !hidden {
                    text.push_str(chunk);
                    text.push(' ');
                }
            }
            text
        })
    }
}

/// Text content of an element with whitespace runs collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

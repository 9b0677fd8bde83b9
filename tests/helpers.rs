#![allow(dead_code)]

use paperlens::{Analysis, Presenter, page::Page};
use std::fs;
use std::time::Duration;
use url::Url;

pub const NATURE_DOI: &str = "10.1038/s41586-020-1234-5";

pub fn fixture_page(name: &str, url: &str) -> Page {
    let html = fs::read_to_string(format!("tests/fixtures/{name}"))
        .expect("Failed to read test fixture");
    Page::parse(Url::parse(url).unwrap(), &html)
}

pub fn crossref_work(journal: &str, year: i64) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "message": {
            "DOI": NATURE_DOI,
            "title": ["X from Crossref"],
            "container-title": [journal],
            "issued": {"date-parts": [[year, 7, 15]]},
            "author": [
                {"given": "Jane", "family": "Doe", "ORCID": "http://orcid.org/0000-0002-1825-0097"},
                {"given": "John", "family": "Roe"}
            ]
        }
    })
}

/// Short timeouts keep mirror probing fast in tests.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Collects everything it is asked to present.
#[derive(Default)]
pub struct RecordingPresenter {
    pub presented: Vec<Analysis>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, analysis: &Analysis) {
        self.presented.push(analysis.clone());
    }
}

//! End-to-end resolution for one page.
//!
//! classify -> extract DOI -> resolve metadata -> match journal -> filter.
//! The journal index and the mirror probe start as soon as the page is
//! admitted and run while extraction and the citation lookup proceed.

use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, KeyValueStore};
use crate::config::Config;
use crate::fetcher::{FetchError, HttpClient};
use crate::journal::{JournalIndexLoader, JournalMatch, match_journal, passes_impact_filter};
use crate::metadata::{Article, CrossrefClient, MetadataResolver};
use crate::mirror::{MirrorLookup, MirrorResolver, MirrorState, mirror_url};
use crate::page::{Page, classify, extract_doi};
use crate::report::Report;

/// Everything a presenter needs for one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub article: Article,
    pub journal: Option<JournalMatch>,
    pub report: Report,
}

/// A finished analysis plus the mirror lookup, which may still be running.
pub struct Session {
    pub analysis: Analysis,
    pub mirror: MirrorLookup,
}

/// Receives finished analyses. Rendering is up to the implementor.
pub trait Presenter {
    fn present(&mut self, analysis: &Analysis);
}

pub struct Lens {
    config: Arc<Config>,
    index_loader: JournalIndexLoader,
    metadata: MetadataResolver,
    mirror: Arc<MirrorResolver>,
}

impl Lens {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, FetchError> {
        let http = HttpClient::new(config.user_agent())?;
        let cache = CacheStore::new(store, config.cache_ttls().clone());
        let crossref = CrossrefClient::new(http.clone(), config.crossref_url());

        Ok(Self {
            index_loader: JournalIndexLoader::new(http.clone(), cache.clone()),
            metadata: MetadataResolver::new(crossref),
            mirror: Arc::new(MirrorResolver::new(http, cache, &config)),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `page`. `None` when the page is not scholarly, names no
    /// journal, or its journal falls under the impact-factor threshold.
    pub async fn analyze(&self, page: &Page) -> Option<Session> {
        let signals = classify(page, &self.config);
        if !signals.is_academic() {
            info!(url = %page.url(), "not an academic page");
            return None;
        }

        let mirror = Arc::clone(&self.mirror).spawn();
        let index = {
            let loader = self.index_loader.clone();
            let url = self.config.journal_index_url().to_string();
            tokio::spawn(async move { loader.load_or_empty(&url).await })
        };

        let doi = extract_doi(page, &self.config);
        let article = self
            .metadata
            .resolve(doi.as_deref(), page, &self.config)
            .await?;

        let index = match index.await {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "journal index task failed");
                Default::default()
            }
        };
        let journal = match_journal(&article.journal, &index, self.config.publishers());

        if let Some(m) = &journal
            && !passes_impact_filter(&m.info, self.config.min_impact_factor())
        {
            info!(
                journal = %article.journal,
                impact_factor = ?m.info.impact_factor,
                threshold = self.config.min_impact_factor(),
                "journal below impact threshold, not presenting"
            );
            return None;
        }

        let report = Report::build(&article, journal.as_ref());
        debug!(title = %report.title, "analysis complete");
        Some(Session {
            analysis: Analysis {
                article,
                journal,
                report,
            },
            mirror,
        })
    }

    /// Analyze and hand the result to `presenter`. Unresolvable pages never
    /// reach the presenter.
    pub async fn run(&self, page: &Page, presenter: &mut dyn Presenter) -> Option<MirrorLookup> {
        let session = self.analyze(page).await?;
        presenter.present(&session.analysis);
        Some(session.mirror)
    }
}

/// Plain-text rendering for terminals.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report the settled mirror lookup for the article's DOI.
    pub fn mirror(&mut self, analysis: &Analysis, state: &MirrorState) {
        let line = match (state, analysis.article.doi.as_deref()) {
            (MirrorState::Found(host), Some(doi)) => mirror_url(host, doi),
            (MirrorState::Found(_), None) => "no DOI to look up".to_string(),
            (MirrorState::NotFound, _) => "no mirror found".to_string(),
            (MirrorState::TimedOut, _) => "mirror lookup timed out".to_string(),
        };
        self.write_row("Mirror", &line);
    }

    fn write_row(&mut self, label: &str, value: &str) {
        if let Err(e) = writeln!(self.out, "{label:>9}: {value}") {
            warn!(error = %e, "failed to write report");
        }
    }

    fn render(&mut self, analysis: &Analysis) -> std::io::Result<()> {
        let r = &analysis.report;
        writeln!(self.out, "{}", r.display_title)?;
        let optional_rows = [
            ("DOI", r.doi.clone()),
            ("Abbr.", r.abbr.clone()),
            ("ISSN", r.issn.clone()),
        ];
        self.write_row("Journal", &r.journal);
        for (label, value) in optional_rows {
            if let Some(value) = value {
                self.write_row(label, &value);
            }
        }
        self.write_row("Year", r.year.as_deref().unwrap_or("N/A"));

        if let Some(impact) = &r.impact {
            let mut line = format!("IF {}", impact.value);
            if let Some(five) = &impact.five_year {
                line.push_str(&format!(" / 5Y IF {five}"));
            }
            self.write_row("Impact", &line);
        }
        if let Some(category) = &r.category {
            self.write_row("Category", &category.subject);
            if let Some(quartile) = &category.quartile {
                self.write_row("JCR", quartile);
            }
            if let Some(rank) = &category.rank {
                self.write_row("Rank", rank);
            }
        }
        if r.known_high_impact {
            self.write_row("Data", "Known high-impact journal, no metrics");
        } else if !r.in_index {
            self.write_row("Data", "Not in journal index");
        }
        self.write_row("Authors", &r.authors);
        self.write_row("Cite", &r.citation);
        Ok(())
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, analysis: &Analysis) {
        if let Err(e) = self.render(analysis) {
            warn!(error = %e, "failed to write report");
        }
    }
}

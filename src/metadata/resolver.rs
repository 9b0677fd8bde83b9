use tracing::{debug, info, warn};

use crate::config::Config;
use crate::metadata::crossref::CrossrefClient;
use crate::metadata::fallback::article_from_page;
use crate::metadata::model::Article;
use crate::page::Page;

/// Citation API first, page metadata second.
#[derive(Clone, Debug)]
pub struct MetadataResolver {
    crossref: CrossrefClient,
}

impl MetadataResolver {
    pub fn new(crossref: CrossrefClient) -> Self {
        Self { crossref }
    }

    /// Resolve the page's article. `None` means no journal could be found
    /// by any route and the page is not presentable.
    pub async fn resolve(&self, doi: Option<&str>, page: &Page, config: &Config) -> Option<Article> {
        if let Some(doi) = doi {
            match self.crossref.lookup(doi).await {
                Ok(article) => {
                    info!(doi, journal = %article.journal, "metadata resolved via crossref");
                    return Some(article);
                }
                Err(e) => warn!(doi, error = %e, "crossref lookup failed, using page metadata"),
            }
        }

        let article = article_from_page(page, doi, config);
        match &article {
            Some(a) => debug!(journal = %a.journal, "metadata resolved from page"),
            None => info!(url = %page.url(), "no journal found, page is unresolvable"),
        }
        article
    }
}

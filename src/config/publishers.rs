use std::collections::BTreeSet;

/// DOM selectors specific to one publisher's page layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherSelectors {
    /// Element whose text or `href` carries the article DOI.
    pub doi: Option<String>,
    /// Elements naming the article's authors.
    pub authors: Option<String>,
}

/// Static description of a publisher: where it lives and what it publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherPattern {
    pub name: String,
    pub domains: BTreeSet<String>,
    pub subsidiaries: BTreeSet<String>,
    pub journals: Vec<String>,
    pub selectors: Option<PublisherSelectors>,
}

impl PublisherPattern {
    fn new(name: &str, domains: &[&str], journals: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            subsidiaries: BTreeSet::new(),
            journals: journals.iter().map(|j| j.to_string()).collect(),
            selectors: None,
        }
    }

    fn subsidiaries(mut self, names: &[&str]) -> Self {
        self.subsidiaries = names.iter().map(|s| s.to_string()).collect();
        self
    }

    fn doi_selector(mut self, selector: &str) -> Self {
        self.selectors.get_or_insert_with(Default::default).doi = Some(selector.to_string());
        self
    }

    fn author_selector(mut self, selector: &str) -> Self {
        self.selectors.get_or_insert_with(Default::default).authors = Some(selector.to_string());
        self
    }

    /// True when `host` is one of the publisher's domains or a subdomain of one.
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }

    pub fn doi_selector_str(&self) -> Option<&str> {
        self.selectors.as_ref()?.doi.as_deref()
    }

    pub fn author_selector_str(&self) -> Option<&str> {
        self.selectors.as_ref()?.authors.as_deref()
    }
}

const CELL_PRESS_JOURNALS: [&str; 10] = [
    "Molecular Biology of the Cell",
    "Molecular Cell",
    "Cell",
    "Developmental Cell",
    "Trends in Cell Biology",
    "Current Biology",
    "Cell Stem Cell",
    "Cell Reports",
    "Cell Systems",
    "Cell Host & Microbe",
];

/// The built-in publisher table.
pub fn default_publishers() -> Vec<PublisherPattern> {
    let asbmb_journals: Vec<&str> = std::iter::once("Journal of Biological Chemistry")
        .chain(CELL_PRESS_JOURNALS)
        .collect();

    vec![
        PublisherPattern::new(
            "American Chemical Society",
            &["acs.org"],
            &["JACS", "JPCA", "JPCB", "JPCC", "JPCL"],
        )
        .doi_selector("div.article_header-doiurl a"),
        PublisherPattern::new(
            "American Physical Society",
            &["aps.org"],
            &[
                "Phys. Rev. A",
                "Phys. Rev. B",
                "Phys. Rev. C",
                "Phys. Rev. D",
                "Phys. Rev. E",
                "Phys. Rev. Lett.",
                "Phys. Rev. Materials",
                "Phys. Rev. X",
                "Phys. Rev. Accel. Beams",
                "Phys. Rev. Applied",
                "Phys. Rev. Fluids",
                "Phys. Rev. Research",
            ],
        ),
        PublisherPattern::new(
            "American Society for Cell Biology",
            &["ascb.org"],
            &CELL_PRESS_JOURNALS,
        ),
        PublisherPattern::new(
            "American Society for Biochemistry and Molecular Biology",
            &["asbmb.org"],
            &asbmb_journals,
        ),
        PublisherPattern::new("Optica Publishing Group", &["opg.optica.org", "optica.org"], &[])
            .doi_selector("ul.article-journal-name a[href*='doi.org']"),
        PublisherPattern::new(
            "Springer Nature",
            &["nature.com"],
            &["Nature", "Nature Communications", "Nature Physics", "Nature Photonics"],
        )
        .subsidiaries(&["Nature Portfolio", "Scientific Reports"])
        .doi_selector("li.c-bibliographic-information__list-item--doi a")
        .author_selector("ul.c-article-author-list li a[data-test='author-name']"),
        PublisherPattern::new(
            "American Association for the Advancement of Science",
            &["science.org", "sciencemag.org"],
            &["Science", "Science Advances", "Science Robotics"],
        )
        .doi_selector("div.doi a"),
        PublisherPattern::new("Cell Press", &["cell.com"], &CELL_PRESS_JOURNALS)
            .subsidiaries(&["Elsevier"])
            .doi_selector("a.article-header__doi__value"),
        PublisherPattern::new("Wiley", &["onlinelibrary.wiley.com", "wiley.com"], &[])
            .doi_selector("a.epub-doi")
            .author_selector("div.accordion-tabbed .author-name"),
    ]
}

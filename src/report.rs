//! Presentation-ready view of a resolved article.

use serde::Serialize;

use crate::journal::{Category, JournalMatch};
use crate::metadata::{Article, Author};

const CORRESPONDING_MARK: &str = "(corresponding)";
const HIGH_IMPACT: f64 = 20.0;
const MEDIUM_HIGH_IMPACT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTier {
    High,
    MediumHigh,
    Medium,
}

impl ImpactTier {
    pub fn for_value(value: f64) -> Self {
        if value >= HIGH_IMPACT {
            Self::High
        } else if value > MEDIUM_HIGH_IMPACT {
            Self::MediumHigh
        } else {
            Self::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Impact {
    pub value: String,
    pub tier: Option<ImpactTier>,
    pub five_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub display_title: String,
    pub doi: Option<String>,
    pub journal: String,
    pub abbr: Option<String>,
    pub issn: Option<String>,
    pub year: Option<String>,
    pub authors: String,
    pub impact: Option<Impact>,
    pub category: Option<Category>,
    pub in_index: bool,
    pub known_high_impact: bool,
    pub citation: String,
}

impl Report {
    pub fn build(article: &Article, journal: Option<&JournalMatch>) -> Self {
        let title = clean_title(&article.title);
        let info = journal.map(|m| &m.info);

        let impact = info.and_then(|i| {
            let value = i.impact_factor.clone()?;
            Some(Impact {
                tier: i.impact_factor_value().map(ImpactTier::for_value),
                value,
                five_year: i.impact_factor_5y.clone(),
            })
        });

        Self {
            display_title: format!("{} | {}", title, article.journal),
            doi: article.doi.clone(),
            journal: article.journal.clone(),
            abbr: info.and_then(|i| i.abbr.clone()),
            issn: info.and_then(|i| i.issn.clone()),
            year: article.year.clone(),
            authors: format_authors(&article.authors),
            impact,
            category: info.and_then(|i| i.category_parts()),
            in_index: info.is_some_and(|i| !i.known_high_impact),
            known_high_impact: info.is_some_and(|i| i.known_high_impact),
            citation: citation(article, &title),
            title,
        }
    }
}

/// Page titles often carry a `| Site` suffix.
pub fn clean_title(title: &str) -> String {
    title.split('|').next().unwrap_or_default().trim().to_string()
}

/// Marks corresponding authors (the last author when none is marked) and
/// shortens lists longer than three to `A, B, ..., Z`.
pub fn format_authors(authors: &[Author]) -> String {
    if authors.is_empty() {
        return "Not found".to_string();
    }
    let any_marked = authors.iter().any(|a| a.is_corresponding);
    let last = authors.len() - 1;
    let names: Vec<String> = authors
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let mut name = a.name.clone();
            if a.is_corresponding || (!any_marked && i == last) {
                name.push(' ');
                name.push_str(CORRESPONDING_MARK);
            }
            name
        })
        .collect();

    if names.len() > 3 {
        format!("{}, {}, ..., {}", names[0], names[1], names[last])
    } else {
        names.join(", ")
    }
}

/// `"<first author>[ et al.], '<title>' (<year>), <journal>"`
pub fn citation(article: &Article, clean_title: &str) -> String {
    let first = article.authors.first().map(|a| a.name.as_str()).unwrap_or("");
    let authors = if article.authors.len() > 1 {
        format!("{first} et al.")
    } else {
        first.to_string()
    };
    format!(
        "{}, '{}' ({}), {}",
        authors,
        clean_title,
        article.year.as_deref().unwrap_or(""),
        article.journal
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{JournalInfo, MatchKind};
    use crate::metadata::MetadataSource;

    fn article(authors: &[&str]) -> Article {
        Article {
            doi: Some("10.1/x".to_string()),
            title: "A Result | Nature".to_string(),
            journal: "Nature".to_string(),
            year: Some("2020".to_string()),
            authors: authors.iter().map(|a| Author::named(*a)).collect(),
            source: MetadataSource::Crossref,
        }
    }

    #[test]
    fn long_author_lists_collapse() {
        let a = article(&["A", "B", "C", "D"]);
        assert_eq!(format_authors(&a.authors), "A, B, ..., D (corresponding)");
    }

    #[test]
    fn explicit_corresponding_author_is_kept() {
        let mut a = article(&["A", "B"]);
        a.authors[0].is_corresponding = true;
        assert_eq!(format_authors(&a.authors), "A (corresponding), B");
        assert_eq!(format_authors(&[]), "Not found");
    }

    #[test]
    fn citation_uses_first_author_and_clean_title() {
        let a = article(&["Ada Lovelace", "Charles Babbage"]);
        let report = Report::build(&a, None);
        assert_eq!(report.title, "A Result");
        assert_eq!(report.display_title, "A Result | Nature");
        assert_eq!(report.citation, "Ada Lovelace et al., 'A Result' (2020), Nature");
        assert!(!report.in_index);
    }

    #[test]
    fn impact_tiers_follow_thresholds() {
        assert_eq!(ImpactTier::for_value(20.0), ImpactTier::High);
        assert_eq!(ImpactTier::for_value(15.5), ImpactTier::MediumHigh);
        assert_eq!(ImpactTier::for_value(15.0), ImpactTier::Medium);
    }

    #[test]
    fn report_carries_index_data() {
        let m = JournalMatch {
            info: JournalInfo {
                abbr: Some("NATURE".to_string()),
                impact_factor: Some("49.9".to_string()),
                category: Some("Multidisciplinary|Q1|5/73".to_string()),
                ..JournalInfo::default()
            },
            kind: MatchKind::Exact,
            matched: "NATURE".to_string(),
        };
        let report = Report::build(&article(&["A"]), Some(&m));
        let impact = report.impact.unwrap();
        assert_eq!(impact.value, "49.9");
        assert_eq!(impact.tier, Some(ImpactTier::High));
        assert_eq!(report.category.unwrap().quartile.as_deref(), Some("Q1"));
        assert!(report.in_index);
    }
}

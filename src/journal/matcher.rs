//! Reconciles a journal name against the journal index.
//!
//! Attempts run strongest first: exact key, normalized fuzzy key, then the
//! static publisher journal and subsidiary lists. The first hit wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::PublisherPattern;
use crate::journal::model::{JournalIndex, JournalInfo};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Publisher,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalMatch {
    pub info: JournalInfo,
    pub kind: MatchKind,
    /// Index key or publisher name the match came from.
    pub matched: String,
}

pub fn match_journal(
    name: &str,
    index: &JournalIndex,
    publishers: &[PublisherPattern],
) -> Option<JournalMatch> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let found = exact(name, index)
        .or_else(|| fuzzy(name, index))
        .or_else(|| from_publishers(name, publishers));
    match &found {
        Some(m) => debug!(journal = name, kind = ?m.kind, matched = %m.matched, "journal matched"),
        None => debug!(journal = name, "journal not in index"),
    }
    found
}

/// Lower-case, strip punctuation, collapse whitespace.
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let collapsed = WHITESPACE_RE.replace_all(&lowered, " ");
    let stripped = NON_WORD_RE.replace_all(&collapsed, "");
    WHITESPACE_RE.replace_all(stripped.trim(), " ").into_owned()
}

fn exact(name: &str, index: &JournalIndex) -> Option<JournalMatch> {
    [name.to_uppercase(), name.to_string()]
        .into_iter()
        .find_map(|key| {
            index.get(&key).map(|info| JournalMatch {
                info: info.clone(),
                kind: MatchKind::Exact,
                matched: key,
            })
        })
}

fn fuzzy(name: &str, index: &JournalIndex) -> Option<JournalMatch> {
    let query = normalize(name);
    if query.is_empty() {
        return None;
    }
    let lowered_name = name.to_lowercase();

    let candidates: Vec<(&String, &JournalInfo, String)> = index
        .iter()
        .map(|(key, info)| (key, info, normalize(key)))
        .filter(|(_, _, normalized)| !normalized.is_empty())
        .collect();

    // Equal normalized keys beat mere containment.
    let equal = candidates.iter().find(|(_, _, key)| *key == query);
    let contained = || {
        candidates.iter().find(|(_, info, key)| {
            key.contains(&query)
                || query.contains(key.as_str())
                || info
                    .abbr
                    .as_deref()
                    .map(|abbr| abbr.trim().to_lowercase())
                    .is_some_and(|abbr| !abbr.is_empty() && lowered_name.contains(&abbr))
        })
    };

    equal.or_else(contained).map(|(key, info, _)| JournalMatch {
        info: (*info).clone(),
        kind: MatchKind::Fuzzy,
        matched: (*key).clone(),
    })
}

fn from_publishers(name: &str, publishers: &[PublisherPattern]) -> Option<JournalMatch> {
    let query = normalize(name);
    publishers
        .iter()
        .find(|p| {
            p.journals
                .iter()
                .chain(&p.subsidiaries)
                .any(|j| normalize(j) == query)
        })
        .map(|p| JournalMatch {
            info: JournalInfo::known_high_impact(),
            kind: MatchKind::Publisher,
            matched: p.name.clone(),
        })
}

/// False when the journal's impact factor is known and below `threshold`.
/// Zero means "unknown" and never filters.
pub fn passes_impact_filter(info: &JournalInfo, threshold: f64) -> bool {
    match info.impact_factor_value() {
        Some(value) if value != 0.0 => value >= threshold,
        _ => true,
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Quality metadata for one journal, as published in the journal index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalInfo {
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub abbr: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    #[serde(
        rename = "if",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub impact_factor: Option<String>,
    #[serde(
        rename = "if5y",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub impact_factor_5y: Option<String>,
    /// `<subject>|<quartile>|<rank>`
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Set on entries synthesized for journals known from a publisher list
    /// but absent from the index.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub known_high_impact: bool,
}

/// Split form of `JournalInfo::category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub subject: String,
    pub quartile: Option<String>,
    pub rank: Option<String>,
}

impl JournalInfo {
    pub fn known_high_impact() -> Self {
        Self {
            known_high_impact: true,
            ..Self::default()
        }
    }

    /// Numeric impact factor, when the index has a parseable one.
    pub fn impact_factor_value(&self) -> Option<f64> {
        self.impact_factor.as_deref()?.trim().parse().ok()
    }

    pub fn category_parts(&self) -> Option<Category> {
        let raw = self.category.as_deref()?;
        let mut parts = raw.split('|').map(str::trim);
        let subject = parts.next().unwrap_or_default().to_string();
        let mut next_part = || parts.next().filter(|p| !p.is_empty()).map(str::to_string);
        let quartile = next_part();
        let rank = next_part();
        Some(Category {
            subject,
            quartile,
            rank,
        })
    }
}

/// Journal key (full name or abbreviation) to quality metadata.
///
/// Ordered so that fuzzy scans visit candidates deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalIndex {
    entries: BTreeMap<String, JournalInfo>,
}

impl JournalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, info: JournalInfo) {
        self.entries.insert(key.into(), info);
    }

    pub fn get(&self, key: &str) -> Option<&JournalInfo> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JournalInfo)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, JournalInfo)> for JournalIndex {
    fn from_iter<I: IntoIterator<Item = (String, JournalInfo)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Spreadsheet exports leave blanks and `nan`/`n/a` markers; those mean absent.
/// Numbers are accepted and kept in their textual form.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let text = match value {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Ok(None),
    };
    let lowered = text.to_ascii_lowercase();
    if text.is_empty() || matches!(lowered.as_str(), "nan" | "na" | "n/a") {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

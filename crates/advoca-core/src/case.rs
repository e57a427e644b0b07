//! Retrieved-case payloads and their client-local view state.

use serde::{Deserialize, Serialize};

/// One retrieved case as sent by the analysis endpoints.
///
/// Only `case_id` is guaranteed; the retrieval backends attach whatever
/// metadata the source corpus carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub final_score: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub text_sample: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub judges: Option<String>,
    #[serde(default)]
    pub parties: Option<String>,
    /// Comma-separated keyword list, as sent by the backend.
    #[serde(default)]
    pub keywords: Option<String>,
}

impl CaseResult {
    /// Relevance score; similar-case retrieval reports `score`, precedent
    /// retrieval reports `final_score`.
    pub fn relevance(&self) -> f64 {
        self.score.or(self.final_score).unwrap_or(0.0)
    }

    /// Keyword tags split on the wire delimiter, trimmed, empties dropped.
    pub fn keyword_tags(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One rendered result row.
///
/// `expanded` is client-local UI state: it never crosses the wire, toggling
/// it fetches nothing, and it resets to collapsed whenever a new result set
/// replaces this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub case: CaseResult,
    pub expanded: bool,
}

impl ResultItem {
    pub fn collapsed(case: CaseResult) -> Self {
        Self {
            case,
            expanded: false,
        }
    }
}

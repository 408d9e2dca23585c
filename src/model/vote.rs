use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, CandidateId, Category};

/// A single cast ballot: one selection per category.
///
/// Votes are immutable once written; they are only ever appended by the
/// voting flow or a CSV import, and bulk-cleared by a system reset.
/// A `None` selection is a null vote (blank or unrecognized candidate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub president: Option<CandidateId>,
    pub mayor: Option<CandidateId>,
    pub deputy: Option<CandidateId>,
}

impl Vote {
    /// A ballot from the interactive voting flow.
    pub fn new(
        president: Option<CandidateId>,
        mayor: Option<CandidateId>,
        deputy: Option<CandidateId>,
    ) -> Self {
        Self::with_prefix("v", president, mayor, deputy)
    }

    /// A ballot created by bulk CSV import.
    pub fn imported(
        president: Option<CandidateId>,
        mayor: Option<CandidateId>,
        deputy: Option<CandidateId>,
    ) -> Self {
        Self::with_prefix("csv", president, mayor, deputy)
    }

    fn with_prefix(
        prefix: &str,
        president: Option<CandidateId>,
        mayor: Option<CandidateId>,
        deputy: Option<CandidateId>,
    ) -> Self {
        Self {
            id: super::generate_id(prefix),
            timestamp: Utc::now(),
            president,
            mayor,
            deputy,
        }
    }

    /// The selection this ballot made for the given category.
    pub fn selection(&self, category: Category) -> Option<&CandidateId> {
        match category {
            Category::President => self.president.as_ref(),
            Category::Mayor => self.mayor.as_ref(),
            Category::Deputy => self.deputy.as_ref(),
        }
    }

    /// Normalize a raw selection field: blank or whitespace input, and ids
    /// matching no known candidate, become a null vote.
    pub fn normalize(raw: &str, candidates: &[Candidate]) -> Option<CandidateId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        candidates
            .iter()
            .any(|c| c.id == trimmed)
            .then(|| trimmed.to_string())
    }
}

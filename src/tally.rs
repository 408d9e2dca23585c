use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::candidate::{Candidate, CandidateId, Category};
use crate::model::vote::Vote;

/// Vote counts for one category: a zero-initialized bucket per known
/// candidate of that category, plus the reserved null bucket. Every
/// ballot lands in exactly one bucket, so the bucket sum equals the
/// ballot count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTally {
    pub counts: BTreeMap<CandidateId, u64>,
    pub null_votes: u64,
}

impl CategoryTally {
    fn add(&mut self, selection: Option<&CandidateId>) {
        match selection {
            // An id with no bucket belongs to a deleted or unknown
            // candidate and counts as null, same as a blank.
            Some(id) => match self.counts.get_mut(id) {
                Some(count) => *count += 1,
                None => self.null_votes += 1,
            },
            None => self.null_votes += 1,
        }
    }

    /// Total ballots counted into this category, null bucket included.
    pub fn total(&self) -> u64 {
        self.counts.values().sum::<u64>() + self.null_votes
    }

    /// All candidates holding the greatest non-null count, in id order.
    /// Empty iff no non-null votes were cast.
    pub fn leaders(&self) -> Vec<&CandidateId> {
        let best = match self.counts.values().copied().max() {
            Some(best) if best > 0 => best,
            _ => return Vec::new(),
        };
        self.counts
            .iter()
            .filter(|(_, &count)| count == best)
            .map(|(id, _)| id)
            .collect()
    }

    /// The winning candidate: greatest non-null count, ties broken by
    /// candidate-id order. `None` iff no non-null votes were cast.
    /// Callers that care about ties should inspect `leaders()`.
    pub fn winner(&self) -> Option<&CandidateId> {
        self.leaders().into_iter().next()
    }
}

/// A full tally across the three categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub president: CategoryTally,
    pub mayor: CategoryTally,
    pub deputy: CategoryTally,
}

impl Tally {
    /// Count every vote into per-category buckets.
    pub fn count(votes: &[Vote], candidates: &[Candidate]) -> Self {
        let mut tally = Self::default();

        // Zero-init a bucket per candidate, so candidates with no votes
        // still appear in the results.
        for candidate in candidates {
            tally
                .category_mut(candidate.category)
                .counts
                .insert(candidate.id.clone(), 0);
        }

        for vote in votes {
            for category in Category::ALL {
                tally.category_mut(category).add(vote.selection(category));
            }
        }

        tally
    }

    pub fn category(&self, category: Category) -> &CategoryTally {
        match category {
            Category::President => &self.president,
            Category::Mayor => &self.mayor,
            Category::Deputy => &self.deputy,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut CategoryTally {
        match category {
            Category::President => &mut self.president,
            Category::Mayor => &mut self.mayor,
            Category::Deputy => &mut self.deputy,
        }
    }

    /// Headline ballot count: every ballot lands in exactly one bucket
    /// per category, so any single category's total is the ballot count.
    pub fn total_votes(&self) -> u64 {
        self.president.total()
    }

    /// Per-candidate display rows for one category: candidate name and
    /// count in id order, with a null-votes row appended when non-zero.
    pub fn display_rows(&self, category: Category, candidates: &[Candidate]) -> Vec<(String, u64)> {
        let tally = self.category(category);
        let mut rows: Vec<(String, u64)> = tally
            .counts
            .iter()
            .map(|(id, &count)| {
                let name = candidates
                    .iter()
                    .find(|c| &c.id == id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| id.clone());
                (name, count)
            })
            .collect();
        if tally.null_votes > 0 {
            rows.push(("Votos Nulos".to_string(), tally.null_votes));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(president: &str, mayor: &str, deputy: &str) -> Vote {
        fn sel(raw: &str) -> Option<CandidateId> {
            (!raw.is_empty()).then(|| raw.to_string())
        }
        Vote::new(sel(president), sel(mayor), sel(deputy))
    }

    #[test]
    fn counts_sum_to_vote_count_per_category() {
        let candidates = Candidate::default_slate();
        let votes = vec![
            vote("p1", "m1", "d1"),
            vote("p1", "m2", ""),
            vote("", "", ""),
            vote("p2", "unknown", "d2"),
        ];
        let tally = Tally::count(&votes, &candidates);
        for category in Category::ALL {
            assert_eq!(
                tally.category(category).total(),
                votes.len() as u64,
                "bucket sum mismatch for {category}"
            );
        }
        assert_eq!(tally.total_votes(), 4);
    }

    #[test]
    fn unknown_and_blank_selections_land_in_null_bucket() {
        let candidates = Candidate::default_slate();
        let votes = vec![vote("", "unknown", "d1")];
        let tally = Tally::count(&votes, &candidates);
        assert_eq!(tally.president.null_votes, 1);
        assert_eq!(tally.mayor.null_votes, 1);
        assert_eq!(tally.deputy.null_votes, 0);
        assert_eq!(tally.deputy.counts["d1"], 1);
    }

    #[test]
    fn all_candidates_get_a_bucket_even_with_no_votes() {
        let candidates = Candidate::default_slate();
        let tally = Tally::count(&[], &candidates);
        assert_eq!(tally.president.counts.len(), 2);
        assert_eq!(tally.president.counts["p1"], 0);
        assert_eq!(tally.president.counts["p2"], 0);
    }

    #[test]
    fn winner_is_none_iff_no_non_null_votes() {
        let candidates = Candidate::default_slate();

        let tally = Tally::count(&[], &candidates);
        assert_eq!(tally.president.winner(), None);

        let votes = vec![vote("", "", "")];
        let tally = Tally::count(&votes, &candidates);
        assert_eq!(tally.president.winner(), None);

        let votes = vec![vote("p2", "", "")];
        let tally = Tally::count(&votes, &candidates);
        assert_eq!(tally.president.winner(), Some(&"p2".to_string()));
    }

    #[test]
    fn strict_leader_wins() {
        let candidates = Candidate::default_slate();
        let votes = vec![
            vote("p1", "m2", "d1"),
            vote("p1", "m2", "d2"),
            vote("p2", "m1", "d2"),
        ];
        let tally = Tally::count(&votes, &candidates);
        assert_eq!(tally.president.winner(), Some(&"p1".to_string()));
        assert_eq!(tally.mayor.winner(), Some(&"m2".to_string()));
        assert_eq!(tally.president.leaders(), vec!["p1"]);
    }

    #[test]
    fn ties_break_by_id_order_and_expose_all_leaders() {
        let candidates = Candidate::default_slate();
        let votes = vec![vote("p1", "", ""), vote("p2", "", "")];
        let tally = Tally::count(&votes, &candidates);
        assert_eq!(tally.president.leaders(), vec!["p1", "p2"]);
        assert_eq!(tally.president.winner(), Some(&"p1".to_string()));
    }

    #[test]
    fn display_rows_resolve_names_and_append_nulls() {
        let candidates = Candidate::default_slate();
        let votes = vec![vote("p1", "", ""), vote("", "", "")];
        let tally = Tally::count(&votes, &candidates);

        let rows = tally.display_rows(Category::President, &candidates);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ("María González".to_string(), 1));
        assert_eq!(rows[1], ("Carlos Ramírez".to_string(), 0));
        assert_eq!(rows[2], ("Votos Nulos".to_string(), 1));

        // No null row when the bucket is empty.
        let votes = vec![vote("p1", "m1", "d1")];
        let tally = Tally::count(&votes, &candidates);
        let rows = tally.display_rows(Category::Deputy, &candidates);
        assert_eq!(rows.len(), 2);
    }
}

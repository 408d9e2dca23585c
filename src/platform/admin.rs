use log::{info, warn};

use crate::error::{Error, Result};
use crate::import::{self, ImportSummary};
use crate::model::candidate::{Candidate, CandidateUpdate, NewCandidate};
use crate::model::status::VotingStatus;
use crate::store::KeyValue;

use super::Platform;

/// Administrative operations: candidate management, bulk import, and
/// voting-window control.
impl<S: KeyValue> Platform<S> {
    /// Register a new candidate. Name, party and proposals must be
    /// non-empty, as the admin form required.
    pub fn add_candidate(&self, new: NewCandidate) -> Result<Candidate> {
        validate_fields(&new.name, &new.party, &new.proposals)?;
        let mut candidates = self.candidates()?;
        let candidate = new.assign_id();
        info!(
            "Adding {} candidate {} ({})",
            candidate.category, candidate.id, candidate.name
        );
        candidates.push(candidate.clone());
        self.candidates_entry().write(&candidates)?;
        Ok(candidate)
    }

    /// Apply a partial edit to an existing candidate.
    pub fn update_candidate(&self, id: &str, update: CandidateUpdate) -> Result<Candidate> {
        let mut candidates = self.candidates()?;
        let candidate = candidates
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found(format!("Candidate with id '{id}'")))?;
        update.apply(candidate);
        validate_fields(&candidate.name, &candidate.party, &candidate.proposals)?;
        let updated = candidate.clone();
        info!("Updated candidate {id}");
        self.candidates_entry().write(&candidates)?;
        Ok(updated)
    }

    /// Remove a candidate. Existing votes for it are untouched; the
    /// tally will count them as null from now on.
    pub fn delete_candidate(&self, id: &str) -> Result<()> {
        let mut candidates = self.candidates()?;
        let before = candidates.len();
        candidates.retain(|c| c.id != id);
        if candidates.len() == before {
            return Err(Error::not_found(format!("Candidate with id '{id}'")));
        }
        info!("Deleted candidate {id}");
        self.candidates_entry().write(&candidates)?;
        Ok(())
    }

    /// Open the voting window.
    pub fn start_voting(&self) -> Result<VotingStatus> {
        let mut status = self.voting_status()?;
        status.start(self.window)?;
        self.status_entry().write(&status)?;
        info!(
            "Voting window opened, scheduled to close at {}",
            status.end_time.expect("active window has an end time")
        );
        Ok(status)
    }

    /// Close the voting window now, ahead of its scheduled end.
    pub fn end_voting(&self) -> Result<VotingStatus> {
        let mut status = self.voting_status()?;
        status.end()?;
        self.status_entry().write(&status)?;
        info!("Voting window closed by admin");
        Ok(status)
    }

    /// Discard all recorded votes and return the window to its
    /// `NotStarted` defaults. Candidates are kept.
    pub fn reset(&self) -> Result<VotingStatus> {
        let mut status = self.voting_status()?;
        status.reset()?;
        self.votes_entry().clear()?;
        self.status_entry().write(&status)?;
        warn!("System reset: all votes discarded");
        Ok(status)
    }

    /// Bulk-import votes from raw CSV text. Bad rows are counted and
    /// skipped rather than failing the import.
    pub fn import_votes(&self, csv_text: &str) -> Result<ImportSummary> {
        let candidates = self.candidates()?;
        let parsed = import::parse_votes(csv_text, &candidates);
        if !parsed.votes.is_empty() {
            let mut votes = self.votes()?;
            votes.extend(parsed.votes);
            self.votes_entry().write(&votes)?;
        }
        info!(
            "CSV import: {} votes imported, {} with null fields, {} rows dropped",
            parsed.summary.imported, parsed.summary.null_votes, parsed.summary.invalid_rows
        );
        Ok(parsed.summary)
    }
}

fn validate_fields(name: &str, party: &str, proposals: &str) -> Result<()> {
    if name.trim().is_empty() || party.trim().is_empty() || proposals.trim().is_empty() {
        return Err(Error::invalid_candidate(
            "name, party and proposals must all be filled in",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::candidate::Category;
    use crate::model::status::VotingState;
    use crate::store::MemoryStore;

    fn new_candidate(name: &str) -> NewCandidate {
        NewCandidate {
            name: name.to_string(),
            party: "Partido de Prueba".to_string(),
            proposals: "Propuestas de prueba.".to_string(),
            image_url: "/placeholder.svg".to_string(),
            category: Category::Deputy,
        }
    }

    #[test]
    fn add_update_delete_candidate() {
        let platform = Platform::new(MemoryStore::new());

        let added = platform.add_candidate(new_candidate("Pedro Pascal")).unwrap();
        assert!(added.id.starts_with('d'));
        assert_eq!(platform.candidates().unwrap().len(), 7);

        let updated = platform
            .update_candidate(
                &added.id,
                CandidateUpdate {
                    party: Some("Otro Partido".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.party, "Otro Partido");
        assert_eq!(updated.name, "Pedro Pascal");

        platform.delete_candidate(&added.id).unwrap();
        assert_eq!(platform.candidates().unwrap().len(), 6);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let platform = Platform::new(MemoryStore::new());

        let mut blank_name = new_candidate("");
        blank_name.name = "   ".to_string();
        assert!(matches!(
            platform.add_candidate(blank_name),
            Err(Error::InvalidCandidate(_))
        ));

        // An update may not blank out a required field either.
        let result = platform.update_candidate(
            "p1",
            CandidateUpdate {
                party: Some(String::new()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidCandidate(_))));
    }

    #[test]
    fn updating_or_deleting_missing_candidate_is_not_found() {
        let platform = Platform::new(MemoryStore::new());
        assert!(matches!(
            platform.update_candidate("zz", CandidateUpdate::default()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            platform.delete_candidate("zz"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn window_control_follows_the_state_machine() {
        let platform = Platform::new(MemoryStore::new());

        let status = platform.start_voting().unwrap();
        assert_eq!(status.state(), VotingState::Active);

        // A second start is rejected and the stored state is untouched.
        assert!(matches!(
            platform.start_voting(),
            Err(Error::InvalidTransition { .. })
        ));
        assert_eq!(
            platform.voting_status().unwrap().state(),
            VotingState::Active
        );

        let status = platform.end_voting().unwrap();
        assert!(!status.is_active);
        assert!(status.is_finished);
    }

    #[test]
    fn reset_clears_votes_and_status_but_keeps_candidates() {
        let platform = Platform::new(MemoryStore::new());
        platform.cast_vote(Some("p1"), Some("m1"), Some("d1")).unwrap();
        platform.start_voting().unwrap();
        platform.end_voting().unwrap();

        let status = platform.reset().unwrap();
        assert_eq!(status, VotingStatus::default());
        assert!(platform.votes().unwrap().is_empty());
        assert_eq!(platform.candidates().unwrap().len(), 6);
    }

    #[test]
    fn reset_requires_a_finished_window() {
        let platform = Platform::new(MemoryStore::new());
        platform.cast_vote(Some("p1"), None, None).unwrap();

        assert!(matches!(
            platform.reset(),
            Err(Error::InvalidTransition { state: VotingState::NotStarted, .. })
        ));
        // Votes survive the rejected reset.
        assert_eq!(platform.votes().unwrap().len(), 1);
    }

    #[test]
    fn import_appends_votes_and_reports_counts() {
        let platform = Platform::new(MemoryStore::new());
        platform.cast_vote(Some("p1"), Some("m1"), Some("d1")).unwrap();

        let summary = platform
            .import_votes("president_id,mayor_id,deputy_id\np1,m1,d1\n,,\nX,m2,d2\n")
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                null_votes: 1,
                invalid_rows: 1,
            }
        );

        let votes = platform.votes().unwrap();
        assert_eq!(votes.len(), 3);
        assert!(votes[0].id.starts_with('v'));
        assert!(votes[1].id.starts_with("csv"));
    }
}

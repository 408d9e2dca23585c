use chrono::{Duration, Utc};
use log::{info, warn};

use crate::error::Result;
use crate::model::candidate::{Candidate, Category};
use crate::model::status::{default_window, VotingStatus};
use crate::model::vote::Vote;
use crate::store::{Entry, KeyValue};
use crate::tally::Tally;

mod admin;
mod voter;

/// The operation surface the rendering layer calls into: candidate
/// management, vote recording, window control, and tallying, all backed
/// by an injected key-value store.
pub struct Platform<S> {
    store: S,
    window: Duration,
}

impl<S: KeyValue> Platform<S> {
    /// A platform with the default 24-hour voting window.
    pub fn new(store: S) -> Self {
        Self::with_window(store, default_window())
    }

    pub fn with_window(store: S, window: Duration) -> Self {
        Self { store, window }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn candidates_entry(&self) -> Entry<'_, S, Vec<Candidate>> {
        Entry::of(&self.store)
    }

    fn votes_entry(&self) -> Entry<'_, S, Vec<Vote>> {
        Entry::of(&self.store)
    }

    fn status_entry(&self) -> Entry<'_, S, VotingStatus> {
        Entry::of(&self.store)
    }

    /// The full candidate list, seeding the default slate the first time
    /// an empty store is read.
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        match self.candidates_entry().read()? {
            Some(candidates) => Ok(candidates),
            None => {
                let slate = Candidate::default_slate();
                info!("First run: seeding default slate of {} candidates", slate.len());
                self.candidates_entry().write(&slate)?;
                Ok(slate)
            }
        }
    }

    /// The candidates standing in one category.
    pub fn candidates_in(&self, category: Category) -> Result<Vec<Candidate>> {
        let mut candidates = self.candidates()?;
        candidates.retain(|c| c.category == category);
        Ok(candidates)
    }

    /// Every recorded vote, oldest first.
    pub fn votes(&self) -> Result<Vec<Vote>> {
        self.votes_entry().read_or_default()
    }

    /// The current window status. An `Active` window whose scheduled end
    /// has passed is finalized here and persisted, so every reader sees
    /// the same `Finished` state without anyone polling for it.
    pub fn voting_status(&self) -> Result<VotingStatus> {
        let mut status = self.status_entry().read_or_default()?;
        if status.finalize_if_expired(Utc::now()) {
            warn!("Voting window expired; finalizing");
            self.status_entry().write(&status)?;
        }
        Ok(status)
    }

    /// Tally every recorded vote against the current candidate list.
    pub fn tally(&self) -> Result<Tally> {
        Ok(Tally::count(&self.votes()?, &self.candidates()?))
    }
}

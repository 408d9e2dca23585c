use log::{info, warn};

use crate::error::Result;
use crate::model::candidate::{CandidateId, Category};
use crate::model::vote::Vote;
use crate::store::KeyValue;

use super::Platform;

/// Voter-facing operations.
impl<S: KeyValue> Platform<S> {
    /// Record a ballot. A `None` or unrecognized selection becomes a
    /// null vote; the store itself does not gate on the voting window,
    /// the front-end does.
    pub fn cast_vote(
        &self,
        president: Option<&str>,
        mayor: Option<&str>,
        deputy: Option<&str>,
    ) -> Result<Vote> {
        let candidates = self.candidates()?;

        let normalize = |category: Category, raw: Option<&str>| -> Option<CandidateId> {
            let raw = raw?;
            let selection = Vote::normalize(raw, &candidates);
            if selection.is_none() && !raw.trim().is_empty() {
                warn!("Unknown {category} candidate '{raw}', counting as null");
            }
            selection
        };

        let vote = Vote::new(
            normalize(Category::President, president),
            normalize(Category::Mayor, mayor),
            normalize(Category::Deputy, deputy),
        );

        let mut votes = self.votes()?;
        votes.push(vote.clone());
        self.votes_entry().write(&votes)?;
        info!("Recorded vote {}", vote.id);
        Ok(vote)
    }
}

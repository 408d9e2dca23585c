use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of the voting window unless configured otherwise.
pub fn default_window() -> Duration {
    Duration::hours(24)
}

/// Logical states of the voting window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingState {
    /// No window has been opened yet.
    NotStarted,
    /// Votes may be cast.
    Active,
    /// Closed, either by the admin or by wall-clock expiry.
    Finished,
}

impl Display for VotingState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            VotingState::NotStarted => "not started",
            VotingState::Active => "active",
            VotingState::Finished => "finished",
        };
        f.write_str(text)
    }
}

/// The single process-wide voting-window record, as persisted.
///
/// The two flags are stored rather than a state enum to keep the record
/// compatible with the persisted layout; `state()` derives the logical
/// state from them. Transitions are guarded methods that fail with a
/// typed error on invalid calls rather than trusting the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingStatus {
    pub is_active: bool,
    pub is_finished: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl VotingStatus {
    pub fn state(&self) -> VotingState {
        if self.is_active {
            VotingState::Active
        } else if self.is_finished {
            VotingState::Finished
        } else {
            VotingState::NotStarted
        }
    }

    /// Open the voting window for the given duration, starting now.
    /// Valid only from `NotStarted`.
    pub fn start(&mut self, window: Duration) -> Result<()> {
        match self.state() {
            VotingState::NotStarted => {
                let now = Utc::now();
                self.is_active = true;
                self.is_finished = false;
                self.start_time = Some(now);
                self.end_time = Some(now + window);
                Ok(())
            }
            state => Err(Error::invalid_transition("start voting", state)),
        }
    }

    /// Close the window now, overwriting the scheduled end time.
    /// Valid only from `Active`.
    pub fn end(&mut self) -> Result<()> {
        match self.state() {
            VotingState::Active => {
                self.is_active = false;
                self.is_finished = true;
                self.end_time = Some(Utc::now());
                Ok(())
            }
            state => Err(Error::invalid_transition("end voting", state)),
        }
    }

    /// Return the record to its `NotStarted` defaults.
    /// Valid only from `Finished`. Clearing the recorded votes is the
    /// platform's job; this record does not own them.
    pub fn reset(&mut self) -> Result<()> {
        match self.state() {
            VotingState::Finished => {
                *self = Self::default();
                Ok(())
            }
            state => Err(Error::invalid_transition("reset", state)),
        }
    }

    /// An `Active` window whose scheduled end has passed.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.state() == VotingState::Active
            && matches!(self.end_time, Some(end) if now > end)
    }

    /// Transition an expired `Active` window to `Finished`, keeping the
    /// scheduled end time. Returns whether a transition happened.
    pub fn finalize_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self.has_expired(now) {
            self.is_active = false;
            self.is_finished = true;
            true
        } else {
            false
        }
    }
}

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::model::{candidate::Candidate, status::VotingStatus, vote::Vote};

mod file;
mod memory;
mod watch;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use watch::{StoreEvent, WatchedStore};

/// A minimal key-value storage interface. Values are opaque strings
/// under independent keys; last writer wins per key, and nothing
/// coordinates concurrent writers.
pub trait KeyValue {
    /// The stored value, or `None` if the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// A type that lives under a fixed storage key, serialized as JSON.
pub trait Record: Serialize + DeserializeOwned {
    /// The key this record is stored under.
    const KEY: &'static str;
}

// Persisted entries. Three independent keys, no schema versioning.
const CANDIDATES: &str = "electoral_candidates";
impl Record for Vec<Candidate> {
    const KEY: &'static str = CANDIDATES;
}

const VOTES: &str = "electoral_votes";
impl Record for Vec<Vote> {
    const KEY: &'static str = VOTES;
}

const VOTING_STATUS: &str = "electoral_voting_status";
impl Record for VotingStatus {
    const KEY: &'static str = VOTING_STATUS;
}

/// Typed access to the storage entry a record type lives under.
pub struct Entry<'s, S, T> {
    store: &'s S,
    _record: PhantomData<T>,
}

impl<'s, S, T> Entry<'s, S, T>
where
    S: KeyValue,
    T: Record,
{
    /// Get a handle on this record's entry in the given store.
    pub fn of(store: &'s S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Read the entry. `None` means it has never been written; a stored
    /// value that fails to parse surfaces as `Error::Storage`.
    pub fn read(&self) -> Result<Option<T>> {
        match self.store.get(T::KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read the entry, falling back to the type's default when absent.
    pub fn read_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.read()?.unwrap_or_default())
    }

    pub fn write(&self, value: &T) -> Result<()> {
        self.store.set(T::KEY, &serde_json::to_string(value)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(T::KEY)
    }
}

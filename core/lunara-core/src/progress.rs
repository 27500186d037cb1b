//! Per-user persisted bookmark for the guided cycle-tracking flow.
//!
//! `CycleProgressStore` is a typed repository over the key-value seam: it
//! owns the encode/decode of step indices, cycle ids, and the completed flag
//! to and from their string-encoded storage form, so parsing failures show
//! up as a single decode-error kind instead of ad hoc per-call parsing.
//!
//! Every operation is scoped by a required `user_id`. Physical keys derive
//! deterministically from a fixed logical name plus the user id, so records
//! for distinct accounts never collide. No network dependency; storage
//! errors propagate to the caller untried.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{LunaraError, Result};
use crate::store::KeyValueStore;
use crate::types::CycleProgress;

const STEP_KEY: &str = "cycle_step";
const CYCLE_ID_KEY: &str = "cycle_id";
const COMPLETED_KEY: &str = "cycle_completed";

/// Typed repository for cycle-flow progress, generic over the storage seam.
pub struct CycleProgressStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CycleProgressStore<S> {
    pub fn new(store: S) -> Self {
        CycleProgressStore { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn key(logical: &str, user_id: &str) -> String {
        format!("{}_{}", logical, user_id)
    }

    /// Records the last completed step, and the server-assigned cycle id
    /// when one is provided. Omitting `cycle_id` leaves any previously
    /// stored id untouched: a step can be recorded before the backend has
    /// allocated the cycle record.
    pub fn set_progress(&mut self, user_id: &str, step: u32, cycle_id: Option<i64>) -> Result<()> {
        self.store
            .set(&Self::key(STEP_KEY, user_id), &step.to_string())?;
        if let Some(id) = cycle_id {
            self.store
                .set(&Self::key(CYCLE_ID_KEY, user_id), &id.to_string())?;
        }
        Ok(())
    }

    /// Reads the stored progress. Absent keys yield `None`, never zero;
    /// callers treat `None` as "no progress recorded", distinct from step 0.
    pub fn get_progress(&self, user_id: &str) -> Result<CycleProgress> {
        Ok(CycleProgress {
            step: self.read_decoded(STEP_KEY, user_id)?,
            cycle_id: self.read_decoded(CYCLE_ID_KEY, user_id)?,
        })
    }

    /// Sets the completed flag, independent of step and cycle id.
    pub fn set_completed(&mut self, user_id: &str, value: bool) -> Result<()> {
        self.store
            .set(&Self::key(COMPLETED_KEY, user_id), &value.to_string())
    }

    /// Reads the completed flag. Absence defaults to `false` rather than
    /// surfacing as `None`: unlike a step position, "completed" has a
    /// natural false default.
    pub fn get_completed(&self, user_id: &str) -> Result<bool> {
        Ok(self
            .read_decoded::<bool>(COMPLETED_KEY, user_id)?
            .unwrap_or(false))
    }

    /// Removes the step, cycle id, and completed keys for this user in one
    /// storage call. Atomicity is whatever the underlying store provides;
    /// other users' records are untouched either way.
    pub fn clear_progress(&mut self, user_id: &str) -> Result<()> {
        let keys = [
            Self::key(STEP_KEY, user_id),
            Self::key(CYCLE_ID_KEY, user_id),
            Self::key(COMPLETED_KEY, user_id),
        ];
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.store.multi_remove(&refs)
    }

    fn read_decoded<T>(&self, logical: &str, user_id: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let key = Self::key(logical, user_id);
        match self.store.get(&key)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| LunaraError::Decode {
                    key,
                    value: raw,
                    details: e.to_string(),
                }),
        }
    }
}

//! Collaborator seams: the set log and the profile/template service.
//!
//! Both traits take `&self` so a single store can back several engines and
//! be shared with whatever renders history.

mod memory;

pub use memory::MemoryStore;

use crate::errors::StoreError;
use crate::exercise::{ExerciseSpec, ProfileId, Routine, WorkingValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed set. Append-only: the engine never edits or deletes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub profile: ProfileId,
    pub exercise_name: String,
    pub value: WorkingValue,
    pub reached_failure: bool,
    pub timestamp: DateTime<Utc>,
    pub workout_type: String,
}

impl LogEntry {
    pub fn new(
        profile: ProfileId,
        exercise_name: impl Into<String>,
        value: WorkingValue,
        reached_failure: bool,
        workout_type: impl Into<String>,
    ) -> Self {
        LogEntry {
            profile,
            exercise_name: exercise_name.into(),
            value,
            reached_failure,
            timestamp: Utc::now(),
            workout_type: workout_type.into(),
        }
    }

    pub fn weight(&self) -> Option<f64> {
        self.value.weight()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub weight: f64,
}

/// Strictly heavier than anything logged before, and actually loaded.
pub fn is_new_record(prior_max: Option<f64>, weight: f64) -> bool {
    weight > 0.0 && prior_max.is_none_or(|max| weight > max)
}

pub trait LogStore: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<(), StoreError>;

    /// Heaviest weighted entry for `(profile, exercise_name)`.
    fn max_weight(&self, profile: ProfileId, exercise_name: &str)
    -> Result<Option<f64>, StoreError>;

    /// Newest first, optionally narrowed to one exercise.
    fn history(
        &self,
        profile: ProfileId,
        exercise_name: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LogEntry>, StoreError>;

    /// Per-exercise maximum weight, ordered by exercise name.
    fn personal_records(&self, profile: ProfileId) -> Result<Vec<PersonalRecord>, StoreError>;
}

pub trait ProfileService: Send + Sync {
    fn current_profile_exercises(&self, profile: ProfileId)
    -> Result<Vec<ExerciseSpec>, StoreError>;

    /// Remember `value` as the seed for the exercise's next set.
    fn update_last_weight(
        &self,
        profile: ProfileId,
        exercise_name: &str,
        value: WorkingValue,
    ) -> Result<(), StoreError>;

    /// Replace the profile's exercise list.
    fn save_routine(&self, profile: ProfileId, routine: &Routine) -> Result<(), StoreError>;
}

/// Give `profile` the stock routine if it has no exercises yet. Returns
/// whether anything was written.
pub fn seed_default_routine(
    profiles: &dyn ProfileService,
    profile: ProfileId,
) -> Result<bool, StoreError> {
    if !profiles.current_profile_exercises(profile)?.is_empty() {
        return Ok(false);
    }
    profiles.save_routine(profile, &Routine::full_body())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_requires_strictly_heavier() {
        assert!(!is_new_record(Some(150.0), 150.0));
        assert!(is_new_record(Some(150.0), 151.0));
        assert!(is_new_record(None, 5.0));
    }

    #[test]
    fn seeding_only_touches_empty_profiles() {
        let store = MemoryStore::new();
        assert!(seed_default_routine(&store, ProfileId(1)).unwrap());
        assert!(!seed_default_routine(&store, ProfileId(1)).unwrap());
        assert_eq!(store.current_profile_exercises(ProfileId(1)).unwrap().len(), 8);
    }

    #[test]
    fn unloaded_set_is_never_a_record() {
        assert!(!is_new_record(None, 0.0));
        assert!(!is_new_record(Some(-1.0), 0.0));
    }
}

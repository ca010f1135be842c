use super::{LogEntry, LogStore, PersonalRecord, ProfileService};
use crate::errors::StoreError;
use crate::exercise::{ExerciseSpec, ProfileId, Routine, WorkingValue};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    logs: Vec<LogEntry>,
    routines: HashMap<ProfileId, Vec<ExerciseSpec>>,
    fail_appends: bool,
    fail_loads: bool,
}

/// In-process log store and profile service. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routine(self, profile: ProfileId, routine: &Routine) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.routines.insert(profile, routine.exercises.clone());
        }
        self
    }

    /// Make every following `append` fail, as a full disk would.
    pub fn set_fail_appends(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_appends = fail;
        }
    }

    /// Make every following exercise-list read fail.
    pub fn set_fail_loads(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_loads = fail;
        }
    }

    /// All entries in commit order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner
            .lock()
            .map(|inner| inner.logs.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl LogStore for MemoryStore {
    fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.fail_appends {
            return Err(StoreError::Rejected(format!(
                "append of {} refused",
                entry.exercise_name
            )));
        }
        inner.logs.push(entry.clone());
        Ok(())
    }

    fn max_weight(
        &self,
        profile: ProfileId,
        exercise_name: &str,
    ) -> Result<Option<f64>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .logs
            .iter()
            .filter(|e| e.profile == profile && e.exercise_name == exercise_name)
            .filter_map(LogEntry::weight)
            .reduce(f64::max))
    }

    fn history(
        &self,
        profile: ProfileId,
        exercise_name: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .logs
            .iter()
            .rev()
            .filter(|e| e.profile == profile)
            .filter(|e| exercise_name.is_none_or(|name| e.exercise_name == name))
            .take(limit)
            .cloned()
            .collect())
    }

    fn personal_records(&self, profile: ProfileId) -> Result<Vec<PersonalRecord>, StoreError> {
        let inner = self.lock()?;
        let mut best: BTreeMap<&str, f64> = BTreeMap::new();
        for entry in inner.logs.iter().filter(|e| e.profile == profile) {
            if let Some(weight) = entry.weight() {
                best.entry(entry.exercise_name.as_str())
                    .and_modify(|w| *w = w.max(weight))
                    .or_insert(weight);
            }
        }
        Ok(best
            .into_iter()
            .map(|(name, weight)| PersonalRecord {
                exercise_name: name.to_string(),
                weight,
            })
            .collect())
    }
}

impl ProfileService for MemoryStore {
    fn current_profile_exercises(
        &self,
        profile: ProfileId,
    ) -> Result<Vec<ExerciseSpec>, StoreError> {
        let inner = self.lock()?;
        if inner.fail_loads {
            return Err(StoreError::Unavailable(format!("exercises for {profile}")));
        }
        Ok(inner.routines.get(&profile).cloned().unwrap_or_default())
    }

    fn update_last_weight(
        &self,
        profile: ProfileId,
        exercise_name: &str,
        value: WorkingValue,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let Some(exercises) = inner.routines.get_mut(&profile) else {
            debug!("{} has no routine, not storing {}", profile, exercise_name);
            return Ok(());
        };
        for spec in exercises.iter_mut().filter(|s| s.name == exercise_name) {
            spec.carry_forward(value);
        }
        Ok(())
    }

    fn save_routine(&self, profile: ProfileId, routine: &Routine) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.routines.insert(profile, routine.exercises.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(profile: u32, name: &str, weight: f64) -> LogEntry {
        LogEntry::new(
            ProfileId(profile),
            name,
            WorkingValue::Weighted(weight),
            true,
            "workout",
        )
    }

    #[test]
    fn max_weight_is_scoped_to_profile_and_exercise() {
        let store = MemoryStore::new();
        store.append(&entry(1, "Leg Press", 200.0)).unwrap();
        store.append(&entry(1, "Leg Press", 220.0)).unwrap();
        store.append(&entry(2, "Leg Press", 300.0)).unwrap();
        store.append(&entry(1, "Chest Press", 150.0)).unwrap();

        assert_eq!(store.max_weight(ProfileId(1), "Leg Press").unwrap(), Some(220.0));
        assert_eq!(store.max_weight(ProfileId(2), "Leg Press").unwrap(), Some(300.0));
        assert_eq!(store.max_weight(ProfileId(1), "Leg Curl").unwrap(), None);
    }

    #[test]
    fn bodyweight_entries_do_not_count_toward_max() {
        let store = MemoryStore::new();
        let dips = LogEntry::new(
            ProfileId(1),
            "Dips",
            WorkingValue::TimedBodyweight(60),
            true,
            "workout",
        );
        store.append(&dips).unwrap();
        assert_eq!(store.max_weight(ProfileId(1), "Dips").unwrap(), None);
        assert!(store.personal_records(ProfileId(1)).unwrap().is_empty());
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        for w in [100.0, 110.0, 120.0] {
            store.append(&entry(1, "Leg Press", w)).unwrap();
        }
        let recent = store.history(ProfileId(1), Some("Leg Press"), 2).unwrap();
        let weights: Vec<_> = recent.iter().filter_map(LogEntry::weight).collect();
        assert_eq!(weights, vec![120.0, 110.0]);
    }

    #[test]
    fn failing_appends_are_reported() {
        let store = MemoryStore::new();
        store.set_fail_appends(true);
        assert!(matches!(
            store.append(&entry(1, "Leg Press", 100.0)),
            Err(StoreError::Rejected(_))
        ));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn update_last_weight_seeds_next_set() {
        let store = MemoryStore::new().with_routine(ProfileId(1), &Routine::full_body());
        store
            .update_last_weight(ProfileId(1), "Chest Press", WorkingValue::Weighted(155.0))
            .unwrap();
        let exercises = store.current_profile_exercises(ProfileId(1)).unwrap();
        let press = exercises.iter().find(|e| e.name == "Chest Press").unwrap();
        assert_eq!(press.working_value(), WorkingValue::Weighted(155.0));
    }
}

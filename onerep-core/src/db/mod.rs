//! SQLite-backed log store and profile service.

pub mod models;
pub mod operations;
pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard};

use crate::db::models::{NewRoutineExercise, NewSetLog};
use crate::errors::StoreError;
use crate::exercise::{ExerciseSpec, ProfileId, Routine, WorkingValue};
use crate::store::{LogEntry, LogStore, PersonalRecord, ProfileService};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub struct SqliteStore {
    conn: Mutex<SqliteConnection>,
}

impl SqliteStore {
    /// Open (or create) the database at `database_url` and bring its schema
    /// up to date. `:memory:` gives a private throwaway database.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let mut conn = SqliteConnection::establish(database_url)?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        for version in &applied {
            info!("Applied migration {}", version);
        }
        debug!("Opened log store at {}", database_url);

        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn profile_key(profile: ProfileId) -> Result<i32, StoreError> {
    i32::try_from(profile.0).map_err(|_| StoreError::Rejected(format!("{profile} out of range")))
}

impl LogStore for SqliteStore {
    fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let row = NewSetLog::from_entry(profile_key(entry.profile)?, entry)?;
        let mut conn = self.conn()?;
        operations::insert_set_log(&mut conn, &row)?;
        Ok(())
    }

    fn max_weight(
        &self,
        profile: ProfileId,
        exercise_name: &str,
    ) -> Result<Option<f64>, StoreError> {
        let mut conn = self.conn()?;
        Ok(operations::max_weight(
            &mut conn,
            profile_key(profile)?,
            exercise_name,
        )?)
    }

    fn history(
        &self,
        profile: ProfileId,
        exercise_name: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = {
            let mut conn = self.conn()?;
            operations::recent_set_logs(&mut conn, profile_key(profile)?, exercise_name, limit)?
        };
        rows.into_iter().map(LogEntry::try_from).collect()
    }

    fn personal_records(&self, profile: ProfileId) -> Result<Vec<PersonalRecord>, StoreError> {
        let mut conn = self.conn()?;
        let rows = operations::max_weight_by_exercise(&mut conn, profile_key(profile)?)?;
        Ok(rows
            .into_iter()
            .filter_map(|(exercise_name, weight)| {
                weight.map(|weight| PersonalRecord {
                    exercise_name,
                    weight,
                })
            })
            .collect())
    }
}

impl ProfileService for SqliteStore {
    fn current_profile_exercises(
        &self,
        profile: ProfileId,
    ) -> Result<Vec<ExerciseSpec>, StoreError> {
        let rows = {
            let mut conn = self.conn()?;
            operations::routine_for_profile(&mut conn, profile_key(profile)?)?
        };
        rows.into_iter().map(ExerciseSpec::try_from).collect()
    }

    fn update_last_weight(
        &self,
        profile: ProfileId,
        exercise_name: &str,
        value: WorkingValue,
    ) -> Result<(), StoreError> {
        let key = profile_key(profile)?;
        let mut conn = self.conn()?;
        let updated = match value {
            WorkingValue::Weighted(w) => {
                operations::set_last_weight(&mut conn, key, exercise_name, w)?
            }
            WorkingValue::TimedBodyweight(s) => operations::set_last_duration(
                &mut conn,
                key,
                exercise_name,
                models::seconds_column(s)?,
            )?,
        };
        if updated == 0 {
            warn!("No routine entry {} for {} to carry {} into", exercise_name, profile, value);
        }
        Ok(())
    }

    fn save_routine(&self, profile: ProfileId, routine: &Routine) -> Result<(), StoreError> {
        let key = profile_key(profile)?;
        let rows = routine
            .exercises
            .iter()
            .enumerate()
            .map(|(position, spec)| {
                let position = i32::try_from(position)
                    .map_err(|_| StoreError::Rejected("routine too long".to_string()))?;
                NewRoutineExercise::from_spec(key, &routine.name, position, spec)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.conn()?;
        let inserted = operations::replace_routine(&mut conn, key, &rows)?;
        info!("Saved routine {} ({} exercises) for {}", routine.name, inserted, profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_apply_to_fresh_database() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.history(ProfileId(1), None, 10).unwrap().is_empty());
        assert!(
            store
                .current_profile_exercises(ProfileId(1))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn profile_ids_beyond_i32_are_rejected() {
        assert!(profile_key(ProfileId(u32::MAX)).is_err());
        assert_eq!(profile_key(ProfileId(2)).unwrap(), 2);
    }
}

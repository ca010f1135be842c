//! Turning a completed set into a log entry.
//!
//! Order per commit: personal-record lookup, append, carry the value
//! forward, mark logged, then hand the turn to the partner. Collaborator
//! failures are reported in the returned [`CommitReport`] and never undo
//! any of those steps.

use super::orchestrator::{ActiveSet, FinishedSet, SessionOrchestrator, Stage};
use crate::exercise::{ExerciseId, ExerciseStatus, ProfileId, WorkingValue};
use crate::store::{LogEntry, is_new_record};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitReport {
    pub entry: LogEntry,
    /// Heavier than anything this profile logged for the exercise before.
    pub personal_record: bool,
    /// First collaborator failure seen while committing, if any.
    pub store_error: Option<String>,
}

impl SessionOrchestrator {
    /// Log the completed set and go back to the exercise list.
    pub fn log_set_and_finish(&mut self, value: f64, reached_failure: bool) -> Option<CommitReport> {
        let active = self.completed_set()?.clone();
        let report = self.commit_active(&active, value, reached_failure)?;
        self.clock.cancel();
        self.stage = Stage::Idle;
        self.last_set = Some(FinishedSet {
            status: ExerciseStatus::Logged,
            ..FinishedSet::from(&active)
        });
        self.publish();
        Some(report)
    }

    /// Log the completed set and start resting before the next exercise.
    pub fn log_set_to_history(&mut self, value: f64, reached_failure: bool) -> Option<CommitReport> {
        let active = self.completed_set()?.clone();
        let report = self.commit_active(&active, value, reached_failure)?;
        self.last_set = Some(FinishedSet {
            status: ExerciseStatus::Logged,
            ..FinishedSet::from(&active)
        });
        self.enter_rest();
        self.publish();
        Some(report)
    }

    /// Log every completed-but-unlogged exercise of the current profile, in
    /// list order. Idle only. Does not pass the turn.
    pub fn log_all_completed(&mut self) -> Vec<CommitReport> {
        if !matches!(self.stage, Stage::Idle) {
            return Vec::new();
        }
        let profile = self.current_profile();
        let Some(session) = self.ensure_session(profile) else {
            return Vec::new();
        };
        let pending: Vec<_> = session
            .entries
            .iter()
            .filter(|e| e.status == ExerciseStatus::Completed)
            .map(|e| (e.spec.id, e.spec.working_value(), e.spec.reached_failure))
            .collect();

        let reports: Vec<_> = pending
            .into_iter()
            .filter_map(|(id, value, failure)| self.commit(profile, id, value, failure))
            .collect();
        if !reports.is_empty() {
            info!("Logged {} completed exercises for {}", reports.len(), profile);
            self.publish();
        }
        reports
    }

    /// Remember the value and failure flag of a set left completed but
    /// unlogged, so a later bulk log commits what was actually lifted.
    pub(crate) fn stash_unlogged(&mut self, active: &ActiveSet) {
        if let Some(entry) = self
            .ensure_session(active.profile)
            .and_then(|session| session.entry_mut(active.exercise))
        {
            entry.spec.carry_forward(active.working);
            entry.spec.reached_failure = active.reached_failure;
        }
    }

    fn commit_active(
        &mut self,
        active: &ActiveSet,
        value: f64,
        reached_failure: bool,
    ) -> Option<CommitReport> {
        let working = active.working.with_amount(value);
        let report = self.commit(active.profile, active.exercise, working, reached_failure)?;
        if let Some(partner) = self.partner.as_mut() {
            let next = partner.advance_turn();
            info!("Turn passes to {}", next);
        }
        Some(report)
    }

    fn commit(
        &mut self,
        profile: ProfileId,
        id: ExerciseId,
        value: WorkingValue,
        reached_failure: bool,
    ) -> Option<CommitReport> {
        let name = self.ensure_session(profile)?.entry(id)?.spec.name.clone();
        let mut store_error = None;

        let personal_record = match value.weight() {
            Some(weight) => match self.log_store.max_weight(profile, &name) {
                Ok(prior) => is_new_record(prior, weight),
                Err(e) => {
                    warn!("Record lookup for {} failed: {}", name, e);
                    store_error.get_or_insert(e.to_string());
                    false
                }
            },
            None => false,
        };

        let entry = LogEntry::new(profile, &name, value, reached_failure, &self.workout_type);
        if let Err(e) = self.log_store.append(&entry) {
            warn!("Failed to log {} for {}: {}", name, profile, e);
            store_error.get_or_insert(e.to_string());
        }
        if let Err(e) = self.profiles.update_last_weight(profile, &name, value) {
            warn!("Failed to carry {} forward for {}: {}", value, name, e);
            store_error.get_or_insert(e.to_string());
        }

        if let Some(session_entry) = self
            .ensure_session(profile)
            .and_then(|session| session.entry_mut(id))
        {
            session_entry.spec.carry_forward(value);
            session_entry.spec.reached_failure = reached_failure;
            session_entry.status = ExerciseStatus::Logged;
        }
        info!(
            "Logged {} {} for {}{}",
            name,
            value,
            profile,
            if personal_record { " (new record)" } else { "" }
        );

        Some(CommitReport {
            entry,
            personal_record,
            store_error,
        })
    }
}

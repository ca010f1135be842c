//! Rest between exercises, value adjustment and the end of a workout.

use super::orchestrator::{FinishedSet, SessionOrchestrator, Stage};
use crate::exercise::WorkingValue;
use crate::phase::{ClockStart, PhaseKind};
use log::{debug, info, warn};

impl SessionOrchestrator {
    /// Rest from `complete` without logging. The set stays completed but
    /// unlogged and the turn does not pass.
    pub fn start_rest(&mut self) -> bool {
        let Some(active) = self.completed_set().cloned() else {
            return false;
        };
        self.stash_unlogged(&active);
        self.last_set = Some(FinishedSet::from(&active));
        self.enter_rest();
        self.publish();
        true
    }

    /// Cut the rest short and move on to the next exercise.
    pub fn skip_rest(&mut self) -> bool {
        if !matches!(self.stage, Stage::Rest) {
            return false;
        }
        self.clock.cancel();
        self.finish_rest();
        self.publish();
        true
    }

    /// Change the working value by `delta`: the set being logged while in
    /// `complete`, or the upcoming exercise while resting.
    pub fn adjust_value(&mut self, delta: f64) -> bool {
        let Some(current) = self.adjustable_value() else {
            return false;
        };
        self.set_working_value(current.amount() + delta)
    }

    /// Replace the working value. During rest the change is written back
    /// to the next exercise so it seeds that exercise's first set.
    pub fn set_working_value(&mut self, amount: f64) -> bool {
        if let Some(active) = self.active_mut().filter(|a| a.sequencer.is_complete()) {
            active.working = active.working.with_amount(amount);
            debug!("Working value now {}", active.working);
            self.publish();
            return true;
        }
        if !matches!(self.stage, Stage::Rest) {
            return false;
        }

        let profile = self.current_profile();
        let Some(session) = self.ensure_session(profile) else {
            return false;
        };
        let Some(next_id) = session.next_pending_id() else {
            return false;
        };
        let Some(entry) = session.entry_mut(next_id) else {
            return false;
        };
        let value = entry.spec.working_value().with_amount(amount);
        entry.spec.carry_forward(value);
        let name = entry.spec.name.clone();

        if let Err(e) = self.profiles.update_last_weight(profile, &name, value) {
            warn!("Failed to store {} for upcoming {}: {}", value, name, e);
        }
        debug!("Upcoming {} for {} set to {}", name, profile, value);
        self.publish();
        true
    }

    /// Flag whether the set in `complete` went to failure.
    pub fn set_reached_failure(&mut self, reached_failure: bool) -> bool {
        let Some(active) = self.active_mut().filter(|a| a.sequencer.is_complete()) else {
            return false;
        };
        active.reached_failure = reached_failure;
        self.publish();
        true
    }

    /// End the workout: stop everything and clear every exercise back to
    /// not started. Carried weights and durations are kept.
    pub fn finish_workout(&mut self) {
        self.clock.cancel();
        self.stage = Stage::Idle;
        self.last_set = None;
        for session in self.sessions.values_mut() {
            session.reset();
        }
        if let Some(started) = self.workout_started_at.take() {
            info!("Workout finished after {}s", (chrono::Utc::now() - started).num_seconds());
        }
        self.finished = false;
        self.publish();
    }

    fn adjustable_value(&self) -> Option<WorkingValue> {
        if let Some(active) = self.completed_set() {
            return Some(active.working);
        }
        if !matches!(self.stage, Stage::Rest) {
            return None;
        }
        self.current_session()?
            .next_pending()
            .map(|e| e.spec.working_value())
    }

    pub(crate) fn enter_rest(&mut self) {
        self.stage = Stage::Rest;
        let duration = self.durations.snapshot().duration_for(PhaseKind::Rest);
        match self.clock.start(duration) {
            ClockStart::Running(_) => {
                info!("Resting {}s", duration);
                self.emit(self.dispatcher.on_enter(PhaseKind::Rest));
            }
            ClockStart::Expired => self.finish_rest(),
        }
    }

    /// Rest is over: start the current profile's next exercise, or end the
    /// session when nothing is left.
    pub(crate) fn finish_rest(&mut self) {
        self.stage = Stage::Idle;
        let profile = self.current_profile();
        match self.ensure_session(profile).and_then(|s| s.next_pending_id()) {
            Some(next) => {
                self.start_exercise(next);
            }
            None => {
                self.finished = true;
                self.emit(self.dispatcher.on_workout_complete());
                info!("Workout complete for {}", profile);
            }
        }
    }
}

//! Starting exercises and moving through their phases.

use super::orchestrator::{ActiveSet, FinishedSet, SessionOrchestrator, Stage};
use crate::exercise::{ExerciseId, ExerciseStatus};
use crate::phase::{ClockStart, ClockToken, PhaseKind, PhaseSequencer, TickOutcome};
use chrono::Utc;
use log::{debug, info, warn};

impl SessionOrchestrator {
    /// Begin `id` from the current profile's list at `prep`. Idle only.
    pub fn start_exercise(&mut self, id: ExerciseId) -> bool {
        if !matches!(self.stage, Stage::Idle) {
            debug!("start_exercise ignored outside idle");
            return false;
        }
        let profile = self.current_profile();
        let Some(session) = self.ensure_session(profile) else {
            return false;
        };
        let Some(index) = session.position(id) else {
            warn!("Exercise {} is not in the list for {}", id, profile);
            return false;
        };
        session.cursor = Some(index);
        let spec = &session.entries[index].spec;
        let active = ActiveSet {
            profile,
            exercise: id,
            sequencer: PhaseSequencer::for_exercise(spec),
            working: spec.working_value(),
            reached_failure: spec.reached_failure,
            status: ExerciseStatus::NotStarted,
        };
        info!("Starting {} for {} at {}", spec.name, profile, active.working);

        if self.workout_started_at.is_none() {
            self.workout_started_at = Some(Utc::now());
        }
        self.finished = false;
        self.last_set = None;
        self.stage = Stage::Exercise(active);
        self.begin_current_phase();
        self.publish();
        true
    }

    /// Pause or resume the running countdown.
    pub fn toggle_timer(&mut self) -> bool {
        if self.running_set().is_none() && !matches!(self.stage, Stage::Rest) {
            return false;
        }
        let toggled = self.clock.toggle();
        if toggled {
            debug!("Timer {}", if self.clock.is_running() { "resumed" } else { "paused" });
            self.publish();
        }
        toggled
    }

    /// Abandon the rest of this phase and start the next one at its full
    /// duration. Cues still due in the skipped phase never fire.
    pub fn skip_phase(&mut self) -> bool {
        let Some(active) = self.active_mut() else {
            return false;
        };
        let Some(next) = active.sequencer.advance() else {
            return false;
        };
        debug!("Skipped to {}", next.as_str());
        self.clock.cancel();
        self.begin_current_phase();
        self.publish();
        true
    }

    /// Jump straight to `complete`, e.g. failure came before the timer ran out.
    pub fn complete_exercise(&mut self) -> bool {
        let Some(active) = self.active_mut() else {
            return false;
        };
        if active.sequencer.is_complete() {
            return false;
        }
        active.sequencer.finish();
        self.clock.cancel();
        self.begin_current_phase();
        self.publish();
        true
    }

    /// Put the running phase (or rest) back to its full duration, paused.
    pub fn reset_phase(&mut self) -> bool {
        if self.running_set().is_none() && !matches!(self.stage, Stage::Rest) {
            return false;
        }
        let reset = self.clock.reset();
        if reset {
            self.publish();
        }
        reset
    }

    /// Abort whatever is running and go back to idle. An attempt that has not
    /// reached `complete` is discarded without changing its status.
    pub fn stop_timer(&mut self) -> bool {
        self.clock.cancel();
        let stage = std::mem::replace(&mut self.stage, Stage::Idle);
        let changed = !matches!(stage, Stage::Idle);
        if let Stage::Exercise(active) = stage {
            if active.sequencer.is_complete() {
                self.stash_unlogged(&active);
                self.last_set = Some(FinishedSet::from(&active));
            }
            info!("Stopped {} for {}", active.exercise, active.profile);
        }
        self.publish();
        changed
    }

    /// Drop the current attempt uncommitted and start `id` instead.
    pub fn switch_to_exercise(&mut self, id: ExerciseId) -> bool {
        let profile = self.current_profile();
        if self
            .ensure_session(profile)
            .and_then(|session| session.position(id))
            .is_none()
        {
            return false;
        }
        if self.active().is_some_and(|a| a.exercise == id && a.profile == profile) {
            return false;
        }
        self.stop_timer();
        self.start_exercise(id)
    }

    /// Mark an exercise done without running it. Never logs anything.
    pub fn skip_exercise(&mut self, id: ExerciseId) -> bool {
        let profile = self.current_profile();
        if self.active().is_some_and(|a| a.exercise == id && a.profile == profile) {
            return false;
        }
        let Some(entry) = self
            .ensure_session(profile)
            .and_then(|session| session.entry_mut(id))
        else {
            return false;
        };
        if entry.status.is_completed() {
            return false;
        }
        entry.status = ExerciseStatus::Completed;
        info!("Skipped {} for {}", entry.spec.name, profile);
        self.publish();
        true
    }

    /// Token the next tick must carry, if a countdown is live.
    pub fn clock_token(&self) -> Option<ClockToken> {
        self.clock.token()
    }

    /// Deliver one second to whatever countdown is live now.
    pub fn tick(&mut self) -> bool {
        match self.clock.token() {
            Some(token) => self.on_tick(token),
            None => false,
        }
    }

    /// Deliver one second to the countdown `token` was issued for. Ticks
    /// for a cancelled or finished countdown are dropped.
    pub fn on_tick(&mut self, token: ClockToken) -> bool {
        let Some(phase) = self.current_phase() else {
            return false;
        };
        match self.clock.tick(token) {
            TickOutcome::Stale => {
                warn!("Dropped stale tick during {}", phase.as_str());
                false
            }
            TickOutcome::Paused => false,
            TickOutcome::Ticked { remaining } => {
                let duration = self.clock.duration();
                let cue = if phase == PhaseKind::Rest {
                    let has_next = self
                        .current_session()
                        .is_some_and(|s| s.next_pending().is_some());
                    self.dispatcher.on_rest_tick(duration, remaining, has_next)
                } else {
                    self.dispatcher.on_tick(phase, duration, remaining)
                };
                if let Some(cue) = cue {
                    self.emit(cue);
                }
                self.publish();
                true
            }
            TickOutcome::Expired => {
                self.on_expired();
                self.publish();
                true
            }
        }
    }

    fn on_expired(&mut self) {
        if let Some(active) = self.active_mut() {
            active.sequencer.advance();
            self.begin_current_phase();
        } else if matches!(self.stage, Stage::Rest) {
            self.emit(self.dispatcher.on_rest_complete());
            self.finish_rest();
        }
    }

    /// Start the countdown for the sequencer's current phase. Zero-length
    /// phases expire on entry and are passed through without a cue.
    pub(crate) fn begin_current_phase(&mut self) {
        loop {
            let Some(active) = self.active() else {
                return;
            };
            let phase = active.sequencer.current();
            if phase == PhaseKind::Complete {
                let (profile, exercise) = (active.profile, active.exercise);
                if let Some(active) = self.active_mut() {
                    active.status = ExerciseStatus::Completed;
                }
                self.clock.cancel();
                self.set_status(profile, exercise, ExerciseStatus::Completed);
                self.emit(self.dispatcher.on_enter(PhaseKind::Complete));
                info!("{} complete for {}", exercise, profile);
                return;
            }

            let duration = self.durations.snapshot().duration_for(phase);
            match self.clock.start(duration) {
                ClockStart::Running(_) => {
                    debug!("Entered {} for {}s", phase.as_str(), duration);
                    self.emit(self.dispatcher.on_enter(phase));
                    return;
                }
                ClockStart::Expired => {
                    debug!("{} has no duration, passing through", phase.as_str());
                    if let Some(active) = self.active_mut() {
                        active.sequencer.advance();
                    }
                }
            }
        }
    }
}

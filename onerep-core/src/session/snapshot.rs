use super::orchestrator::{SessionOrchestrator, Stage};
use super::workout::SessionEntry;
use crate::exercise::{ExerciseSpec, ExerciseStatus, ProfileId, WorkingValue};
use crate::partner::PartnerContext;
use crate::phase::PhaseKind;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    #[default]
    Idle,
    Exercise,
    Rest,
}

/// Timer state for a watch face or lock-screen widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MirrorState {
    pub phase: Option<PhaseKind>,
    pub time_remaining: u32,
    pub phase_duration: u32,
    pub running: bool,
}

/// Everything a presentation layer needs to draw the session.
///
/// `current_exercise` is the live run, or while resting and back in idle
/// the run that reached `complete` last.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionSnapshot {
    pub stage: StageKind,
    pub phase: Option<PhaseKind>,
    pub time_remaining: u32,
    pub phase_duration: u32,
    pub running: bool,
    pub profile: ProfileId,
    pub current_exercise: Option<ExerciseSpec>,
    pub working_value: Option<WorkingValue>,
    pub reached_failure: bool,
    /// Progress of the run in `current_exercise`, not of the exercise's
    /// list entry: a re-run of a logged exercise starts at `NotStarted`.
    pub status: Option<ExerciseStatus>,
    pub next_exercise: Option<ExerciseSpec>,
    pub partner: Option<PartnerContext>,
    pub exercises: Vec<SessionEntry>,
    pub workout_elapsed_seconds: Option<u64>,
    pub workout_finished: bool,
}

impl SessionSnapshot {
    pub fn is_completed(&self) -> bool {
        self.status.is_some_and(|s| s.is_completed())
    }

    pub fn is_logged(&self) -> bool {
        self.status.is_some_and(|s| s.is_logged())
    }

    pub fn mirror(&self) -> MirrorState {
        MirrorState {
            phase: self.phase,
            time_remaining: self.time_remaining,
            phase_duration: self.phase_duration,
            running: self.running,
        }
    }
}

impl SessionOrchestrator {
    pub fn snapshot(&self) -> SessionSnapshot {
        let profile = self.current_profile();
        let session = self.sessions.get(&profile);
        let stage = match &self.stage {
            Stage::Idle => StageKind::Idle,
            Stage::Exercise(_) => StageKind::Exercise,
            Stage::Rest => StageKind::Rest,
        };

        let active = self.active();
        // The live run, or failing that the run that just finished.
        let run = active
            .map(|a| (a.profile, a.exercise, a.status))
            .or_else(|| self.last_set.map(|l| (l.profile, l.exercise, l.status)));
        let current_entry = run.and_then(|(profile, exercise, _)| {
            self.sessions
                .get(&profile)
                .and_then(|s| s.entry(exercise))
        });

        SessionSnapshot {
            stage,
            phase: self.current_phase(),
            time_remaining: self.clock.remaining(),
            phase_duration: self.clock.duration(),
            running: self.clock.is_running(),
            profile,
            current_exercise: current_entry.map(|e| e.spec.clone()),
            working_value: active.map(|a| a.working),
            reached_failure: active.is_some_and(|a| a.reached_failure),
            status: current_entry.and(run).map(|(_, _, status)| status),
            next_exercise: session
                .and_then(|s| s.next_pending())
                .map(|e| e.spec.clone()),
            partner: self.partner.as_ref().map(|p| p.context()),
            exercises: session.map(|s| s.entries.clone()).unwrap_or_default(),
            workout_elapsed_seconds: self
                .workout_started_at
                .map(|t| u64::try_from((Utc::now() - t).num_seconds()).unwrap_or(0)),
            workout_finished: self.finished,
        }
    }
}

use super::snapshot::SessionSnapshot;
use super::workout::WorkoutSession;
use crate::config::DurationSettings;
use crate::cues::{Cue, CueConfig, CueDispatcher, CueSink};
use crate::exercise::{ExerciseId, ExerciseStatus, ProfileId, WorkingValue};
use crate::partner::PartnerTurnCoordinator;
use crate::phase::{PhaseClock, PhaseKind, PhaseSequencer};
use crate::store::{LogStore, ProfileService};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Everything the engine talks to but does not own.
pub struct Collaborators {
    pub log_store: Arc<dyn LogStore>,
    pub profiles: Arc<dyn ProfileService>,
    pub cue_sink: Box<dyn CueSink>,
}

/// The one exercise attempt with a live sequencer.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSet {
    pub(crate) profile: ProfileId,
    pub(crate) exercise: ExerciseId,
    pub(crate) sequencer: PhaseSequencer,
    pub(crate) working: WorkingValue,
    pub(crate) reached_failure: bool,
    /// Progress of this run, independent of earlier runs of the exercise.
    pub(crate) status: ExerciseStatus,
}

/// The run that most recently left the Exercise stage at or after
/// `complete`. Reported while resting and back in idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FinishedSet {
    pub(crate) profile: ProfileId,
    pub(crate) exercise: ExerciseId,
    pub(crate) status: ExerciseStatus,
}

impl From<&ActiveSet> for FinishedSet {
    fn from(active: &ActiveSet) -> Self {
        FinishedSet {
            profile: active.profile,
            exercise: active.exercise,
            status: active.status,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Stage {
    Idle,
    Exercise(ActiveSet),
    Rest,
}

/// Top-level controller for a workout.
///
/// Synchronous and single-owner: every operation takes `&mut self`, so a
/// host that shares the engine between a timer and a UI wraps it in one
/// mutex and no two actions can interleave. Operations that are not valid
/// in the current state do nothing and return `false` (or `None`).
pub struct SessionOrchestrator {
    pub(crate) durations: DurationSettings,
    pub(crate) dispatcher: CueDispatcher,
    pub(crate) log_store: Arc<dyn LogStore>,
    pub(crate) profiles: Arc<dyn ProfileService>,
    pub(crate) cue_sink: Box<dyn CueSink>,
    pub(crate) sessions: BTreeMap<ProfileId, WorkoutSession>,
    pub(crate) solo_profile: ProfileId,
    pub(crate) partner: Option<PartnerTurnCoordinator>,
    pub(crate) clock: PhaseClock,
    pub(crate) stage: Stage,
    pub(crate) last_set: Option<FinishedSet>,
    pub(crate) workout_type: String,
    pub(crate) workout_started_at: Option<DateTime<Utc>>,
    pub(crate) finished: bool,
    pub(crate) snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SessionOrchestrator {
    /// Create an idle engine for `profile`.
    pub fn new(profile: ProfileId, durations: DurationSettings, collaborators: Collaborators) -> Self {
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        let mut engine = SessionOrchestrator {
            durations,
            dispatcher: CueDispatcher::default(),
            log_store: collaborators.log_store,
            profiles: collaborators.profiles,
            cue_sink: collaborators.cue_sink,
            sessions: BTreeMap::new(),
            solo_profile: profile,
            partner: None,
            clock: PhaseClock::new(),
            stage: Stage::Idle,
            last_set: None,
            workout_type: "workout".to_string(),
            workout_started_at: None,
            finished: false,
            snapshot_tx,
        };
        engine.ensure_session(profile);
        engine.publish();
        engine
    }

    pub fn with_dispatcher(mut self, dispatcher: CueDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_workout_type(mut self, workout_type: impl Into<String>) -> Self {
        self.workout_type = workout_type.into();
        self
    }

    /// Shared handle to the durations; edits apply from the next phase entry.
    pub fn durations(&self) -> &DurationSettings {
        &self.durations
    }

    pub fn set_cue_config(&mut self, config: CueConfig) {
        self.dispatcher.set_config(config);
    }

    /// Profile every operation is scoped to right now.
    pub fn current_profile(&self) -> ProfileId {
        self.partner
            .as_ref()
            .map_or(self.solo_profile, PartnerTurnCoordinator::current_profile)
    }

    /// Exercise list and statuses for `profile`, if it has been loaded.
    pub fn session(&self, profile: ProfileId) -> Option<&WorkoutSession> {
        self.sessions.get(&profile)
    }

    pub fn current_session(&self) -> Option<&WorkoutSession> {
        self.sessions.get(&self.current_profile())
    }

    /// Drop the cached list for `profile` and read it again from the
    /// profile service. Only while nothing is running.
    pub fn reload_profile(&mut self, profile: ProfileId) -> bool {
        if !matches!(self.stage, Stage::Idle) {
            return false;
        }
        self.sessions.remove(&profile);
        if self.last_set.is_some_and(|last| last.profile == profile) {
            self.last_set = None;
        }
        let loaded = self.ensure_session(profile).is_some();
        self.publish();
        loaded
    }

    /// Watch channel that receives a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Exercise list for `profile`, loading it on first use. A failed load
    /// is not cached, so the next call asks the profile service again.
    pub(crate) fn ensure_session(&mut self, profile: ProfileId) -> Option<&mut WorkoutSession> {
        if !self.sessions.contains_key(&profile) {
            let exercises = match self.profiles.current_profile_exercises(profile) {
                Ok(exercises) => exercises,
                Err(e) => {
                    warn!("Failed to load exercises for {}: {}", profile, e);
                    return None;
                }
            };
            debug!("Loaded {} exercises for {}", exercises.len(), profile);
            self.sessions.insert(profile, WorkoutSession::new(profile, exercises));
        }
        self.sessions.get_mut(&profile)
    }

    pub(crate) fn set_status(&mut self, profile: ProfileId, id: ExerciseId, status: ExerciseStatus) {
        if let Some(entry) = self
            .ensure_session(profile)
            .and_then(|session| session.entry_mut(id))
        {
            entry.status = status;
        }
    }

    pub(crate) fn current_phase(&self) -> Option<PhaseKind> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Exercise(active) => Some(active.sequencer.current()),
            Stage::Rest => Some(PhaseKind::Rest),
        }
    }

    pub(crate) fn active(&self) -> Option<&ActiveSet> {
        match &self.stage {
            Stage::Exercise(active) => Some(active),
            _ => None,
        }
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveSet> {
        match &mut self.stage {
            Stage::Exercise(active) => Some(active),
            _ => None,
        }
    }

    /// Active set sitting in `complete`, waiting to be logged or rested.
    pub(crate) fn completed_set(&self) -> Option<&ActiveSet> {
        self.active().filter(|a| a.sequencer.is_complete())
    }

    /// Active set still counting down through its phases.
    pub(crate) fn running_set(&self) -> Option<&ActiveSet> {
        self.active().filter(|a| !a.sequencer.is_complete())
    }

    pub(crate) fn emit(&self, cue: Cue) {
        if let Err(e) = self.cue_sink.dispatch(cue) {
            warn!("Cue {} dropped: {}", cue, e);
        }
    }

    pub(crate) fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

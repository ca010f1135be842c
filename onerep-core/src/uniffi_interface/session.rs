use crate::config::{DurationSettings, PhaseDurations};
use crate::cues::{CueConfig, RecordingCueSink};
use crate::db::SqliteStore;
use crate::exercise::{ExerciseId, ProfileId};
use crate::phase::PhaseKind;
use crate::session::{Collaborators, SessionOrchestrator};
use crate::store::{LogStore, seed_default_routine};
use crate::uniffi_interface::errors::OneRepError;
use crate::uniffi_interface::objects::{
    CommitRecord, CueRecord, DurationsRecord, LogRecord, MirrorRecord, RecordRecord,
    SnapshotRecord,
};
use log::*;
use std::sync::{Arc, Mutex, MutexGuard};

/// Foreign handle on one workout engine. The host calls `tick` once a
/// second and polls `drain_cues` to play audio.
#[derive(uniffi::Object)]
pub struct WorkoutEngine {
    engine: Mutex<SessionOrchestrator>,
    store: Arc<SqliteStore>,
    cues: RecordingCueSink,
    durations: DurationSettings,
}

impl WorkoutEngine {
    fn engine(&self) -> MutexGuard<'_, SessionOrchestrator> {
        match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn parse_exercise_id(id: &str) -> Option<ExerciseId> {
    let parsed = ExerciseId::parse(id);
    if parsed.is_none() {
        warn!("Ignoring malformed exercise id {}", id);
    }
    parsed
}

#[uniffi::export]
impl WorkoutEngine {
    #[uniffi::constructor]
    pub fn new(
        database_path: String,
        profile: u32,
        durations: DurationsRecord,
    ) -> Result<Arc<Self>, OneRepError> {
        let store = Arc::new(SqliteStore::open(&database_path)?);
        let profile = ProfileId(profile);
        if seed_default_routine(store.as_ref(), profile)? {
            info!("Seeded default routine for {}", profile);
        }

        let cues = RecordingCueSink::new();
        let durations = DurationSettings::new(durations.into());
        let engine = SessionOrchestrator::new(
            profile,
            durations.clone(),
            Collaborators {
                log_store: store.clone(),
                profiles: store.clone(),
                cue_sink: Box::new(cues.clone()),
            },
        );
        Ok(Arc::new(WorkoutEngine {
            engine: Mutex::new(engine),
            store,
            cues,
            durations,
        }))
    }

    pub fn snapshot(&self) -> SnapshotRecord {
        SnapshotRecord::from(&self.engine().snapshot())
    }

    pub fn mirror(&self) -> MirrorRecord {
        self.engine().snapshot().mirror().into()
    }

    /// Cues dispatched since the last call, oldest first.
    pub fn drain_cues(&self) -> Vec<CueRecord> {
        self.cues.drain().into_iter().map(CueRecord::from).collect()
    }

    pub fn tick(&self) -> bool {
        self.engine().tick()
    }

    pub fn start_exercise(&self, exercise_id: String) -> bool {
        let Some(id) = parse_exercise_id(&exercise_id) else {
            return false;
        };
        self.engine().start_exercise(id)
    }

    pub fn switch_to_exercise(&self, exercise_id: String) -> bool {
        let Some(id) = parse_exercise_id(&exercise_id) else {
            return false;
        };
        self.engine().switch_to_exercise(id)
    }

    pub fn skip_exercise(&self, exercise_id: String) -> bool {
        let Some(id) = parse_exercise_id(&exercise_id) else {
            return false;
        };
        self.engine().skip_exercise(id)
    }

    pub fn toggle_timer(&self) -> bool {
        self.engine().toggle_timer()
    }

    pub fn skip_phase(&self) -> bool {
        self.engine().skip_phase()
    }

    pub fn complete_exercise(&self) -> bool {
        self.engine().complete_exercise()
    }

    pub fn reset_phase(&self) -> bool {
        self.engine().reset_phase()
    }

    pub fn stop_timer(&self) -> bool {
        self.engine().stop_timer()
    }

    pub fn log_set_and_finish(&self, value: f64, reached_failure: bool) -> Option<CommitRecord> {
        self.engine()
            .log_set_and_finish(value, reached_failure)
            .map(CommitRecord::from)
    }

    pub fn log_set_to_history(&self, value: f64, reached_failure: bool) -> Option<CommitRecord> {
        self.engine()
            .log_set_to_history(value, reached_failure)
            .map(CommitRecord::from)
    }

    pub fn log_all_completed(&self) -> Vec<CommitRecord> {
        self.engine()
            .log_all_completed()
            .into_iter()
            .map(CommitRecord::from)
            .collect()
    }

    pub fn start_rest(&self) -> bool {
        self.engine().start_rest()
    }

    pub fn skip_rest(&self) -> bool {
        self.engine().skip_rest()
    }

    pub fn adjust_value(&self, delta: f64) -> bool {
        self.engine().adjust_value(delta)
    }

    pub fn set_working_value(&self, value: f64) -> bool {
        self.engine().set_working_value(value)
    }

    pub fn set_reached_failure(&self, reached_failure: bool) -> bool {
        self.engine().set_reached_failure(reached_failure)
    }

    pub fn finish_workout(&self) {
        self.engine().finish_workout();
    }

    pub fn start_partner_mode(&self, profile1: u32, profile2: u32) -> Result<bool, OneRepError> {
        for profile in [ProfileId(profile1), ProfileId(profile2)] {
            seed_default_routine(self.store.as_ref(), profile)?;
        }
        Ok(self
            .engine()
            .start_partner_mode(ProfileId(profile1), ProfileId(profile2)))
    }

    pub fn switch_partner(&self) -> bool {
        self.engine().switch_partner()
    }

    pub fn end_partner_mode(&self) -> bool {
        self.engine().end_partner_mode()
    }

    /// Re-read a profile's exercise list after the host edited its routine.
    pub fn reload_profile(&self, profile: u32) -> bool {
        self.engine().reload_profile(ProfileId(profile))
    }

    pub fn set_cue_options(&self, halfway: bool, warning_seconds: Vec<u32>, encouragement_chance: f64) {
        self.engine().set_cue_config(CueConfig {
            halfway,
            warning_seconds,
            encouragement_chance,
        });
    }

    pub fn durations(&self) -> DurationsRecord {
        self.durations.snapshot().into()
    }

    pub fn set_durations(&self, durations: DurationsRecord) -> DurationsRecord {
        self.durations.replace(PhaseDurations::from(durations));
        self.durations.snapshot().into()
    }

    /// Set one phase's duration by name; returns the clamped value stored.
    pub fn set_phase_duration(&self, phase: String, seconds: u32) -> Result<u32, OneRepError> {
        let kind: PhaseKind = phase.parse()?;
        self.durations
            .set(kind, seconds)
            .ok_or_else(|| OneRepError::from("phase has no configurable duration"))
    }

    pub fn history(&self, exercise_name: Option<String>, limit: u32) -> Result<Vec<LogRecord>, OneRepError> {
        let profile = self.engine().current_profile();
        let entries = self
            .store
            .history(profile, exercise_name.as_deref(), limit as usize)?;
        Ok(entries.iter().map(LogRecord::from).collect())
    }

    pub fn personal_records(&self) -> Result<Vec<RecordRecord>, OneRepError> {
        let profile = self.engine().current_profile();
        let records = self.store.personal_records(profile)?;
        Ok(records.into_iter().map(RecordRecord::from).collect())
    }
}

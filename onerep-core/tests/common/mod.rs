//! Shared harness for driving a `SessionOrchestrator` against the in-memory
//! collaborators with deterministic cue selection.

#![allow(dead_code)]

use std::sync::Arc;

use onerep::config::{DurationSettings, PhaseDurations};
use onerep::cues::{Cue, CueConfig, CueDispatcher, RecordingCueSink};
use onerep::exercise::{ExerciseId, ExerciseSpec, ProfileId, Routine};
use onerep::phase::PhaseKind;
use onerep::session::{Collaborators, SessionOrchestrator};
use onerep::store::MemoryStore;

/// Upper bound on ticks for any single exercise at the longest durations.
pub const MAX_TICKS: usize = 400;

pub struct Harness {
    pub engine: SessionOrchestrator,
    pub store: MemoryStore,
    pub cues: RecordingCueSink,
    pub durations: DurationSettings,
}

impl Harness {
    /// Solo profile 1 with `routine` and default durations.
    pub fn new(routine: Routine) -> Self {
        Self::with_profiles(&[(ProfileId(1), routine)], PhaseDurations::default())
    }

    pub fn with_durations(routine: Routine, durations: PhaseDurations) -> Self {
        Self::with_profiles(&[(ProfileId(1), routine)], durations)
    }

    /// The engine starts on the first listed profile.
    pub fn with_profiles(profiles: &[(ProfileId, Routine)], durations: PhaseDurations) -> Self {
        let store = profiles
            .iter()
            .fold(MemoryStore::new(), |store, (profile, routine)| {
                store.with_routine(*profile, routine)
            });
        let cues = RecordingCueSink::new();
        let durations = DurationSettings::new(durations);
        let config = CueConfig {
            encouragement_chance: 0.0,
            ..CueConfig::default()
        };
        let engine = SessionOrchestrator::new(
            profiles[0].0,
            durations.clone(),
            Collaborators {
                log_store: Arc::new(store.clone()),
                profiles: Arc::new(store.clone()),
                cue_sink: Box::new(cues.clone()),
            },
        )
        .with_dispatcher(CueDispatcher::seeded(config, 7));

        Harness {
            engine,
            store,
            cues,
            durations,
        }
    }

    /// Id of `name` in the current profile's list.
    pub fn id(&self, name: &str) -> ExerciseId {
        self.engine
            .current_session()
            .and_then(|s| s.entries.iter().find(|e| e.spec.name == name))
            .map(|e| e.spec.id)
            .unwrap_or_else(|| panic!("{name} not in the current list"))
    }

    pub fn start(&mut self, name: &str) {
        let id = self.id(name);
        assert!(self.engine.start_exercise(id), "could not start {name}");
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.engine.tick();
        }
    }

    /// Tick until the active exercise reaches `complete`. Returns the ticks used.
    pub fn run_to_complete(&mut self) -> usize {
        for used in 0..MAX_TICKS {
            if self.phase() == Some(PhaseKind::Complete) {
                return used;
            }
            self.engine.tick();
        }
        panic!("exercise never reached complete");
    }

    pub fn phase(&self) -> Option<PhaseKind> {
        self.engine.snapshot().phase
    }

    pub fn remaining(&self) -> u32 {
        self.engine.snapshot().time_remaining
    }

    pub fn cue_keys(&self) -> Vec<&'static str> {
        self.cues.drain().into_iter().map(|c: Cue| c.key).collect()
    }
}

pub fn routine(exercises: Vec<ExerciseSpec>) -> Routine {
    Routine {
        name: "Test".to_string(),
        exercises,
    }
}

/// Stock routine with Chest Press carrying 150 lbs.
pub fn full_body_with_press() -> Routine {
    let mut routine = Routine::full_body();
    for spec in routine.exercises.iter_mut().filter(|s| s.name == "Chest Press") {
        spec.kind = onerep::exercise::ExerciseKind::Weighted {
            last_weight: Some(150.0),
        };
    }
    routine
}

pub fn three_machines() -> Routine {
    routine(vec![
        ExerciseSpec::weighted("Leg Press", Some(200.0)),
        ExerciseSpec::weighted("Pulldown", Some(120.0)),
        ExerciseSpec::weighted("Chest Press", Some(150.0)),
    ])
}

/// Durations with prep and positioning skipped so a set starts under load.
pub fn straight_to_load() -> PhaseDurations {
    PhaseDurations {
        prep: 0,
        positioning: 0,
        ..PhaseDurations::default()
    }
}

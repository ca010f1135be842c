//! Phase durations and the settings file.
//!
//! Durations are clamped when they are written, never when a phase starts, so
//! the engine only ever sees in-range values.

use crate::cues::CueConfig;
use crate::errors::ConfigError;
use crate::phase::PhaseKind;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub prep: u32,
    pub positioning: u32,
    pub eccentric: u32,
    pub concentric: u32,
    pub final_eccentric: u32,
    pub rest: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        PhaseDurations {
            prep: 10,
            positioning: 5,
            eccentric: 30,
            concentric: 20,
            final_eccentric: 40,
            rest: 90,
        }
    }
}

impl PhaseDurations {
    /// Allowed seconds for a timed phase. `Complete` has no countdown.
    pub fn bounds(phase: PhaseKind) -> Option<RangeInclusive<u32>> {
        match phase {
            PhaseKind::Prep => Some(0..=30),
            PhaseKind::Positioning => Some(0..=15),
            PhaseKind::Eccentric => Some(10..=60),
            PhaseKind::Concentric => Some(10..=60),
            PhaseKind::FinalEccentric => Some(20..=90),
            PhaseKind::Rest => Some(30..=180),
            PhaseKind::Complete => None,
        }
    }

    pub fn duration_for(&self, phase: PhaseKind) -> u32 {
        match phase {
            PhaseKind::Prep => self.prep,
            PhaseKind::Positioning => self.positioning,
            PhaseKind::Eccentric => self.eccentric,
            PhaseKind::Concentric => self.concentric,
            PhaseKind::FinalEccentric => self.final_eccentric,
            PhaseKind::Rest => self.rest,
            PhaseKind::Complete => 0,
        }
    }

    fn slot(&mut self, phase: PhaseKind) -> Option<&mut u32> {
        match phase {
            PhaseKind::Prep => Some(&mut self.prep),
            PhaseKind::Positioning => Some(&mut self.positioning),
            PhaseKind::Eccentric => Some(&mut self.eccentric),
            PhaseKind::Concentric => Some(&mut self.concentric),
            PhaseKind::FinalEccentric => Some(&mut self.final_eccentric),
            PhaseKind::Rest => Some(&mut self.rest),
            PhaseKind::Complete => None,
        }
    }

    /// Store `seconds` for `phase`, clamped into its bounds. Returns the value
    /// actually stored, or `None` for an untimed phase.
    pub fn set(&mut self, phase: PhaseKind, seconds: u32) -> Option<u32> {
        let bounds = Self::bounds(phase)?;
        let clamped = seconds.clamp(*bounds.start(), *bounds.end());
        if clamped != seconds {
            debug!("clamped {} duration {}s to {}s", phase.as_str(), seconds, clamped);
        }
        let slot = self.slot(phase)?;
        *slot = clamped;
        Some(clamped)
    }

    pub fn clamped(mut self) -> Self {
        for phase in PhaseKind::TIMED {
            let current = self.duration_for(phase);
            self.set(phase, current);
        }
        self
    }
}

/// Shared, writable durations. The engine reads a copy at every phase entry,
/// so an edit never changes the countdown already in progress.
#[derive(Debug, Clone, Default)]
pub struct DurationSettings {
    inner: Arc<RwLock<PhaseDurations>>,
}

impl DurationSettings {
    pub fn new(durations: PhaseDurations) -> Self {
        DurationSettings {
            inner: Arc::new(RwLock::new(durations.clamped())),
        }
    }

    pub fn snapshot(&self) -> PhaseDurations {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, phase: PhaseKind, seconds: u32) -> Option<u32> {
        match self.inner.write() {
            Ok(mut guard) => guard.set(phase, seconds),
            Err(poisoned) => poisoned.into_inner().set(phase, seconds),
        }
    }

    pub fn replace(&self, durations: PhaseDurations) {
        let durations = durations.clamped();
        match self.inner.write() {
            Ok(mut guard) => *guard = durations,
            Err(poisoned) => *poisoned.into_inner() = durations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub durations: PhaseDurations,
    pub cues: CueConfig,
    pub workout_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            durations: PhaseDurations::default(),
            cues: CueConfig::default(),
            workout_type: "workout".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&raw)?;
        settings.durations = settings.durations.clamped();
        settings.cues = settings.cues.normalized();
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn set_duration(&mut self, phase: &str, seconds: u32) -> Result<u32, ConfigError> {
        let kind: PhaseKind = phase.parse()?;
        self.durations
            .set(kind, seconds)
            .ok_or_else(|| ConfigError::Untimed(phase.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamps_into_bounds() {
        let mut d = PhaseDurations::default();
        assert_eq!(d.set(PhaseKind::Eccentric, 5), Some(10));
        assert_eq!(d.set(PhaseKind::Rest, 600), Some(180));
        assert_eq!(d.set(PhaseKind::Prep, 0), Some(0));
        assert_eq!(d.set(PhaseKind::Complete, 10), None);
        assert_eq!(d.eccentric, 10);
        assert_eq!(d.rest, 180);
    }

    #[test]
    fn clamped_normalizes_every_field() {
        let d = PhaseDurations {
            prep: 99,
            positioning: 99,
            eccentric: 0,
            concentric: 0,
            final_eccentric: 0,
            rest: 0,
        }
        .clamped();
        assert_eq!(
            d,
            PhaseDurations {
                prep: 30,
                positioning: 15,
                eccentric: 10,
                concentric: 10,
                final_eccentric: 20,
                rest: 30,
            }
        );
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let settings = DurationSettings::new(PhaseDurations::default());
        let before = settings.snapshot();
        settings.set(PhaseKind::Eccentric, 45);
        assert_eq!(before.eccentric, 30);
        assert_eq!(settings.snapshot().eccentric, 45);
    }

    #[test]
    fn settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.set_duration("rest", 120).unwrap();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.durations.rest, 120);
        assert_eq!(loaded.workout_type, "workout");
    }

    #[test]
    fn out_of_range_file_values_are_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"durations": {"eccentric": 300, "prep": 3}}"#).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.durations.eccentric, 60);
        assert_eq!(loaded.durations.prep, 3);
        assert_eq!(loaded.durations.rest, 90);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn set_duration_rejects_unknown_and_untimed() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_duration("warmup", 10),
            Err(ConfigError::UnknownPhase(_))
        ));
        assert!(matches!(
            settings.set_duration("complete", 10),
            Err(ConfigError::Untimed(_))
        ));
    }
}

//! Cue intents and where they go.
//!
//! A cue is an opaque `(category, key)` pair. The audio/haptic side decides
//! what it sounds or feels like and reports nothing back.

mod dispatcher;
pub mod pools;

pub use dispatcher::{CueDispatcher, Threshold, threshold};

use crate::errors::CueError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueCategory {
    PhaseAnnouncement,
    Coaching,
    Encouragement,
    TimeWarning,
    Rest,
    Workout,
}

impl CueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CueCategory::PhaseAnnouncement => "phase",
            CueCategory::Coaching => "coaching",
            CueCategory::Encouragement => "encouragement",
            CueCategory::TimeWarning => "time",
            CueCategory::Rest => "rest",
            CueCategory::Workout => "workout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cue {
    pub category: CueCategory,
    pub key: &'static str,
}

impl Cue {
    pub const fn new(category: CueCategory, key: &'static str) -> Self {
        Cue { category, key }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category.as_str(), self.key)
    }
}

/// When cues fire during loaded phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Coaching cue once half the phase has elapsed.
    pub halfway: bool,
    /// Remaining-seconds marks that get a time warning.
    pub warning_seconds: Vec<u32>,
    /// Chance that a coaching cue is swapped for general encouragement.
    pub encouragement_chance: f64,
}

impl Default for CueConfig {
    fn default() -> Self {
        CueConfig {
            halfway: true,
            warning_seconds: vec![10, 5],
            encouragement_chance: 0.25,
        }
    }
}

impl CueConfig {
    pub fn normalized(mut self) -> Self {
        self.encouragement_chance = if self.encouragement_chance.is_finite() {
            self.encouragement_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.warning_seconds.retain(|s| *s > 0);
        self.warning_seconds.sort_unstable_by(|a, b| b.cmp(a));
        self.warning_seconds.dedup();
        self
    }
}

/// Fire-and-forget destination for cues.
pub trait CueSink: Send {
    fn dispatch(&self, cue: Cue) -> Result<(), CueError>;
}

/// Writes cues to the log. Useful headless.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn dispatch(&self, cue: Cue) -> Result<(), CueError> {
        info!("cue {}", cue);
        Ok(())
    }
}

/// Forwards cues to an async consumer such as an audio task.
#[derive(Debug, Clone)]
pub struct ChannelCueSink {
    tx: UnboundedSender<Cue>,
}

impl ChannelCueSink {
    pub fn new(tx: UnboundedSender<Cue>) -> Self {
        ChannelCueSink { tx }
    }
}

impl CueSink for ChannelCueSink {
    fn dispatch(&self, cue: Cue) -> Result<(), CueError> {
        self.tx.send(cue).map_err(|_| CueError::Closed)
    }
}

/// Keeps every cue in memory for hosts that poll, and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingCueSink {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingCueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<Cue> {
        match self.cues.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn drain(&self) -> Vec<Cue> {
        match self.cues.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl CueSink for RecordingCueSink {
    fn dispatch(&self, cue: Cue) -> Result<(), CueError> {
        self.cues
            .lock()
            .map_err(|_| CueError::Unavailable("recording lock poisoned".to_string()))?
            .push(cue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_sorts_and_bounds() {
        let config = CueConfig {
            halfway: true,
            warning_seconds: vec![5, 0, 10, 5],
            encouragement_chance: 3.0,
        }
        .normalized();
        assert_eq!(config.warning_seconds, vec![10, 5]);
        assert_eq!(config.encouragement_chance, 1.0);
    }

    #[test]
    fn channel_sink_reports_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelCueSink::new(tx);
        drop(rx);
        let cue = Cue::new(CueCategory::Rest, pools::REST_STARTING);
        assert!(matches!(sink.dispatch(cue), Err(CueError::Closed)));
    }

    #[test]
    fn log_sink_accepts_everything() {
        let cue = Cue::new(CueCategory::PhaseAnnouncement, pools::PHASE_GET_READY);
        assert!(LogCueSink.dispatch(cue).is_ok());
        assert_eq!(cue.to_string(), "phase/phase_get_ready");
    }

    #[test]
    fn recording_sink_drains() {
        let sink = RecordingCueSink::new();
        sink.dispatch(Cue::new(CueCategory::Workout, pools::WORKOUT_COMPLETE))
            .unwrap();
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.cues().is_empty());
    }
}

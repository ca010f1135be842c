//! Exercise, routine and profile identifiers shared by the engine and its collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A user profile on the device. Partner mode alternates between two of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

impl Default for ProfileId {
    fn default() -> Self {
        ProfileId(1)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseId(pub Uuid);

impl ExerciseId {
    pub fn new() -> Self {
        ExerciseId(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(ExerciseId)
    }
}

impl Default for ExerciseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weighted vs. bodyweight, carrying the value remembered from the last set.
///
/// Negative-only is a property of bodyweight work only, so it lives inside
/// that variant and cannot be set on a weighted exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseKind {
    Weighted {
        last_weight: Option<f64>,
    },
    Bodyweight {
        negative_only: bool,
        last_duration: Option<u32>,
    },
}

/// The value a set is performed and logged with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WorkingValue {
    Weighted(f64),
    TimedBodyweight(u32),
}

impl WorkingValue {
    pub fn amount(&self) -> f64 {
        match self {
            WorkingValue::Weighted(w) => *w,
            WorkingValue::TimedBodyweight(s) => f64::from(*s),
        }
    }

    pub fn weight(&self) -> Option<f64> {
        match self {
            WorkingValue::Weighted(w) => Some(*w),
            WorkingValue::TimedBodyweight(_) => None,
        }
    }

    pub fn duration(&self) -> Option<u32> {
        match self {
            WorkingValue::Weighted(_) => None,
            WorkingValue::TimedBodyweight(s) => Some(*s),
        }
    }

    /// Same variant, new amount. Negative and non-finite input clamps to zero;
    /// durations round to whole seconds.
    pub fn with_amount(&self, amount: f64) -> Self {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        match self {
            WorkingValue::Weighted(_) => WorkingValue::Weighted(amount),
            WorkingValue::TimedBodyweight(_) => {
                WorkingValue::TimedBodyweight(amount.round().min(f64::from(u32::MAX)) as u32)
            }
        }
    }
}

impl fmt::Display for WorkingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkingValue::Weighted(w) => write!(f, "{:.1} lbs", w),
            WorkingValue::TimedBodyweight(s) => write!(f, "{}s", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    pub id: ExerciseId,
    pub name: String,
    pub kind: ExerciseKind,
    #[serde(default)]
    pub reached_failure: bool,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub media: Option<String>,
}

impl ExerciseSpec {
    pub fn weighted(name: impl Into<String>, last_weight: Option<f64>) -> Self {
        Self::with_kind(name, ExerciseKind::Weighted { last_weight })
    }

    pub fn bodyweight(name: impl Into<String>, last_duration: Option<u32>) -> Self {
        Self::with_kind(
            name,
            ExerciseKind::Bodyweight {
                negative_only: false,
                last_duration,
            },
        )
    }

    pub fn negative_only(name: impl Into<String>, last_duration: Option<u32>) -> Self {
        Self::with_kind(
            name,
            ExerciseKind::Bodyweight {
                negative_only: true,
                last_duration,
            },
        )
    }

    fn with_kind(name: impl Into<String>, kind: ExerciseKind) -> Self {
        ExerciseSpec {
            id: ExerciseId::new(),
            name: name.into(),
            kind,
            reached_failure: false,
            icon: None,
            media: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn is_bodyweight(&self) -> bool {
        matches!(self.kind, ExerciseKind::Bodyweight { .. })
    }

    pub fn is_negative_only(&self) -> bool {
        matches!(
            self.kind,
            ExerciseKind::Bodyweight {
                negative_only: true,
                ..
            }
        )
    }

    /// Seed for a new set: the carried-forward weight or duration, zero when unknown.
    pub fn working_value(&self) -> WorkingValue {
        match &self.kind {
            ExerciseKind::Weighted { last_weight } => {
                WorkingValue::Weighted(last_weight.unwrap_or(0.0))
            }
            ExerciseKind::Bodyweight { last_duration, .. } => {
                WorkingValue::TimedBodyweight(last_duration.unwrap_or(0))
            }
        }
    }

    /// Remember `value` as the seed for the next set. Ignored when the variant
    /// does not match the exercise kind.
    pub fn carry_forward(&mut self, value: WorkingValue) {
        match (&mut self.kind, value) {
            (ExerciseKind::Weighted { last_weight }, WorkingValue::Weighted(w)) => {
                *last_weight = Some(w);
            }
            (ExerciseKind::Bodyweight { last_duration, .. }, WorkingValue::TimedBodyweight(s)) => {
                *last_duration = Some(s);
            }
            _ => {}
        }
    }
}

/// Progress of one exercise within the current workout.
///
/// `Logged` can only be reached from `Completed`, so a logged exercise is
/// always a completed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExerciseStatus {
    #[default]
    NotStarted,
    Completed,
    Logged,
}

impl ExerciseStatus {
    pub fn is_completed(&self) -> bool {
        !matches!(self, ExerciseStatus::NotStarted)
    }

    pub fn is_logged(&self) -> bool {
        matches!(self, ExerciseStatus::Logged)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub name: String,
    pub exercises: Vec<ExerciseSpec>,
}

impl Routine {
    /// The stock eight-machine routine new profiles start with.
    pub fn full_body() -> Self {
        let machines = [
            ("Leg Press", "leg_press.png"),
            ("Pulldown", "pull_up.png"),
            ("Chest Press", "bench_press.png"),
            ("Overhead Press", "overhead_press.png"),
            ("Seated Row", "barbell_row.png"),
            ("Leg Curl", "leg_curl.png"),
            ("Bicep Curl", "bicep_curl.png"),
            ("Tricep Extension", "tricep_extension.png"),
        ];
        Routine {
            name: "Full Body HIT".to_string(),
            exercises: machines
                .iter()
                .map(|(name, icon)| ExerciseSpec::weighted(*name, None).with_icon(*icon))
                .collect(),
        }
    }
}

use crate::config::PhaseDurations;
use crate::cues::Cue;
use crate::exercise::{ExerciseKind, ExerciseSpec, ExerciseStatus, WorkingValue};
use crate::session::{CommitReport, MirrorState, SessionEntry, SessionSnapshot, StageKind};
use crate::store::{LogEntry, PersonalRecord};

#[derive(Debug, Clone, uniffi::Enum)]
pub enum ExerciseProgress {
    NotStarted,
    Completed,
    Logged,
}

impl From<ExerciseStatus> for ExerciseProgress {
    fn from(s: ExerciseStatus) -> Self {
        match s {
            ExerciseStatus::NotStarted => ExerciseProgress::NotStarted,
            ExerciseStatus::Completed => ExerciseProgress::Completed,
            ExerciseStatus::Logged => ExerciseProgress::Logged,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub is_bodyweight: bool,
    pub is_negative_only: bool,
    pub last_weight: Option<f64>,
    pub last_duration: Option<u32>,
    pub reached_failure: bool,
    pub icon: Option<String>,
    pub progress: ExerciseProgress,
}

impl ExerciseRecord {
    fn new(spec: &ExerciseSpec, status: ExerciseStatus) -> Self {
        let (last_weight, last_duration) = match &spec.kind {
            ExerciseKind::Weighted { last_weight } => (*last_weight, None),
            ExerciseKind::Bodyweight { last_duration, .. } => (None, *last_duration),
        };
        ExerciseRecord {
            id: spec.id.to_string(),
            name: spec.name.clone(),
            is_bodyweight: spec.is_bodyweight(),
            is_negative_only: spec.is_negative_only(),
            last_weight,
            last_duration,
            reached_failure: spec.reached_failure,
            icon: spec.icon.clone(),
            progress: status.into(),
        }
    }
}

impl From<&SessionEntry> for ExerciseRecord {
    fn from(e: &SessionEntry) -> Self {
        ExerciseRecord::new(&e.spec, e.status)
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct MirrorRecord {
    pub phase: Option<String>,
    pub phase_name: Option<String>,
    pub time_remaining: u32,
    pub phase_duration: u32,
    pub running: bool,
}

impl From<MirrorState> for MirrorRecord {
    fn from(m: MirrorState) -> Self {
        MirrorRecord {
            phase: m.phase.map(|p| p.as_str().to_string()),
            phase_name: m.phase.map(|p| p.display_name().to_string()),
            time_remaining: m.time_remaining,
            phase_duration: m.phase_duration,
            running: m.running,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct SnapshotRecord {
    pub stage: String,
    pub timer: MirrorRecord,
    pub profile: u32,
    pub current_exercise: Option<ExerciseRecord>,
    pub working_value: Option<f64>,
    pub reached_failure: bool,
    pub is_completed: bool,
    pub is_logged: bool,
    pub next_exercise: Option<ExerciseRecord>,
    pub partner_number: Option<u8>,
    pub exercises: Vec<ExerciseRecord>,
    pub workout_elapsed_seconds: Option<u64>,
    pub workout_finished: bool,
}

impl From<&SessionSnapshot> for SnapshotRecord {
    fn from(s: &SessionSnapshot) -> Self {
        let lookup = |id| s.exercises.iter().find(|e| e.spec.id == id).map(ExerciseRecord::from);
        SnapshotRecord {
            stage: match s.stage {
                StageKind::Idle => "idle",
                StageKind::Exercise => "exercise",
                StageKind::Rest => "rest",
            }
            .to_string(),
            timer: s.mirror().into(),
            profile: s.profile.0,
            current_exercise: s.current_exercise.as_ref().map(|e| {
                ExerciseRecord::new(e, s.status.unwrap_or(ExerciseStatus::NotStarted))
            }),
            working_value: s.working_value.as_ref().map(WorkingValue::amount),
            reached_failure: s.reached_failure,
            is_completed: s.is_completed(),
            is_logged: s.is_logged(),
            next_exercise: s.next_exercise.as_ref().and_then(|e| lookup(e.id)),
            partner_number: s.partner.map(|p| p.current_partner.number()),
            exercises: s.exercises.iter().map(ExerciseRecord::from).collect(),
            workout_elapsed_seconds: s.workout_elapsed_seconds,
            workout_finished: s.workout_finished,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct LogRecord {
    pub exercise_name: String,
    pub weight: Option<f64>,
    pub duration: Option<u32>,
    pub reached_failure: bool,
    pub timestamp: String,
    pub workout_type: String,
}

impl From<&LogEntry> for LogRecord {
    fn from(e: &LogEntry) -> Self {
        LogRecord {
            exercise_name: e.exercise_name.clone(),
            weight: e.value.weight(),
            duration: e.value.duration(),
            reached_failure: e.reached_failure,
            timestamp: e.timestamp.to_rfc3339(),
            workout_type: e.workout_type.clone(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct CommitRecord {
    pub entry: LogRecord,
    pub personal_record: bool,
    pub store_error: Option<String>,
}

impl From<CommitReport> for CommitRecord {
    fn from(r: CommitReport) -> Self {
        CommitRecord {
            entry: LogRecord::from(&r.entry),
            personal_record: r.personal_record,
            store_error: r.store_error,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct RecordRecord {
    pub exercise_name: String,
    pub weight: f64,
}

impl From<PersonalRecord> for RecordRecord {
    fn from(r: PersonalRecord) -> Self {
        RecordRecord {
            exercise_name: r.exercise_name,
            weight: r.weight,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct CueRecord {
    pub category: String,
    pub key: String,
}

impl From<Cue> for CueRecord {
    fn from(c: Cue) -> Self {
        CueRecord {
            category: c.category.as_str().to_string(),
            key: c.key.to_string(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct DurationsRecord {
    pub prep: u32,
    pub positioning: u32,
    pub eccentric: u32,
    pub concentric: u32,
    pub final_eccentric: u32,
    pub rest: u32,
}

impl From<PhaseDurations> for DurationsRecord {
    fn from(d: PhaseDurations) -> Self {
        DurationsRecord {
            prep: d.prep,
            positioning: d.positioning,
            eccentric: d.eccentric,
            concentric: d.concentric,
            final_eccentric: d.final_eccentric,
            rest: d.rest,
        }
    }
}

impl From<DurationsRecord> for PhaseDurations {
    fn from(d: DurationsRecord) -> Self {
        PhaseDurations {
            prep: d.prep,
            positioning: d.positioning,
            eccentric: d.eccentric,
            concentric: d.concentric,
            final_eccentric: d.final_eccentric,
            rest: d.rest,
        }
    }
}

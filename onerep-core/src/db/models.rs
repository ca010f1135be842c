use chrono::{DateTime, SecondsFormat, Utc};
use diesel::{Insertable, Queryable, Selectable};

use crate::db::schema;
use crate::errors::StoreError;
use crate::exercise::{ExerciseId, ExerciseKind, ExerciseSpec, ProfileId, WorkingValue};
use crate::store::LogEntry;

const KIND_WEIGHTED: &str = "weighted";
const KIND_TIMED: &str = "timed_bodyweight";
const KIND_BODYWEIGHT: &str = "bodyweight";

// Set log models
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::set_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SetLogRow {
    pub id: i32,
    pub profile_id: i32,
    pub exercise_name: String,
    pub value_kind: String,
    pub weight: Option<f64>,
    pub duration_seconds: Option<i32>,
    pub reached_failure: bool,
    pub logged_at: String,
    pub workout_type: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::set_logs)]
pub struct NewSetLog<'a> {
    pub profile_id: i32,
    pub exercise_name: &'a str,
    pub value_kind: &'static str,
    pub weight: Option<f64>,
    pub duration_seconds: Option<i32>,
    pub reached_failure: bool,
    pub logged_at: String,
    pub workout_type: &'a str,
}

impl<'a> NewSetLog<'a> {
    pub fn from_entry(profile_id: i32, entry: &'a LogEntry) -> Result<Self, StoreError> {
        let (value_kind, weight, duration_seconds) = match entry.value {
            WorkingValue::Weighted(w) => (KIND_WEIGHTED, Some(w), None),
            WorkingValue::TimedBodyweight(s) => (KIND_TIMED, None, Some(seconds_column(s)?)),
        };
        Ok(NewSetLog {
            profile_id,
            exercise_name: &entry.exercise_name,
            value_kind,
            weight,
            duration_seconds,
            reached_failure: entry.reached_failure,
            logged_at: timestamp_column(&entry.timestamp),
            workout_type: &entry.workout_type,
        })
    }
}

impl TryFrom<SetLogRow> for LogEntry {
    type Error = StoreError;

    fn try_from(row: SetLogRow) -> Result<Self, StoreError> {
        let malformed = |reason: &str| StoreError::MalformedRow {
            id: row.id,
            reason: reason.to_string(),
        };
        let value = match (row.value_kind.as_str(), row.weight, row.duration_seconds) {
            (KIND_WEIGHTED, Some(w), _) => WorkingValue::Weighted(w),
            (KIND_TIMED, _, Some(s)) => WorkingValue::TimedBodyweight(
                u32::try_from(s).map_err(|_| malformed("negative duration"))?,
            ),
            _ => return Err(malformed("value does not match its kind")),
        };
        let timestamp = DateTime::parse_from_rfc3339(&row.logged_at)
            .map_err(|e| malformed(&format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);
        let profile = u32::try_from(row.profile_id).map_err(|_| malformed("negative profile id"))?;

        Ok(LogEntry {
            profile: ProfileId(profile),
            exercise_name: row.exercise_name,
            value,
            reached_failure: row.reached_failure,
            timestamp,
            workout_type: row.workout_type,
        })
    }
}

// Routine models
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::routine_exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RoutineExerciseRow {
    pub id: i32,
    pub profile_id: i32,
    pub routine_name: String,
    pub position: i32,
    pub exercise_id: String,
    pub name: String,
    pub kind: String,
    pub negative_only: bool,
    pub last_weight: Option<f64>,
    pub last_duration: Option<i32>,
    pub reached_failure: bool,
    pub icon: Option<String>,
    pub media: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = schema::routine_exercises)]
pub struct NewRoutineExercise<'a> {
    pub profile_id: i32,
    pub routine_name: &'a str,
    pub position: i32,
    pub exercise_id: String,
    pub name: &'a str,
    pub kind: &'static str,
    pub negative_only: bool,
    pub last_weight: Option<f64>,
    pub last_duration: Option<i32>,
    pub reached_failure: bool,
    pub icon: Option<&'a str>,
    pub media: Option<&'a str>,
}

impl<'a> NewRoutineExercise<'a> {
    pub fn from_spec(
        profile_id: i32,
        routine_name: &'a str,
        position: i32,
        spec: &'a ExerciseSpec,
    ) -> Result<Self, StoreError> {
        let (kind, negative_only, last_weight, last_duration) = match &spec.kind {
            ExerciseKind::Weighted { last_weight } => (KIND_WEIGHTED, false, *last_weight, None),
            ExerciseKind::Bodyweight {
                negative_only,
                last_duration,
            } => (
                KIND_BODYWEIGHT,
                *negative_only,
                None,
                last_duration.map(seconds_column).transpose()?,
            ),
        };
        Ok(NewRoutineExercise {
            profile_id,
            routine_name,
            position,
            exercise_id: spec.id.to_string(),
            name: &spec.name,
            kind,
            negative_only,
            last_weight,
            last_duration,
            reached_failure: spec.reached_failure,
            icon: spec.icon.as_deref(),
            media: spec.media.as_deref(),
        })
    }
}

impl TryFrom<RoutineExerciseRow> for ExerciseSpec {
    type Error = StoreError;

    fn try_from(row: RoutineExerciseRow) -> Result<Self, StoreError> {
        let malformed = |reason: &str| StoreError::MalformedRow {
            id: row.id,
            reason: reason.to_string(),
        };
        let id = ExerciseId::parse(&row.exercise_id).ok_or_else(|| malformed("bad exercise id"))?;
        let kind = match row.kind.as_str() {
            KIND_WEIGHTED => ExerciseKind::Weighted {
                last_weight: row.last_weight,
            },
            KIND_BODYWEIGHT => ExerciseKind::Bodyweight {
                negative_only: row.negative_only,
                last_duration: row
                    .last_duration
                    .map(u32::try_from)
                    .transpose()
                    .map_err(|_| malformed("negative duration"))?,
            },
            other => return Err(malformed(&format!("unknown kind {other}"))),
        };
        Ok(ExerciseSpec {
            id,
            name: row.name,
            kind,
            reached_failure: row.reached_failure,
            icon: row.icon,
            media: row.media,
        })
    }
}

/// Fixed-width UTC so text ordering matches time ordering.
pub fn timestamp_column(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn seconds_column(seconds: u32) -> Result<i32, StoreError> {
    i32::try_from(seconds).map_err(|_| StoreError::Rejected(format!("{seconds}s out of range")))
}

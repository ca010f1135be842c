use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::models::{NewRoutineExercise, NewSetLog, RoutineExerciseRow, SetLogRow};
use crate::db::schema::{routine_exercises, set_logs};

// Set logs
pub fn insert_set_log(conn: &mut SqliteConnection, row: &NewSetLog<'_>) -> QueryResult<usize> {
    diesel::insert_into(set_logs::table).values(row).execute(conn)
}

pub fn max_weight(
    conn: &mut SqliteConnection,
    profile_id: i32,
    exercise_name: &str,
) -> QueryResult<Option<f64>> {
    set_logs::table
        .filter(set_logs::profile_id.eq(profile_id))
        .filter(set_logs::exercise_name.eq(exercise_name))
        .select(max(set_logs::weight))
        .first::<Option<f64>>(conn)
}

pub fn recent_set_logs(
    conn: &mut SqliteConnection,
    profile_id: i32,
    exercise_name: Option<&str>,
    limit: i64,
) -> QueryResult<Vec<SetLogRow>> {
    let newest_first = (set_logs::logged_at.desc(), set_logs::id.desc());
    match exercise_name {
        Some(name) => set_logs::table
            .filter(set_logs::profile_id.eq(profile_id))
            .filter(set_logs::exercise_name.eq(name))
            .order(newest_first)
            .limit(limit)
            .select(SetLogRow::as_select())
            .load(conn),
        None => set_logs::table
            .filter(set_logs::profile_id.eq(profile_id))
            .order(newest_first)
            .limit(limit)
            .select(SetLogRow::as_select())
            .load(conn),
    }
}

pub fn max_weight_by_exercise(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> QueryResult<Vec<(String, Option<f64>)>> {
    set_logs::table
        .filter(set_logs::profile_id.eq(profile_id))
        .filter(set_logs::weight.is_not_null())
        .group_by(set_logs::exercise_name)
        .select((set_logs::exercise_name, max(set_logs::weight)))
        .order(set_logs::exercise_name.asc())
        .load::<(String, Option<f64>)>(conn)
}

// Routines
pub fn routine_for_profile(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> QueryResult<Vec<RoutineExerciseRow>> {
    routine_exercises::table
        .filter(routine_exercises::profile_id.eq(profile_id))
        .order(routine_exercises::position.asc())
        .select(RoutineExerciseRow::as_select())
        .load(conn)
}

pub fn set_last_weight(
    conn: &mut SqliteConnection,
    profile_id: i32,
    exercise_name: &str,
    weight: f64,
) -> QueryResult<usize> {
    diesel::update(
        routine_exercises::table
            .filter(routine_exercises::profile_id.eq(profile_id))
            .filter(routine_exercises::name.eq(exercise_name))
            .filter(routine_exercises::kind.eq("weighted")),
    )
    .set(routine_exercises::last_weight.eq(Some(weight)))
    .execute(conn)
}

pub fn set_last_duration(
    conn: &mut SqliteConnection,
    profile_id: i32,
    exercise_name: &str,
    seconds: i32,
) -> QueryResult<usize> {
    diesel::update(
        routine_exercises::table
            .filter(routine_exercises::profile_id.eq(profile_id))
            .filter(routine_exercises::name.eq(exercise_name))
            .filter(routine_exercises::kind.eq("bodyweight")),
    )
    .set(routine_exercises::last_duration.eq(Some(seconds)))
    .execute(conn)
}

pub fn replace_routine(
    conn: &mut SqliteConnection,
    profile_id: i32,
    rows: &[NewRoutineExercise<'_>],
) -> QueryResult<usize> {
    conn.transaction(|conn| {
        diesel::delete(
            routine_exercises::table.filter(routine_exercises::profile_id.eq(profile_id)),
        )
        .execute(conn)?;
        diesel::insert_into(routine_exercises::table)
            .values(rows)
            .execute(conn)
    })
}

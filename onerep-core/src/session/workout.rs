//! One profile's exercise list for the current workout.

use crate::exercise::{ExerciseId, ExerciseSpec, ExerciseStatus, ProfileId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub spec: ExerciseSpec,
    pub status: ExerciseStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub profile: ProfileId,
    pub entries: Vec<SessionEntry>,
    /// Index of the exercise last started, `None` before the first start.
    pub cursor: Option<usize>,
}

impl WorkoutSession {
    pub fn new(profile: ProfileId, exercises: Vec<ExerciseSpec>) -> Self {
        WorkoutSession {
            profile,
            entries: exercises
                .into_iter()
                .map(|spec| SessionEntry {
                    spec,
                    status: ExerciseStatus::NotStarted,
                })
                .collect(),
            cursor: None,
        }
    }

    pub fn position(&self, id: ExerciseId) -> Option<usize> {
        self.entries.iter().position(|e| e.spec.id == id)
    }

    pub fn entry(&self, id: ExerciseId) -> Option<&SessionEntry> {
        self.entries.iter().find(|e| e.spec.id == id)
    }

    pub fn entry_mut(&mut self, id: ExerciseId) -> Option<&mut SessionEntry> {
        self.entries.iter_mut().find(|e| e.spec.id == id)
    }

    /// Next exercise that has not been completed: after the cursor first,
    /// then wrapping around to the start of the list.
    pub fn next_pending(&self) -> Option<&SessionEntry> {
        let len = self.entries.len();
        let start = self.cursor.map_or(0, |c| c + 1);
        let span = if self.cursor.is_some() { len.saturating_sub(1) } else { len };
        (0..span)
            .map(|offset| (start + offset) % len)
            .map(|idx| &self.entries[idx])
            .find(|e| !e.status.is_completed())
    }

    pub fn next_pending_id(&self) -> Option<ExerciseId> {
        self.next_pending().map(|e| e.spec.id)
    }

    pub fn is_done(&self) -> bool {
        self.entries.iter().all(|e| e.status.is_completed())
    }

    /// Clear every status for a new workout. Carried values stay.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.status = ExerciseStatus::NotStarted;
        }
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(names: &[&str]) -> WorkoutSession {
        WorkoutSession::new(
            ProfileId(1),
            names
                .iter()
                .map(|n| ExerciseSpec::weighted(*n, None))
                .collect(),
        )
    }

    fn name(entry: Option<&SessionEntry>) -> Option<&str> {
        entry.map(|e| e.spec.name.as_str())
    }

    #[test]
    fn first_pending_before_any_start() {
        let s = session(&["A", "B", "C"]);
        assert_eq!(name(s.next_pending()), Some("A"));
    }

    #[test]
    fn search_wraps_past_end() {
        let mut s = session(&["A", "B", "C"]);
        s.cursor = Some(2);
        s.entries[2].status = ExerciseStatus::Logged;
        assert_eq!(name(s.next_pending()), Some("A"));

        s.entries[0].status = ExerciseStatus::Completed;
        assert_eq!(name(s.next_pending()), Some("B"));
    }

    #[test]
    fn cursor_exercise_is_never_its_own_successor() {
        let mut s = session(&["A", "B"]);
        s.cursor = Some(0);
        s.entries[1].status = ExerciseStatus::Logged;
        assert_eq!(s.next_pending(), None);
    }

    #[test]
    fn empty_session_has_nothing_pending() {
        let mut s = session(&[]);
        assert!(s.next_pending().is_none());
        s.cursor = Some(0);
        assert!(s.next_pending().is_none());
        assert!(s.is_done());
    }

    #[test]
    fn reset_keeps_carried_values() {
        let mut s = WorkoutSession::new(
            ProfileId(1),
            vec![ExerciseSpec::weighted("Leg Press", Some(200.0))],
        );
        s.entries[0].status = ExerciseStatus::Logged;
        s.cursor = Some(0);
        s.reset();
        assert_eq!(s.entries[0].status, ExerciseStatus::NotStarted);
        assert_eq!(s.entries[0].spec.working_value().weight(), Some(200.0));
        assert_eq!(s.cursor, None);
    }
}

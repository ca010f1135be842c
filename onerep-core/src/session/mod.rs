//! The session orchestrator: sequences each exercise's phases on one
//! shared countdown, dispatches cues, commits sets to the log store and
//! alternates partners.
//!
//! `SessionOrchestrator` is defined in `orchestrator`; its operations are
//! spread over the sibling files by concern.

mod commit;
mod orchestrator;
mod partner;
mod phases;
mod rest;
mod snapshot;
mod workout;

pub use commit::CommitReport;
pub use orchestrator::{Collaborators, SessionOrchestrator};
pub use snapshot::{MirrorState, SessionSnapshot, StageKind};
pub use workout::{SessionEntry, WorkoutSession};

pub mod errors;
pub mod objects;
pub mod session;

pub use errors::OneRepError;
pub use session::WorkoutEngine;

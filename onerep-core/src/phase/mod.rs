//! Phase kinds, the per-exercise sequencer and the countdown clock.

mod clock;
mod sequencer;

pub use clock::{ClockStart, ClockToken, PhaseClock, TickOutcome};
pub use sequencer::{PhaseSequencer, SequenceVariant};

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Prep,
    Positioning,
    Eccentric,
    Concentric,
    FinalEccentric,
    Complete,
    Rest,
}

impl PhaseKind {
    pub const TIMED: [PhaseKind; 6] = [
        PhaseKind::Prep,
        PhaseKind::Positioning,
        PhaseKind::Eccentric,
        PhaseKind::Concentric,
        PhaseKind::FinalEccentric,
        PhaseKind::Rest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Prep => "prep",
            PhaseKind::Positioning => "positioning",
            PhaseKind::Eccentric => "eccentric",
            PhaseKind::Concentric => "concentric",
            PhaseKind::FinalEccentric => "final_eccentric",
            PhaseKind::Complete => "complete",
            PhaseKind::Rest => "rest",
        }
    }

    /// Short label for timers, watch faces and widgets.
    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseKind::Prep => "Get Ready",
            PhaseKind::Positioning => "Position",
            PhaseKind::Eccentric => "Lower",
            PhaseKind::Concentric => "Push",
            PhaseKind::FinalEccentric => "Final Negative",
            PhaseKind::Complete => "Complete",
            PhaseKind::Rest => "Rest",
        }
    }

    /// Phases under load, where coaching cues and time warnings play.
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            PhaseKind::Eccentric | PhaseKind::Concentric | PhaseKind::FinalEccentric
        )
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PhaseKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "prep" | "get_ready" => Ok(PhaseKind::Prep),
            "positioning" | "position" => Ok(PhaseKind::Positioning),
            "eccentric" => Ok(PhaseKind::Eccentric),
            "concentric" => Ok(PhaseKind::Concentric),
            "final_eccentric" | "finaleccentric" | "final" => Ok(PhaseKind::FinalEccentric),
            "complete" => Ok(PhaseKind::Complete),
            "rest" => Ok(PhaseKind::Rest),
            _ => Err(ConfigError::UnknownPhase(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_phase_names() {
        assert_eq!("final-eccentric".parse::<PhaseKind>().unwrap(), PhaseKind::FinalEccentric);
        assert_eq!("Prep".parse::<PhaseKind>().unwrap(), PhaseKind::Prep);
        assert!("warmup".parse::<PhaseKind>().is_err());
    }

    #[test]
    fn only_loaded_phases_are_movement() {
        let movement: Vec<_> = PhaseKind::TIMED.iter().filter(|p| p.is_movement()).collect();
        assert_eq!(
            movement,
            vec![&PhaseKind::Eccentric, &PhaseKind::Concentric, &PhaseKind::FinalEccentric]
        );
    }
}

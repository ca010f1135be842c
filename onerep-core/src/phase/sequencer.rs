use super::PhaseKind;
use crate::config::PhaseDurations;
use crate::exercise::ExerciseSpec;

/// Which ordered phase list an exercise runs through. Chosen once, when the
/// exercise enters prep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceVariant {
    Standard,
    /// Bodyweight negatives: nothing to push against on the way up, so the
    /// controlled lower/push pair collapses into the forced final negative.
    NegativeOnly,
}

const STANDARD: [PhaseKind; 6] = [
    PhaseKind::Prep,
    PhaseKind::Positioning,
    PhaseKind::Eccentric,
    PhaseKind::Concentric,
    PhaseKind::FinalEccentric,
    PhaseKind::Complete,
];

const NEGATIVE_ONLY: [PhaseKind; 4] = [
    PhaseKind::Prep,
    PhaseKind::Positioning,
    PhaseKind::FinalEccentric,
    PhaseKind::Complete,
];

impl SequenceVariant {
    pub fn for_exercise(spec: &ExerciseSpec) -> Self {
        if spec.is_negative_only() {
            SequenceVariant::NegativeOnly
        } else {
            SequenceVariant::Standard
        }
    }

    pub fn phases(self) -> &'static [PhaseKind] {
        match self {
            SequenceVariant::Standard => &STANDARD,
            SequenceVariant::NegativeOnly => &NEGATIVE_ONLY,
        }
    }
}

/// Position of one exercise attempt within its phase list.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    variant: SequenceVariant,
    current: PhaseKind,
}

impl PhaseSequencer {
    pub fn new(variant: SequenceVariant) -> Self {
        PhaseSequencer {
            variant,
            current: PhaseKind::Prep,
        }
    }

    pub fn for_exercise(spec: &ExerciseSpec) -> Self {
        Self::new(SequenceVariant::for_exercise(spec))
    }

    /// Successor of `current`, or `None` when `current` is terminal or not
    /// part of the variant at all (rest is never part of an exercise).
    pub fn next_phase(variant: SequenceVariant, current: PhaseKind) -> Option<PhaseKind> {
        let phases = variant.phases();
        let idx = phases.iter().position(|p| *p == current)?;
        phases.get(idx + 1).copied()
    }

    pub fn duration_for(phase: PhaseKind, durations: &PhaseDurations) -> u32 {
        durations.duration_for(phase)
    }

    pub fn variant(&self) -> SequenceVariant {
        self.variant
    }

    pub fn current(&self) -> PhaseKind {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current == PhaseKind::Complete
    }

    pub fn advance(&mut self) -> Option<PhaseKind> {
        let next = Self::next_phase(self.variant, self.current)?;
        self.current = next;
        Some(next)
    }

    pub fn finish(&mut self) {
        self.current = PhaseKind::Complete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(variant: SequenceVariant) -> Vec<PhaseKind> {
        let mut seq = PhaseSequencer::new(variant);
        let mut phases = vec![seq.current()];
        while let Some(next) = seq.advance() {
            phases.push(next);
        }
        phases
    }

    #[test]
    fn weighted_runs_standard_sequence() {
        let spec = ExerciseSpec::weighted("Leg Press", Some(200.0));
        assert_eq!(SequenceVariant::for_exercise(&spec), SequenceVariant::Standard);
        assert_eq!(
            walk(SequenceVariant::Standard),
            vec![
                PhaseKind::Prep,
                PhaseKind::Positioning,
                PhaseKind::Eccentric,
                PhaseKind::Concentric,
                PhaseKind::FinalEccentric,
                PhaseKind::Complete,
            ]
        );
    }

    #[test]
    fn plain_bodyweight_runs_standard_sequence() {
        let spec = ExerciseSpec::bodyweight("Dips", Some(45));
        assert_eq!(SequenceVariant::for_exercise(&spec), SequenceVariant::Standard);
    }

    #[test]
    fn negative_only_skips_lower_and_push() {
        let spec = ExerciseSpec::negative_only("Chin-up", None);
        assert_eq!(SequenceVariant::for_exercise(&spec), SequenceVariant::NegativeOnly);
        assert_eq!(
            walk(SequenceVariant::NegativeOnly),
            vec![
                PhaseKind::Prep,
                PhaseKind::Positioning,
                PhaseKind::FinalEccentric,
                PhaseKind::Complete,
            ]
        );
    }

    #[test]
    fn complete_and_rest_have_no_successor() {
        for variant in [SequenceVariant::Standard, SequenceVariant::NegativeOnly] {
            assert_eq!(PhaseSequencer::next_phase(variant, PhaseKind::Complete), None);
            assert_eq!(PhaseSequencer::next_phase(variant, PhaseKind::Rest), None);
        }
    }

    #[test]
    fn finish_jumps_to_complete() {
        let mut seq = PhaseSequencer::new(SequenceVariant::Standard);
        seq.advance();
        seq.finish();
        assert!(seq.is_complete());
        assert_eq!(seq.advance(), None);
    }

    #[test]
    fn durations_come_from_snapshot() {
        let durations = PhaseDurations::default();
        assert_eq!(PhaseSequencer::duration_for(PhaseKind::Prep, &durations), 10);
        assert_eq!(PhaseSequencer::duration_for(PhaseKind::Complete, &durations), 0);
    }
}

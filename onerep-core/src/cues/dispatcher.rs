use super::{Cue, CueCategory, CueConfig, pools};
use crate::phase::PhaseKind;
use log::trace;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// A countdown point at which a cue is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Halfway,
    Warning(u32),
    RestMidpoint,
    RestEnding,
}

const REST_ENDING_AT: u32 = 10;

/// Which threshold, if any, a tick lands on. Pure in the phase duration and
/// remaining time, so cue timing never depends on the random source.
///
/// A time warning wins over halfway when both fall on the same second.
pub fn threshold(
    config: &CueConfig,
    phase: PhaseKind,
    duration: u32,
    remaining: u32,
) -> Option<Threshold> {
    if remaining == 0 || remaining >= duration {
        return None;
    }
    let elapsed = duration - remaining;
    let at_half = duration >= 2 && elapsed == duration / 2;

    if phase == PhaseKind::Rest {
        if remaining == REST_ENDING_AT && duration > REST_ENDING_AT {
            return Some(Threshold::RestEnding);
        }
        return at_half.then_some(Threshold::RestMidpoint);
    }

    if !phase.is_movement() {
        return None;
    }
    if config.warning_seconds.contains(&remaining) {
        return Some(Threshold::Warning(remaining));
    }
    (config.halfway && at_half).then_some(Threshold::Halfway)
}

/// Turns phase entries and countdown thresholds into cues.
///
/// Holds no session state of its own; the random source only picks which
/// line from a pool is played.
#[derive(Debug)]
pub struct CueDispatcher {
    config: CueConfig,
    rng: StdRng,
}

impl Default for CueDispatcher {
    fn default() -> Self {
        Self::new(CueConfig::default())
    }
}

impl CueDispatcher {
    pub fn new(config: CueConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn seeded(config: CueConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: CueConfig, rng: StdRng) -> Self {
        CueDispatcher {
            config: config.normalized(),
            rng,
        }
    }

    pub fn config(&self) -> &CueConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CueConfig) {
        self.config = config.normalized();
    }

    pub fn on_enter(&self, phase: PhaseKind) -> Cue {
        let key = match phase {
            PhaseKind::Prep => pools::PHASE_GET_READY,
            PhaseKind::Positioning => pools::PHASE_POSITION,
            PhaseKind::Eccentric => pools::PHASE_ECCENTRIC,
            PhaseKind::Concentric => pools::PHASE_CONCENTRIC,
            PhaseKind::FinalEccentric => pools::PHASE_FINAL_ECCENTRIC,
            PhaseKind::Complete => pools::PHASE_COMPLETE,
            PhaseKind::Rest => return Cue::new(CueCategory::Rest, pools::REST_STARTING),
        };
        Cue::new(CueCategory::PhaseAnnouncement, key)
    }

    pub fn on_tick(&mut self, phase: PhaseKind, duration: u32, remaining: u32) -> Option<Cue> {
        let hit = threshold(&self.config, phase, duration, remaining)?;
        trace!("{} threshold {:?} at {}s", phase.as_str(), hit, remaining);
        match hit {
            Threshold::Halfway => self.coaching(phase),
            Threshold::Warning(secs) => Some(Cue::new(CueCategory::TimeWarning, warning_key(secs))),
            Threshold::RestMidpoint => Some(Cue::new(CueCategory::Rest, pools::REST_BREATHE)),
            Threshold::RestEnding => Some(Cue::new(CueCategory::Rest, pools::REST_NEXT_COMING)),
        }
    }

    /// Rest countdown cues. The "next exercise coming" line is held back
    /// when nothing is left to start after the rest.
    pub fn on_rest_tick(&mut self, duration: u32, remaining: u32, has_next: bool) -> Option<Cue> {
        match threshold(&self.config, PhaseKind::Rest, duration, remaining)? {
            Threshold::RestEnding if !has_next => None,
            _ => self.on_tick(PhaseKind::Rest, duration, remaining),
        }
    }

    pub fn on_rest_complete(&self) -> Cue {
        Cue::new(CueCategory::Rest, pools::REST_COMPLETE)
    }

    pub fn on_workout_complete(&self) -> Cue {
        Cue::new(CueCategory::Workout, pools::WORKOUT_COMPLETE)
    }

    fn coaching(&mut self, phase: PhaseKind) -> Option<Cue> {
        if self.rng.random_bool(self.config.encouragement_chance) {
            let key = *pools::ENCOURAGEMENT.choose(&mut self.rng)?;
            return Some(Cue::new(CueCategory::Encouragement, key));
        }
        let pool = match phase {
            PhaseKind::Eccentric => pools::ECCENTRIC,
            PhaseKind::Concentric => pools::CONCENTRIC,
            PhaseKind::FinalEccentric => pools::FINAL_ECCENTRIC,
            _ => return None,
        };
        let key = *pool.choose(&mut self.rng)?;
        Some(Cue::new(CueCategory::Coaching, key))
    }
}

fn warning_key(secs: u32) -> &'static str {
    match secs {
        30 => pools::TIME_30_SEC,
        20 => pools::TIME_20_SEC,
        10 => pools::TIME_10_SEC,
        5 => pools::TIME_5_SEC,
        _ => pools::TIME_ALMOST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(phase: PhaseKind, duration: u32) -> Vec<(u32, Threshold)> {
        let config = CueConfig::default();
        (1..duration)
            .rev()
            .filter_map(|r| threshold(&config, phase, duration, r).map(|t| (r, t)))
            .collect()
    }

    #[test]
    fn eccentric_schedule_is_halfway_then_warnings() {
        assert_eq!(
            schedule(PhaseKind::Eccentric, 30),
            vec![
                (15, Threshold::Halfway),
                (10, Threshold::Warning(10)),
                (5, Threshold::Warning(5)),
            ]
        );
    }

    #[test]
    fn warning_beats_halfway_on_same_second() {
        assert_eq!(
            schedule(PhaseKind::Concentric, 10),
            vec![(5, Threshold::Warning(5))]
        );
    }

    #[test]
    fn warning_never_fires_at_phase_entry() {
        let config = CueConfig::default();
        assert_eq!(threshold(&config, PhaseKind::Eccentric, 10, 10), None);
    }

    #[test]
    fn prep_and_positioning_stay_quiet() {
        assert!(schedule(PhaseKind::Prep, 30).is_empty());
        assert!(schedule(PhaseKind::Positioning, 15).is_empty());
    }

    #[test]
    fn rest_schedule() {
        assert_eq!(
            schedule(PhaseKind::Rest, 90),
            vec![(45, Threshold::RestMidpoint), (10, Threshold::RestEnding)]
        );
    }

    #[test]
    fn rest_ending_needs_a_next_exercise() {
        let mut dispatcher = CueDispatcher::seeded(CueConfig::default(), 7);
        assert_eq!(
            dispatcher.on_rest_tick(90, 10, true).map(|c| c.key),
            Some(pools::REST_NEXT_COMING)
        );
        assert_eq!(dispatcher.on_rest_tick(90, 10, false), None);
        assert_eq!(
            dispatcher.on_rest_tick(90, 45, false).map(|c| c.key),
            Some(pools::REST_BREATHE)
        );
    }

    #[test]
    fn entry_cues_are_distinct_per_phase() {
        let dispatcher = CueDispatcher::seeded(CueConfig::default(), 7);
        let keys: Vec<_> = [
            PhaseKind::Prep,
            PhaseKind::Positioning,
            PhaseKind::Eccentric,
            PhaseKind::Concentric,
            PhaseKind::FinalEccentric,
            PhaseKind::Complete,
            PhaseKind::Rest,
        ]
        .into_iter()
        .map(|p| dispatcher.on_enter(p).key)
        .collect();
        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(keys.len(), 7);
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn halfway_draws_from_phase_pool() {
        let config = CueConfig {
            encouragement_chance: 0.0,
            ..CueConfig::default()
        };
        let mut dispatcher = CueDispatcher::seeded(config, 42);
        for _ in 0..20 {
            let cue = dispatcher.on_tick(PhaseKind::FinalEccentric, 40, 20).unwrap();
            assert_eq!(cue.category, CueCategory::Coaching);
            assert!(pools::FINAL_ECCENTRIC.contains(&cue.key));
        }
    }

    #[test]
    fn full_encouragement_chance_always_encourages() {
        let config = CueConfig {
            encouragement_chance: 1.0,
            ..CueConfig::default()
        };
        let mut dispatcher = CueDispatcher::seeded(config, 42);
        let cue = dispatcher.on_tick(PhaseKind::Eccentric, 30, 15).unwrap();
        assert_eq!(cue.category, CueCategory::Encouragement);
        assert!(pools::ENCOURAGEMENT.contains(&cue.key));
    }

    #[test]
    fn same_seed_same_selection() {
        let mut a = CueDispatcher::seeded(CueConfig::default(), 99);
        let mut b = CueDispatcher::seeded(CueConfig::default(), 99);
        for _ in 0..10 {
            assert_eq!(
                a.on_tick(PhaseKind::Eccentric, 30, 15),
                b.on_tick(PhaseKind::Eccentric, 30, 15)
            );
        }
    }

    #[test]
    fn warning_keys_cover_known_marks() {
        assert_eq!(warning_key(10), pools::TIME_10_SEC);
        assert_eq!(warning_key(5), pools::TIME_5_SEC);
        assert_eq!(warning_key(3), pools::TIME_ALMOST);
    }
}

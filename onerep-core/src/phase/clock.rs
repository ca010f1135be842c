//! Cooperative countdown used for every timed phase.
//!
//! The clock owns no timer. Whoever drives the session delivers one tick per
//! second together with the [`ClockToken`] the tick was scheduled for. Every
//! `start`, `cancel` and expiry moves the clock to a new generation, so a tick
//! that was issued for an earlier countdown is rejected as stale instead of
//! mutating the current one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStart {
    Running(ClockToken),
    /// Zero-length countdown: expired on the spot, no tick will follow.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Stale,
    Paused,
    Ticked { remaining: u32 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Idle,
    Running,
    Paused,
}

#[derive(Debug)]
pub struct PhaseClock {
    generation: u64,
    duration: u32,
    remaining: u32,
    status: Status,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseClock {
    pub fn new() -> Self {
        PhaseClock {
            generation: 0,
            duration: 0,
            remaining: 0,
            status: Status::Idle,
        }
    }

    /// Start a fresh countdown, invalidating whatever ran before.
    pub fn start(&mut self, duration: u32) -> ClockStart {
        self.generation = self.generation.wrapping_add(1);
        self.duration = duration;
        self.remaining = duration;
        if duration == 0 {
            self.status = Status::Idle;
            return ClockStart::Expired;
        }
        self.status = Status::Running;
        ClockStart::Running(ClockToken(self.generation))
    }

    pub fn pause(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.status = Status::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != Status::Paused {
            return false;
        }
        self.status = Status::Running;
        true
    }

    pub fn toggle(&mut self) -> bool {
        match self.status {
            Status::Running => self.pause(),
            Status::Paused => self.resume(),
            Status::Idle => false,
        }
    }

    /// Drop the countdown without expiring it.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.duration = 0;
        self.remaining = 0;
        self.status = Status::Idle;
    }

    /// Back to the full duration, paused. Keeps the current token valid.
    pub fn reset(&mut self) -> bool {
        if self.status == Status::Idle {
            return false;
        }
        self.remaining = self.duration;
        self.status = Status::Paused;
        true
    }

    pub fn token(&self) -> Option<ClockToken> {
        match self.status {
            Status::Idle => None,
            Status::Running | Status::Paused => Some(ClockToken(self.generation)),
        }
    }

    pub fn tick(&mut self, token: ClockToken) -> TickOutcome {
        if token.0 != self.generation || self.status == Status::Idle {
            return TickOutcome::Stale;
        }
        if self.status == Status::Paused {
            return TickOutcome::Paused;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return TickOutcome::Ticked {
                remaining: self.remaining,
            };
        }
        self.generation = self.generation.wrapping_add(1);
        self.status = Status::Idle;
        TickOutcome::Expired
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(clock: &mut PhaseClock, duration: u32) -> ClockToken {
        match clock.start(duration) {
            ClockStart::Running(token) => token,
            ClockStart::Expired => panic!("{duration}s countdown expired at start"),
        }
    }

    #[test]
    fn counts_down_and_expires_on_last_tick() {
        let mut clock = PhaseClock::new();
        let token = running(&mut clock, 3);
        assert_eq!(clock.tick(token), TickOutcome::Ticked { remaining: 2 });
        assert_eq!(clock.tick(token), TickOutcome::Ticked { remaining: 1 });
        assert_eq!(clock.tick(token), TickOutcome::Expired);
        assert_eq!(clock.tick(token), TickOutcome::Stale);
        assert_eq!(clock.token(), None);
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let mut clock = PhaseClock::new();
        assert_eq!(clock.start(0), ClockStart::Expired);
        assert_eq!(clock.token(), None);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn pause_holds_remaining_time() {
        let mut clock = PhaseClock::new();
        let token = running(&mut clock, 30);
        clock.tick(token);
        clock.tick(token);
        assert!(clock.pause());
        for _ in 0..10 {
            assert_eq!(clock.tick(token), TickOutcome::Paused);
        }
        assert!(clock.resume());
        assert_eq!(clock.remaining(), 28);
        assert_eq!(clock.tick(token), TickOutcome::Ticked { remaining: 27 });
    }

    #[test]
    fn cancelled_token_is_stale() {
        let mut clock = PhaseClock::new();
        let old = running(&mut clock, 10);
        clock.cancel();
        let new = running(&mut clock, 10);
        assert_eq!(clock.tick(old), TickOutcome::Stale);
        assert_eq!(clock.remaining(), 10);
        assert_eq!(clock.tick(new), TickOutcome::Ticked { remaining: 9 });
    }

    #[test]
    fn reset_restores_full_duration_paused() {
        let mut clock = PhaseClock::new();
        let token = running(&mut clock, 20);
        clock.tick(token);
        assert!(clock.reset());
        assert_eq!(clock.remaining(), 20);
        assert!(clock.is_paused());
        assert!(clock.toggle());
        assert_eq!(clock.tick(token), TickOutcome::Ticked { remaining: 19 });
    }

    #[test]
    fn idle_clock_ignores_controls() {
        let mut clock = PhaseClock::new();
        assert!(!clock.pause());
        assert!(!clock.resume());
        assert!(!clock.toggle());
        assert!(!clock.reset());
    }
}

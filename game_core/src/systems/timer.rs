/// Round clock: whole seconds left, ticked once per second while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    pub remaining: u32,
}

impl RoundClock {
    pub fn new(time_limit: u32) -> Self {
        Self {
            remaining: time_limit,
        }
    }

    /// One second elapsed. Returns true when the clock has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

/// What the countdown overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Show(u8),
    Start,
    Done,
}

/// Lead-in countdown: 5, 4, 3, 2, 1, START, one second each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u8,
    finished: bool,
}

impl Countdown {
    pub fn new(from: u8) -> Self {
        Self {
            remaining: from,
            finished: false,
        }
    }

    pub fn current(&self) -> CountdownStep {
        if self.finished {
            CountdownStep::Done
        } else if self.remaining > 0 {
            CountdownStep::Show(self.remaining)
        } else {
            CountdownStep::Start
        }
    }

    /// One display unit elapsed
    pub fn tick(&mut self) -> CountdownStep {
        if self.remaining > 0 {
            self.remaining -= 1;
        } else {
            self.finished = true;
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_expires_at_zero() {
        let mut clock = RoundClock::new(2);
        assert!(!clock.tick());
        assert!(clock.tick());
        assert!(clock.tick(), "Stays expired");
        assert_eq!(clock.remaining, 0);
    }

    #[test]
    fn test_countdown_sequence() {
        let mut countdown = Countdown::new(5);
        let mut seen = vec![countdown.current()];
        while countdown.current() != CountdownStep::Done {
            seen.push(countdown.tick());
        }
        assert_eq!(
            seen,
            vec![
                CountdownStep::Show(5),
                CountdownStep::Show(4),
                CountdownStep::Show(3),
                CountdownStep::Show(2),
                CountdownStep::Show(1),
                CountdownStep::Start,
                CountdownStep::Done,
            ]
        );
    }
}

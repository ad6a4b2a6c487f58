use std::fmt;

/// Running score for a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub total: u32, // never negative
    pub combo: u32, // consecutive hits
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hit worth `points` and extend the combo
    pub fn record_hit(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
        self.combo += 1;
    }

    /// Subtract a miss penalty (floored at zero) and break the combo
    pub fn record_miss(&mut self, penalty: u32) {
        self.total = self.total.saturating_sub(penalty);
        self.combo = 0;
    }
}

/// Result of judging one vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Hit { points: u32 },
    Miss { penalty: u32 },
}

impl Feedback {
    pub fn is_hit(&self) -> bool {
        matches!(self, Feedback::Hit { .. })
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Hit { points } => write!(f, "Perfect! +{points}"),
            Feedback::Miss { penalty } => write!(f, "Miss... -{penalty}"),
        }
    }
}

/// Completion report handed to the presentation layer, once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub base_score: u32,
    pub time_bonus: u32,
}

impl RoundReport {
    pub fn final_score(&self) -> u32 {
        self.base_score.saturating_add(self.time_bonus)
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

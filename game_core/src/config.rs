use crate::Difficulty;

/// Per-tier round rules
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyConfig {
    pub label: &'static str,
    pub time_limit: u32,     // seconds
    pub target_score: u32,   // success threshold for the final score
    pub bonus_per_second: u32, // time bonus per unused second
}

/// Per-tier pour feel and HUD flags
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    pub tolerance: f64, // fraction of capacity judged as a hit
    pub speed: f64,     // fill units per second held
    pub show_ticks: bool,
    pub show_numbers: bool,
    pub show_target: bool,
}

impl DifficultyConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                label: "易",
                time_limit: 60,
                target_score: 2800,
                bonus_per_second: 25,
            },
            Difficulty::Normal => Self {
                label: "並",
                time_limit: 50,
                target_score: 3290,
                bonus_per_second: 50,
            },
            Difficulty::Hard => Self {
                label: "難",
                time_limit: 40,
                target_score: 3640,
                bonus_per_second: 75,
            },
        }
    }
}

impl ModeConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                tolerance: 0.05,
                speed: 30.0,
                show_ticks: true,
                show_numbers: true,
                show_target: true,
            },
            Difficulty::Normal => Self {
                tolerance: 0.03,
                speed: 50.0,
                show_ticks: true,
                show_numbers: true,
                show_target: true,
            },
            Difficulty::Hard => Self {
                tolerance: 0.02,
                speed: 70.0,
                show_ticks: false,
                show_numbers: false,
                show_target: false,
            },
        }
    }
}

/// Game configuration for one round
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub difficulty: Difficulty,
    pub rules: DifficultyConfig,
    pub mode: ModeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Easy)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rules: DifficultyConfig::for_difficulty(difficulty),
            mode: ModeConfig::for_difficulty(difficulty),
        }
    }

    /// Override the round length (tests and practice rounds)
    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.rules.time_limit = seconds;
        self
    }

    /// Time bonus for the seconds left on the clock
    pub fn time_bonus(&self, time_remaining: u32) -> u32 {
        time_remaining.saturating_mul(self.rules.bonus_per_second)
    }
}

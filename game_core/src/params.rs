/// Game tuning parameters for the pour game
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Countdown
    pub const COUNTDOWN_FROM: u8 = 5; // 5, 4, 3, 2, 1, START
    pub const COUNTDOWN_TICK_MS: f64 = 1000.0;

    // Round timer
    pub const ROUND_TICK_MS: f64 = 1000.0;

    // Pour
    pub const OVERFILL_FACTOR: f64 = 1.5; // fill headroom past capacity
    pub const FRAME_MS: f64 = 1000.0 / 60.0; // simulated frame cadence

    // Judging
    pub const COMBO_BONUS: u32 = 100; // per combo step on a hit
    pub const MISS_PENALTY_FACTOR: f64 = 0.5;
    pub const FEEDBACK_MS: f64 = 1500.0;

    // Leaderboard
    pub const LEADERBOARD_SIZE: usize = 10;
    pub const NAME_MIN_CHARS: usize = 1;
    pub const NAME_MAX_CHARS: usize = 16;
    pub const LEADERBOARD_KEY: &'static str = "sasagane_leaderboard";
}

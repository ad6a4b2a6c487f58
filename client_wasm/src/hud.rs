//! Read-only views handed to the page

use game_core::{CountdownStep, Phase, ResultSummary, Round};
use wasm_bindgen::prelude::*;

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Countdown => "countdown",
        Phase::Playing => "playing",
        Phase::Judging => "judging",
        Phase::Ended => "ended",
    }
}

/// Everything the gameplay screen draws for one frame
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct Hud {
    phase: &'static str,
    countdown: String,
    time_remaining: u32,
    score: u32,
    combo: u32,
    vessel_number: u32,
    vessel_count: u32,
    capacity: f64,
    fill: f64,
    fill_percent: f64,
    target_percent: f64,
    pouring: bool,
    feedback: String,
    feedback_hit: bool,
    show_ticks: bool,
    show_numbers: bool,
    show_target: bool,
}

impl Hud {
    pub fn snapshot(round: &Round) -> Self {
        let vessel = round.vessel();
        let max_fill = vessel.max_fill();
        let mode = &round.config().mode;
        let feedback = round.feedback();

        Self {
            phase: phase_name(round.phase()),
            countdown: match round.countdown() {
                CountdownStep::Show(n) => n.to_string(),
                CountdownStep::Start => "START".to_string(),
                CountdownStep::Done => String::new(),
            },
            time_remaining: round.time_remaining(),
            score: round.score(),
            combo: round.combo(),
            vessel_number: round.vessel_index() as u32 + 1,
            vessel_count: round.vessel_count() as u32,
            capacity: vessel.capacity,
            fill: round.fill(),
            fill_percent: round.fill() / max_fill * 100.0,
            target_percent: vessel.capacity / max_fill * 100.0,
            pouring: round.is_pouring(),
            feedback: feedback.map(|f| f.to_string()).unwrap_or_default(),
            feedback_hit: feedback.is_some_and(|f| f.is_hit()),
            show_ticks: mode.show_ticks,
            show_numbers: mode.show_numbers,
            show_target: mode.show_target,
        }
    }
}

#[wasm_bindgen]
impl Hud {
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.phase.to_string()
    }

    /// "5" .. "1", "START", or empty once play begins
    #[wasm_bindgen(getter)]
    pub fn countdown(&self) -> String {
        self.countdown.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[wasm_bindgen(getter)]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// 1-based
    #[wasm_bindgen(getter)]
    pub fn vessel_number(&self) -> u32 {
        self.vessel_number
    }

    #[wasm_bindgen(getter)]
    pub fn vessel_count(&self) -> u32 {
        self.vessel_count
    }

    #[wasm_bindgen(getter)]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    #[wasm_bindgen(getter)]
    pub fn fill(&self) -> f64 {
        self.fill
    }

    /// Liquid height as a share of the drawn vessel (which holds the overfill)
    #[wasm_bindgen(getter)]
    pub fn fill_percent(&self) -> f64 {
        self.fill_percent
    }

    #[wasm_bindgen(getter)]
    pub fn target_percent(&self) -> f64 {
        self.target_percent
    }

    #[wasm_bindgen(getter)]
    pub fn pouring(&self) -> bool {
        self.pouring
    }

    #[wasm_bindgen(getter)]
    pub fn feedback(&self) -> String {
        self.feedback.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn feedback_hit(&self) -> bool {
        self.feedback_hit
    }

    #[wasm_bindgen(getter)]
    pub fn show_ticks(&self) -> bool {
        self.show_ticks
    }

    #[wasm_bindgen(getter)]
    pub fn show_numbers(&self) -> bool {
        self.show_numbers
    }

    #[wasm_bindgen(getter)]
    pub fn show_target(&self) -> bool {
        self.show_target
    }
}

/// Result screen contents
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct ResultView {
    summary: ResultSummary,
}

impl From<ResultSummary> for ResultView {
    fn from(summary: ResultSummary) -> Self {
        Self { summary }
    }
}

#[wasm_bindgen]
impl ResultView {
    #[wasm_bindgen(getter)]
    pub fn difficulty(&self) -> String {
        self.summary.difficulty.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn label(&self) -> String {
        self.summary.label().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn base_score(&self) -> u32 {
        self.summary.base_score
    }

    #[wasm_bindgen(getter)]
    pub fn time_bonus(&self) -> u32 {
        self.summary.time_bonus
    }

    #[wasm_bindgen(getter)]
    pub fn final_score(&self) -> u32 {
        self.summary.final_score
    }

    #[wasm_bindgen(getter)]
    pub fn target_score(&self) -> u32 {
        self.summary.target_score
    }

    #[wasm_bindgen(getter)]
    pub fn achieved(&self) -> bool {
        self.summary.achieved
    }

    #[wasm_bindgen(getter)]
    pub fn dialogue(&self) -> String {
        self.summary.dialogue.to_string()
    }
}

/// Outcome of a leaderboard save
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct SaveResult {
    updated: bool,
    message: &'static str,
}

impl From<game_core::SaveOutcome> for SaveResult {
    fn from(outcome: game_core::SaveOutcome) -> Self {
        Self {
            updated: outcome.updated,
            message: outcome.message,
        }
    }
}

#[wasm_bindgen]
impl SaveResult {
    #[wasm_bindgen(getter)]
    pub fn updated(&self) -> bool {
        self.updated
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.to_string()
    }
}

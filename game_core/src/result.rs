use crate::dialogue::result_lines;
use crate::{Difficulty, DifficultyConfig, RoundReport};

/// What the result screen shows for a finished round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub difficulty: Difficulty,
    pub base_score: u32,
    pub time_bonus: u32,
    pub final_score: u32,
    pub target_score: u32,
    pub achieved: bool,
    pub dialogue: &'static str,
}

impl ResultSummary {
    pub fn new(difficulty: Difficulty, report: RoundReport) -> Self {
        let rules = DifficultyConfig::for_difficulty(difficulty);
        let final_score = report.final_score();
        let achieved = final_score >= rules.target_score;
        let lines = result_lines(difficulty);

        Self {
            difficulty,
            base_score: report.base_score,
            time_bonus: report.time_bonus,
            final_score,
            target_score: rules.target_score,
            achieved,
            dialogue: if achieved { lines.achieve } else { lines.fail },
        }
    }

    /// Difficulty label for the flavor-text prompt
    pub fn label(&self) -> &'static str {
        DifficultyConfig::for_difficulty(self.difficulty).label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_reached_exactly() {
        let summary = ResultSummary::new(
            Difficulty::Easy,
            RoundReport {
                base_score: 2300,
                time_bonus: 500,
            },
        );
        assert_eq!(summary.final_score, 2800);
        assert!(summary.achieved, "Meeting the target counts");
        assert_eq!(summary.dialogue, result_lines(Difficulty::Easy).achieve);
    }

    #[test]
    fn test_target_missed() {
        let summary = ResultSummary::new(
            Difficulty::Hard,
            RoundReport {
                base_score: 3000,
                time_bonus: 0,
            },
        );
        assert!(!summary.achieved);
        assert_eq!(summary.target_score, 3640);
        assert_eq!(summary.dialogue, result_lines(Difficulty::Hard).fail);
        assert_eq!(summary.label(), "難");
    }
}

use crate::{Feedback, Params, Score, Vessel};

/// A pour is a hit when it lands within `capacity * tolerance` of capacity
pub fn is_hit(fill: f64, vessel: &Vessel, tolerance: f64) -> bool {
    (fill - vessel.capacity).abs() <= vessel.capacity * tolerance
}

/// Points for a hit, using the combo count before this hit
pub fn hit_points(vessel: &Vessel, combo: u32) -> u32 {
    vessel
        .base
        .saturating_add(Params::COMBO_BONUS.saturating_mul(combo))
}

/// Penalty for a miss: half the base value scaled by how far off the pour was
pub fn miss_penalty(fill: f64, vessel: &Vessel) -> u32 {
    let miss_ratio = (fill - vessel.capacity).abs() / vessel.capacity;
    let penalty = f64::from(vessel.base) * Params::MISS_PENALTY_FACTOR * miss_ratio;
    // Halves round up
    (penalty + 0.5).floor() as u32
}

/// Judge one vessel attempt
pub fn judge(fill: f64, vessel: &Vessel, tolerance: f64, combo: u32) -> Feedback {
    if is_hit(fill, vessel, tolerance) {
        Feedback::Hit {
            points: hit_points(vessel, combo),
        }
    } else {
        Feedback::Miss {
            penalty: miss_penalty(fill, vessel),
        }
    }
}

/// Apply a judgement to the running score
pub fn apply_judgement(score: &mut Score, feedback: Feedback) {
    match feedback {
        Feedback::Hit { points } => score.record_hit(points),
        Feedback::Miss { penalty } => score.record_miss(penalty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VESSELS;

    #[test]
    fn test_exact_pour_is_always_a_hit() {
        for vessel in VESSELS.iter() {
            for tolerance in [0.0001, 0.02, 0.03, 0.05, 1.0] {
                assert!(
                    is_hit(vessel.capacity, vessel, tolerance),
                    "cap {} tol {}",
                    vessel.capacity,
                    tolerance
                );
            }
        }
    }

    #[test]
    fn test_tolerance_boundary() {
        let vessel = Vessel::new(20.0, 20);
        assert!(is_hit(20.5, &vessel, 0.05));
        assert!(is_hit(19.0, &vessel, 0.05), "Edge of the window counts");
        assert!(!is_hit(21.2, &vessel, 0.05));
    }

    #[test]
    fn test_hit_points_use_combo_before_increment() {
        let vessel = Vessel::new(60.0, 60);
        assert_eq!(hit_points(&vessel, 0), 60);
        assert_eq!(hit_points(&vessel, 3), 360);

        let mut score = Score::new();
        let first = judge(60.0, &vessel, 0.03, score.combo);
        apply_judgement(&mut score, first);
        let second = judge(60.0, &vessel, 0.03, score.combo);
        assert_eq!(second, Feedback::Hit { points: 160 });
    }

    #[test]
    fn test_hit_points_monotonic_in_combo() {
        let vessel = Vessel::new(80.0, 80);
        let mut previous = 0;
        for combo in 0..10 {
            let points = hit_points(&vessel, combo);
            assert!(points >= previous);
            previous = points;
        }
    }

    #[test]
    fn test_miss_penalty() {
        let vessel = Vessel::new(40.0, 40);
        // diff 10 -> ratio 0.25 -> 40 * 0.5 * 0.25 = 5
        assert_eq!(miss_penalty(30.0, &vessel), 5);
        // empty vessel -> ratio 1 -> 20
        assert_eq!(miss_penalty(0.0, &vessel), 20);
        // 40 * 0.5 * 0.025 = 0.5 rounds up
        assert_eq!(miss_penalty(41.0, &vessel), 1);
    }

    #[test]
    fn test_miss_penalty_monotonic_in_diff() {
        let vessel = Vessel::new(100.0, 100);
        let mut previous = 0;
        for step in 0..=150 {
            let fill = 100.0 + f64::from(step);
            let penalty = miss_penalty(fill, &vessel);
            assert!(penalty >= previous, "penalty dropped at fill {fill}");
            previous = penalty;
        }
    }

    #[test]
    fn test_miss_resets_combo_and_floors_score() {
        let vessel = Vessel::new(100.0, 100);
        let mut score = Score { total: 10, combo: 4 };
        let feedback = judge(0.0, &vessel, 0.02, score.combo);
        assert_eq!(feedback, Feedback::Miss { penalty: 50 });
        apply_judgement(&mut score, feedback);
        assert_eq!(score, Score { total: 0, combo: 0 });
    }
}

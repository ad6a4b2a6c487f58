use game_core::store::{FixedClock, MemoryStore};
use game_core::systems::{judge, miss_penalty};
use game_core::*;

const COUNTDOWN_MS: f64 = 6000.0;

/// Start a round and run it through the countdown
fn playing_round(config: Config, vessels: VesselLine) -> (Round, SimScheduler) {
    let mut sim = SimScheduler::with_frame_ms(10.0);
    let mut round = Round::start_with_vessels(config, vessels, &mut sim);
    round.run_until(&mut sim, COUNTDOWN_MS);
    assert_eq!(round.phase(), Phase::Playing);
    (round, sim)
}

/// Hold for `hold_ms`, release, and wait out the feedback pause
fn pour(round: &mut Round, sim: &mut SimScheduler, hold_ms: f64) -> Option<RoundReport> {
    let t = sim.now_ms();
    assert!(round.press(t, sim));
    round.run_until(sim, t + hold_ms);
    assert!(round.release(sim));
    round.run_until(sim, t + hold_ms + Params::FEEDBACK_MS)
}

#[test]
fn test_easy_hit_then_miss() {
    let easy = Config::for_difficulty(Difficulty::Easy);

    // 20.5 into the 20 cup is within 5%
    let hit = judge(20.5, &VESSELS[0], easy.mode.tolerance, 0);
    assert_eq!(hit, Feedback::Hit { points: 20 });

    // 30 into the 40 cup: 25% off, penalty floor(40 * 0.5 * 0.25 + 0.5)
    let miss = judge(30.0, &VESSELS[1], easy.mode.tolerance, 1);
    assert_eq!(miss, Feedback::Miss { penalty: 5 });
    assert_eq!(miss_penalty(30.0, &VESSELS[1]), 5);

    let (mut round, mut sim) = playing_round(easy, VesselLine::new());

    // 30 units/s for ~0.68 s fills about 20.4
    pour(&mut round, &mut sim, 680.0);
    assert_eq!(round.score(), 20);
    assert_eq!(round.combo(), 1);
    assert_eq!(round.vessel_index(), 1);

    // 1 s gives 30 into the 40 cup
    pour(&mut round, &mut sim, 1000.0);
    assert_eq!(round.score(), 15);
    assert_eq!(round.combo(), 0);
    assert_eq!(round.vessel_index(), 2);
}

#[test]
fn test_final_vessel_counted_once() {
    let config = Config::for_difficulty(Difficulty::Easy);
    let line = VesselLine::from_vessels(vec![Vessel::new(20.0, 20)]);
    let (mut round, mut sim) = playing_round(config.clone(), line);

    let report = pour(&mut round, &mut sim, 680.0).expect("round ends after the last vessel");

    assert_eq!(round.phase(), Phase::Ended);
    assert_eq!(report.base_score, 20);
    assert_eq!(report.base_score, round.score(), "Last hit is not added twice");
    assert_eq!(report.time_bonus, config.time_bonus(config.rules.time_limit));
    assert_eq!(report.final_score(), 20 + 60 * 25);
}

#[test]
fn test_timer_expiry_ends_round_without_bonus() {
    let config = Config::for_difficulty(Difficulty::Normal).with_time_limit(3);
    let (mut round, mut sim) = playing_round(config, VesselLine::new());

    // One quick hit on the 20 cup at 50 units/s
    pour(&mut round, &mut sim, 400.0);
    let earned = round.score();
    assert!(earned > 0);

    let report = round
        .run_until(&mut sim, COUNTDOWN_MS + 10_000.0)
        .expect("clock runs out");
    assert_eq!(report.time_bonus, 0);
    assert_eq!(report.base_score, earned);
    assert_eq!(round.phase(), Phase::Ended);
    assert_eq!(sim.pending_count(), 0);

    // Report is emitted once
    assert_eq!(round.run_until(&mut sim, COUNTDOWN_MS + 60_000.0), None);
    assert_eq!(round.report(), Some(report));
}

#[test]
fn test_score_never_negative() {
    let config = Config::for_difficulty(Difficulty::Hard);
    let (mut round, mut sim) = playing_round(config, VesselLine::new());

    // Tap-release leaves the cup empty: a miss with nothing to lose
    pour(&mut round, &mut sim, 0.0);
    assert_eq!(round.score(), 0);
    assert_eq!(round.combo(), 0);
}

#[test]
fn test_full_round_to_leaderboard() {
    let config = Config::for_difficulty(Difficulty::Easy);
    let (mut round, mut sim) = playing_round(config, VesselLine::new());

    // Hold each cup for capacity / 30 seconds, rounded to the frame
    let mut report = None;
    for vessel in VESSELS {
        let hold = (vessel.capacity / 30.0 * 1000.0 / 10.0).round() * 10.0;
        report = pour(&mut round, &mut sim, hold);
    }
    let report = report.expect("five vessels end the round");
    assert_eq!(report.base_score, round.score());

    let summary = ResultSummary::new(Difficulty::Easy, report);
    assert_eq!(summary.final_score, report.final_score());
    assert_eq!(summary.achieved, summary.final_score >= 2800);

    let mut board = Leaderboard::new(MemoryStore::new(), FixedClock::new(1_700_000_000_000));
    let outcome = board.save_score("酒", summary.final_score, Difficulty::Easy);
    assert!(outcome.updated);
    assert_eq!(outcome.message, "ランキングに登録しました！");

    let top = board.scores(Difficulty::Easy);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].score, summary.final_score);
    assert_eq!(top[0].at, Some(1_700_000_000_000));
    assert!(board.scores(Difficulty::Hard).is_empty());
}

#[test]
fn test_one_result_saved_under_two_names() {
    let report = RoundReport {
        base_score: 1500,
        time_bonus: 400,
    };
    let summary = ResultSummary::new(Difficulty::Normal, report);
    let mut board = Leaderboard::new(MemoryStore::new(), FixedClock::ticking(0, 1));

    assert!(board.save_score("hana", summary.final_score, summary.difficulty).updated);
    assert!(board.save_score("tsuki", summary.final_score, summary.difficulty).updated);

    let again = board.save_score("HANA", summary.final_score, summary.difficulty);
    assert_eq!(again.status, SaveStatus::NotBeaten, "Same name, same score");

    let top = board.scores(Difficulty::Normal);
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|e| e.score == 1900));
}

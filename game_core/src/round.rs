//! One play session: countdown, pour/judge loop, round clock, completion report.

use crate::phase::{Phase, PhaseAction, PhaseMachine};
use crate::scheduler::{Cadence, Scheduler, SimScheduler, Task, TaskId};
use crate::systems::*;
use crate::{Config, Feedback, Params, RoundReport, Score, Vessel, VesselLine};

/// Outstanding scheduler handles, one slot per kind of task
#[derive(Debug, Clone, Copy, Default)]
struct TaskHandles {
    countdown: Option<TaskId>,
    timer: Option<TaskId>,
    frame: Option<TaskId>,
    feedback: Option<TaskId>,
}

impl TaskHandles {
    fn cancel(slot: &mut Option<TaskId>, scheduler: &mut dyn Scheduler) {
        if let Some(id) = slot.take() {
            scheduler.cancel(id);
        }
    }

    fn cancel_all(&mut self, scheduler: &mut dyn Scheduler) {
        Self::cancel(&mut self.countdown, scheduler);
        Self::cancel(&mut self.timer, scheduler);
        Self::cancel(&mut self.frame, scheduler);
        Self::cancel(&mut self.feedback, scheduler);
    }
}

/// Round state
pub struct Round {
    config: Config,
    vessels: VesselLine,
    fsm: PhaseMachine,
    countdown: Countdown,
    clock: RoundClock,
    score: Score,
    pour: Pour,
    vessel_index: usize,
    feedback: Option<Feedback>,
    report: Option<RoundReport>,
    tasks: TaskHandles,
}

impl Round {
    /// Start a round with the standard vessel sequence
    pub fn start(config: Config, scheduler: &mut dyn Scheduler) -> Self {
        Self::start_with_vessels(config, VesselLine::new(), scheduler)
    }

    pub fn start_with_vessels(
        config: Config,
        vessels: VesselLine,
        scheduler: &mut dyn Scheduler,
    ) -> Self {
        log::info!(
            "Round: starting difficulty={} time_limit={}s vessels={}",
            config.difficulty,
            config.rules.time_limit,
            vessels.len()
        );

        let mut round = Self {
            clock: RoundClock::new(config.rules.time_limit),
            config,
            vessels,
            fsm: PhaseMachine::new(),
            countdown: Countdown::new(Params::COUNTDOWN_FROM),
            score: Score::new(),
            pour: Pour::new(),
            vessel_index: 0,
            feedback: None,
            report: None,
            tasks: TaskHandles::default(),
        };
        round.tasks.countdown = Some(scheduler.repeat(
            Task::CountdownTick,
            Cadence::Every(Params::COUNTDOWN_TICK_MS),
        ));
        round
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Input pressed. Ignored outside `Playing` or while already pouring.
    pub fn press(&mut self, now_ms: f64, scheduler: &mut dyn Scheduler) -> bool {
        if !self.fsm.is_playing() || self.pour.is_holding() {
            return false;
        }
        self.pour.start(now_ms);
        self.tasks.frame = Some(scheduler.repeat(Task::PourFrame, Cadence::Frame));
        true
    }

    /// Input released: stop pouring and judge the vessel.
    pub fn release(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if !self.fsm.is_playing() || !self.pour.stop() {
            return false;
        }
        TaskHandles::cancel(&mut self.tasks.frame, scheduler);
        TaskHandles::cancel(&mut self.tasks.timer, scheduler);
        self.fsm.transition(PhaseAction::Release);

        let vessel = *self.vessel();
        let feedback = judge(
            self.pour.fill,
            &vessel,
            self.config.mode.tolerance,
            self.score.combo,
        );
        apply_judgement(&mut self.score, feedback);
        log::info!(
            "Round: vessel {} cap={} fill={:.2} -> {} (score={}, combo={})",
            self.vessel_index + 1,
            vessel.capacity,
            self.pour.fill,
            feedback,
            self.score.total,
            self.score.combo
        );

        self.feedback = Some(feedback);
        self.tasks.feedback = Some(scheduler.once(Task::FeedbackDone, Params::FEEDBACK_MS));
        true
    }

    // ------------------------------------------------------------------
    // Scheduled work
    // ------------------------------------------------------------------

    /// Handle a fired task. Returns the completion report the one time the
    /// round ends.
    pub fn on_task(
        &mut self,
        task: Task,
        now_ms: f64,
        scheduler: &mut dyn Scheduler,
    ) -> Option<RoundReport> {
        match (task, self.fsm.phase()) {
            (Task::CountdownTick, Phase::Countdown) => {
                if self.countdown.tick() == CountdownStep::Done {
                    TaskHandles::cancel(&mut self.tasks.countdown, scheduler);
                    self.fsm.transition(PhaseAction::CountdownDone);
                    self.arm_timer(scheduler);
                    log::info!("Round: countdown complete, pouring open");
                }
                None
            }
            (Task::RoundTimerTick, Phase::Playing) => {
                if self.clock.tick() {
                    self.time_up(scheduler)
                } else {
                    None
                }
            }
            (Task::PourFrame, Phase::Playing) => {
                let speed = self.config.mode.speed;
                let vessel = *self.vessel();
                self.pour.sample(now_ms, speed, &vessel);
                None
            }
            (Task::FeedbackDone, Phase::Judging) => {
                self.tasks.feedback = None;
                self.feedback = None;
                if self.vessels.is_last(self.vessel_index) {
                    self.finish(scheduler)
                } else {
                    self.vessel_index += 1;
                    self.pour.reset();
                    self.fsm.transition(PhaseAction::NextVessel);
                    self.arm_timer(scheduler);
                    None
                }
            }
            (task, phase) => {
                log::debug!("Round: ignoring stray {task:?} in {phase:?}");
                None
            }
        }
    }

    /// Cancel every outstanding task (round discarded)
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.tasks.cancel_all(scheduler);
    }

    fn arm_timer(&mut self, scheduler: &mut dyn Scheduler) {
        TaskHandles::cancel(&mut self.tasks.timer, scheduler);
        self.tasks.timer = Some(scheduler.repeat(
            Task::RoundTimerTick,
            Cadence::Every(Params::ROUND_TICK_MS),
        ));
    }

    /// Clock ran out while playing: end now with the score so far
    fn time_up(&mut self, scheduler: &mut dyn Scheduler) -> Option<RoundReport> {
        if self.pour.stop() {
            log::info!(
                "Round: time up mid-pour, discarding fill {:.2}",
                self.pour.fill
            );
        }
        self.fsm.transition(PhaseAction::TimeUp);
        self.end(scheduler)
    }

    /// Last vessel judged
    fn finish(&mut self, scheduler: &mut dyn Scheduler) -> Option<RoundReport> {
        self.fsm.transition(PhaseAction::Finish);
        self.end(scheduler)
    }

    fn end(&mut self, scheduler: &mut dyn Scheduler) -> Option<RoundReport> {
        self.tasks.cancel_all(scheduler);
        if self.report.is_some() {
            return None;
        }
        // The last vessel's delta is already in the running total
        let report = RoundReport {
            base_score: self.score.total,
            time_bonus: self.config.time_bonus(self.clock.remaining),
        };
        log::info!(
            "Round: ended base={} bonus={} final={}",
            report.base_score,
            report.time_bonus,
            report.final_score()
        );
        self.report = Some(report);
        Some(report)
    }

    // ------------------------------------------------------------------
    // Headless driving
    // ------------------------------------------------------------------

    /// Advance a simulated scheduler to `until_ms`, feeding every fired task
    /// to the round. Returns the report if the round ended in that window.
    pub fn run_until(&mut self, sim: &mut SimScheduler, until_ms: f64) -> Option<RoundReport> {
        let mut report = None;
        sim.run_until(until_ms, |s, task, at| {
            if let Some(r) = self.on_task(task, at, s) {
                report = Some(r);
            }
        });
        report
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.fsm.phase()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Countdown overlay value while in `Countdown`
    pub fn countdown(&self) -> CountdownStep {
        self.countdown.current()
    }

    pub fn time_remaining(&self) -> u32 {
        self.clock.remaining
    }

    pub fn score(&self) -> u32 {
        self.score.total
    }

    pub fn combo(&self) -> u32 {
        self.score.combo
    }

    pub fn fill(&self) -> f64 {
        self.pour.fill
    }

    pub fn is_pouring(&self) -> bool {
        self.pour.is_holding()
    }

    pub fn vessel_index(&self) -> usize {
        self.vessel_index
    }

    pub fn vessel_count(&self) -> usize {
        self.vessels.len()
    }

    pub fn vessel(&self) -> &Vessel {
        // vessel_index never passes the last vessel and the line is never empty
        self.vessels
            .get(self.vessel_index)
            .unwrap_or(&crate::VESSELS[0])
    }

    /// Judgement currently on display
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Completion report once the round has ended
    pub fn report(&self) -> Option<RoundReport> {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;

    const COUNTDOWN_MS: f64 = 6000.0;

    fn playing_round(config: Config) -> (Round, SimScheduler) {
        let mut sim = SimScheduler::with_frame_ms(10.0);
        let mut round = Round::start(config, &mut sim);
        round.run_until(&mut sim, COUNTDOWN_MS);
        assert_eq!(round.phase(), Phase::Playing);
        (round, sim)
    }

    #[test]
    fn test_countdown_takes_six_ticks() {
        let mut sim = SimScheduler::new();
        let mut round = Round::start(Config::new(), &mut sim);
        assert_eq!(round.countdown(), CountdownStep::Show(5));
        round.run_until(&mut sim, 5000.0);
        assert_eq!(round.countdown(), CountdownStep::Start);
        assert_eq!(round.phase(), Phase::Countdown);
        round.run_until(&mut sim, COUNTDOWN_MS);
        assert_eq!(round.phase(), Phase::Playing);
        assert!(!sim.is_scheduled(Task::CountdownTick));
        assert!(sim.is_scheduled(Task::RoundTimerTick));
    }

    #[test]
    fn test_press_ignored_during_countdown() {
        let mut sim = SimScheduler::new();
        let mut round = Round::start(Config::new(), &mut sim);
        assert!(!round.press(0.0, &mut sim));
        assert!(!round.release(&mut sim));
        assert!(!sim.is_scheduled(Task::PourFrame));
    }

    #[test]
    fn test_release_judges_and_pauses_clock() {
        let (mut round, mut sim) = playing_round(Config::new());
        let t = sim.now_ms();
        assert!(round.press(t, &mut sim));
        round.run_until(&mut sim, t + 500.0);
        assert!(round.fill() > 14.0);
        assert!(round.release(&mut sim));

        assert_eq!(round.phase(), Phase::Judging);
        assert!(!sim.is_scheduled(Task::PourFrame));
        assert!(!sim.is_scheduled(Task::RoundTimerTick), "Clock paused while judging");
        assert!(round.feedback().is_some());

        let remaining = round.time_remaining();
        round.run_until(&mut sim, t + 500.0 + Params::FEEDBACK_MS);
        assert_eq!(round.phase(), Phase::Playing);
        assert_eq!(round.vessel_index(), 1);
        assert_eq!(round.fill(), 0.0);
        assert_eq!(round.feedback(), None);
        assert_eq!(round.time_remaining(), remaining);
    }

    #[test]
    fn test_clock_counts_down_while_playing() {
        let (mut round, mut sim) = playing_round(Config::new());
        let limit = round.config().rules.time_limit;
        round.run_until(&mut sim, COUNTDOWN_MS + 3000.0);
        assert_eq!(round.time_remaining(), limit - 3);
    }

    #[test]
    fn test_time_up_mid_pour_discards_pour() {
        let config = Config::for_difficulty(Difficulty::Hard).with_time_limit(2);
        let (mut round, mut sim) = playing_round(config);
        round.press(sim.now_ms(), &mut sim);
        let report = round.run_until(&mut sim, COUNTDOWN_MS + 2000.0);

        assert_eq!(
            report,
            Some(RoundReport {
                base_score: 0,
                time_bonus: 0
            })
        );
        assert_eq!(round.phase(), Phase::Ended);
        assert!(!round.is_pouring());
        assert_eq!(sim.pending_count(), 0, "Every task cancelled on exit");
        assert!(!round.release(&mut sim), "Late release is ignored");
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let (mut round, mut sim) = playing_round(Config::new());
        round.press(sim.now_ms(), &mut sim);
        assert!(sim.pending_count() >= 2);
        round.teardown(&mut sim);
        assert_eq!(sim.pending_count(), 0);
    }

    #[test]
    fn test_stray_task_is_ignored() {
        let (mut round, mut sim) = playing_round(Config::new());
        let before = round.phase();
        assert_eq!(round.on_task(Task::FeedbackDone, 0.0, &mut sim), None);
        assert_eq!(round.on_task(Task::CountdownTick, 0.0, &mut sim), None);
        assert_eq!(round.phase(), before);
    }
}

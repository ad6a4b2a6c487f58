//! Round Phase State Machine
//!
//! countdown -> playing -> judging -> (playing | ended), plus playing -> ended
//! when the round clock runs out.

/// Round phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Countdown,
    Playing,
    Judging,
    Ended,
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    CountdownDone,
    Release,
    NextVessel,
    Finish,
    TimeUp,
}

/// Result of a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from: Phase,
    pub to: Phase,
    pub action: PhaseAction,
}

/// Phase machine for one round
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Countdown,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: PhaseAction) -> bool {
        self.next_phase(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: PhaseAction) -> TransitionResult {
        let from = self.phase;

        if let Some(next) = self.next_phase(action) {
            self.phase = next;
            TransitionResult {
                success: true,
                from,
                to: next,
                action,
            }
        } else {
            TransitionResult {
                success: false,
                from,
                to: from,
                action,
            }
        }
    }

    fn next_phase(&self, action: PhaseAction) -> Option<Phase> {
        match (self.phase, action) {
            (Phase::Countdown, PhaseAction::CountdownDone) => Some(Phase::Playing),

            (Phase::Playing, PhaseAction::Release) => Some(Phase::Judging),
            (Phase::Playing, PhaseAction::TimeUp) => Some(Phase::Ended),

            (Phase::Judging, PhaseAction::NextVessel) => Some(Phase::Playing),
            (Phase::Judging, PhaseAction::Finish) => Some(Phase::Ended),

            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase() {
        assert_eq!(PhaseMachine::new().phase(), Phase::Countdown);
    }

    #[test]
    fn test_invalid_transition() {
        let mut fsm = PhaseMachine::new();
        let result = fsm.transition(PhaseAction::Release);
        assert!(!result.success);
        assert_eq!(result.to, Phase::Countdown);
        assert_eq!(fsm.phase(), Phase::Countdown);
    }

    #[test]
    fn test_vessel_loop() {
        let mut fsm = PhaseMachine::new();
        fsm.transition(PhaseAction::CountdownDone);
        for _ in 0..3 {
            assert!(fsm.transition(PhaseAction::Release).success);
            assert_eq!(fsm.phase(), Phase::Judging);
            assert!(fsm.transition(PhaseAction::NextVessel).success);
            assert!(fsm.is_playing());
        }
        fsm.transition(PhaseAction::Release);
        fsm.transition(PhaseAction::Finish);
        assert!(fsm.is_ended());
    }

    #[test]
    fn test_time_up_only_while_playing() {
        let mut fsm = PhaseMachine::new();
        assert!(!fsm.can_transition(PhaseAction::TimeUp));
        fsm.transition(PhaseAction::CountdownDone);
        fsm.transition(PhaseAction::Release);
        assert!(!fsm.can_transition(PhaseAction::TimeUp), "Judging is not preempted");
        fsm.transition(PhaseAction::NextVessel);
        assert!(fsm.transition(PhaseAction::TimeUp).success);
        assert!(fsm.is_ended());
    }

    #[test]
    fn test_ended_is_terminal() {
        let mut fsm = PhaseMachine::new();
        fsm.transition(PhaseAction::CountdownDone);
        fsm.transition(PhaseAction::TimeUp);
        for action in [
            PhaseAction::CountdownDone,
            PhaseAction::Release,
            PhaseAction::NextVessel,
            PhaseAction::Finish,
            PhaseAction::TimeUp,
        ] {
            assert!(!fsm.can_transition(action), "{action:?} out of Ended");
        }
    }
}

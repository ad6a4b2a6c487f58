//! Core rules for Sasagane, the sake-pouring timing game.
//!
//! Everything here is deterministic and platform-free: the round runs off
//! tasks fired by a [`Scheduler`], persistence goes through [`ScoreStore`]
//! and [`Clock`]. The browser client supplies the real implementations.

pub mod config;
pub mod dialogue;
pub mod haiku;
pub mod leaderboard;
pub mod names;
pub mod params;
pub mod phase;
pub mod resources;
pub mod result;
pub mod round;
pub mod scheduler;
pub mod store;
pub mod systems;
pub mod vessels;

pub use config::*;
pub use leaderboard::{Leaderboard, SaveOutcome, SaveStatus};
pub use params::*;
pub use phase::{Phase, PhaseAction, PhaseMachine};
pub use proto::{Difficulty, ScoreEntry};
pub use resources::*;
pub use result::ResultSummary;
pub use round::Round;
pub use scheduler::{Cadence, Scheduler, SimScheduler, Task, TaskId};
pub use store::{Clock, KeyValueStore, KvScoreStore, ScoreStore, StoreError};
pub use systems::CountdownStep;
pub use vessels::*;

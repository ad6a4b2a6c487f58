pub mod judging;
pub mod pour;
pub mod timer;

pub use judging::*;
pub use pour::*;
pub use timer::*;

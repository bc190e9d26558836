pub mod gesture;
pub mod planner;
pub mod range_synth;
pub mod timers;
pub mod week;

pub use planner::{Planner, PlannerOptions};
pub use range_synth::synthesize;
pub use week::{WeekWindow, today};

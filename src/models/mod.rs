pub mod intent;
pub mod session;
pub mod step;
pub mod turn;

pub use intent::Intent;
pub use session::{CallSession, DialogStep};
pub use step::{Gather, InputMode, NextAction, StepDescriptor};
pub use turn::TurnInput;

//! Operator-side control of the match on screen: the countdown and the score buttons.

pub mod console;
pub mod driver;
pub mod score;
pub mod timer;

pub use driver::{TimerCommand, TimerDriver, TimerHandle, TimerNotice, TimerSettings, TimerSnapshot};
pub use score::{Side, adjust_score};
pub use timer::{MatchTimer, SyncWrite, TimerPhase};

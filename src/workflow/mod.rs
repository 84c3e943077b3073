//! The operator's editing workflow: state machine, notices and the controller driving both.

mod controller;
mod notice;
mod state;

pub use controller::*;
pub use notice::*;
pub use state::*;

//! System wiring, startup, and shutdown logic.

pub mod config;
pub mod error;
pub mod product_system;
pub mod telemetry;

pub use config::*;
pub use error::*;
pub use product_system::*;
pub use telemetry::*;

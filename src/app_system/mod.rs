//! System orchestration, startup, and shutdown logic.

pub mod error;
pub mod order_system;
pub mod telemetry;

pub use error::*;
pub use order_system::*;
pub use telemetry::*;

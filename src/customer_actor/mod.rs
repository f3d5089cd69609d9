//! Customer registration and tier handling.

pub mod entity;
pub mod error;

pub use error::*;

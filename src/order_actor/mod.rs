//! Order creation: the order entity and the errors of the placement flow.

pub mod entity;
pub mod error;

pub use error::*;

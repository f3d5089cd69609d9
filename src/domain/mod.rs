pub mod customer;
pub mod product;
pub mod order;

pub use customer::*;
pub use product::*;
pub use order::*;

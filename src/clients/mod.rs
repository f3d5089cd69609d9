//! Typed clients over the generic resource actors.

#[macro_use]
mod macros;

mod customer_client;
mod order_client;
mod product_client;

pub use customer_client::CustomerClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;

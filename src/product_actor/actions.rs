/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond registration and lookup.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Removes a specified amount of stock.
    ///
    /// # Errors
    /// Will fail if the requested amount exceeds available stock.
    ReserveStock(u32),
    /// Adds a specified amount of stock.
    Restock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level
    CheckStock(u32),
    /// Stock left after the reservation
    ReserveStock(u32),
    /// Stock after restocking
    Restock(u32),
}

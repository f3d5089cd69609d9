use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the product
    /// * `params` - Product creation parameters containing name, price, and stock
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, String> {
        if !params.price.is_finite() || params.price < 0.0 {
            return Err(format!("Invalid price: {}", params.price));
        }
        Ok(Self::new(id, params.name, params.price, params.stock))
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `ReserveStock(amount)`: Decrements stock by the specified amount
    /// - `Restock(amount)`: Increments stock by the specified amount
    ///
    /// # Errors
    /// Returns an error if attempting to reserve more stock than available.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(amount) => {
                if self.stock >= amount {
                    self.update_stock(-i64::from(amount));
                    Ok(ProductActionResult::ReserveStock(self.stock))
                } else {
                    Err(format!(
                        "Insufficient stock for {}: {} available, {} requested",
                        self.id, self.stock, amount
                    ))
                }
            }
            ProductAction::Restock(amount) => {
                self.update_stock(i64::from(amount));
                Ok(ProductActionResult::Restock(self.stock))
            }
        }
    }
}

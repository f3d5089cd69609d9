use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Action = (); // Orders are immutable once placed
    type ActionResult = ();

    /// Creates a new Order from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Identifier minted by the order actor
    /// * `params` - Customer reference, line items and the discount in force
    ///
    /// # Notes
    /// Totals are computed here, once, from the captured line items.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        if params.lines.is_empty() {
            return Err("An order needs at least one line item".to_string());
        }
        Ok(Order::new(id, params))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

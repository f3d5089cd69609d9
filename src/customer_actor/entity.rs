use crate::actor_framework::Entity;
use crate::domain::{Customer, CustomerCreate};

impl Entity for Customer {
    type Id = String;
    type CreateParams = CustomerCreate;
    type Action = ();
    type ActionResult = ();

    /// Creates a new Customer from creation parameters.
    fn from_create_params(id: String, params: CustomerCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            tier: params.tier,
        })
    }

    /// Currently, no custom actions are defined for customers.
    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

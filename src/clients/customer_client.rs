use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::customer_actor::CustomerError;
use crate::domain::{Customer, CustomerCreate};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl_basic_client!(CustomerClient, Customer, CustomerError, customer);

impl CustomerClient {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id, tier = %customer.tier))]
    pub async fn register_customer(&self, customer: Customer) -> Result<String, CustomerError> {
        debug!("Sending request");
        let (id, params): (String, CustomerCreate) = customer.into();
        self.inner.register(id, params).await.map_err(CustomerError::from)
    }
}

use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    /// Registers `product` under its own id. Fails with
    /// [`ProductError::AlreadyExists`] when the id is taken.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn register_product(&self, product: Product) -> Result<String, ProductError> {
        debug!("Sending request");
        let (id, params): (String, ProductCreate) = product.into();
        self.inner.register(id, params).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    #[allow(dead_code)]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    #[allow(dead_code)]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::ReserveStock(left) => Ok(left),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    #[allow(dead_code)]
    pub async fn restock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Restock(quantity)).await? {
            ProductActionResult::Restock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Reserves every `(product_id, quantity)` pair, or none of them.
    #[instrument(skip(self))]
    pub async fn reserve_all(&self, reservations: Vec<(String, u32)>) -> Result<(), ProductError> {
        debug!("Sending request");
        let actions = reservations
            .into_iter()
            .map(|(id, quantity)| (id, ProductAction::ReserveStock(quantity)))
            .collect();
        self.inner.perform_batch(actions).await?;
        Ok(())
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}

use tracing::{error, info, instrument};
use crate::actor_framework::ResourceClient;
use crate::clients::{CustomerClient, ProductClient};
use crate::domain::{Order, OrderCreate, OrderDraft};
use crate::order_actor::OrderError;

/// Client for interacting with the Order actor.
///
/// This client handles the placement orchestration: it validates the customer,
/// commits the stock reservations of a draft, and only then records the order.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    customer_client: CustomerClient,
    product_client: ProductClient,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        customer_client: CustomerClient,
        product_client: ProductClient,
    ) -> Self {
        Self {
            inner,
            customer_client,
            product_client,
        }
    }

    #[instrument(skip(self, draft), fields(lines = draft.lines().len()))]
    pub async fn place_order(&self, customer_id: String, draft: OrderDraft) -> Result<Order, OrderError> {
        info!("Processing place_order request");

        // Step 1: Validate customer
        let customer = match self.customer_client.get_customer(customer_id.clone()).await {
            Ok(Some(customer)) => customer,
            Ok(None) => {
                error!("Customer not found");
                return Err(OrderError::InvalidCustomer(customer_id));
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                return Err(OrderError::InvalidCustomer(format!("Customer validation failed: {}", e)));
            }
        };

        if draft.is_empty() {
            return Err(OrderError::ValidationError("Order has no line items".to_string()));
        }

        // Step 2: Reserve stock for every line at once
        if let Err(e) = self.product_client.reserve_all(draft.reservations()).await {
            error!(error = %e, "Stock reservation failed");
            return Err(OrderError::StockReservationFailed(e.to_string()));
        }

        info!("Stock reserved successfully");

        // Step 3: Create order in ResourceActor
        let params = OrderCreate {
            customer_id: customer.id,
            customer_name: customer.name,
            lines: draft.into_lines(),
            discount: customer.tier.discount_rule(),
        };
        let order_id = self.inner.create(params).await?;

        self.get_order(order_id.clone())
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);

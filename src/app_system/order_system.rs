use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use crate::actor_framework::ResourceActor;
use crate::app_system::AppError;
use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::config::{AppConfig, CUSTOMERS_SHEET, PRODUCTS_SHEET};
use crate::customer_actor::CustomerError;
use crate::domain::{Customer, Order, Product};
use crate::product_actor::ProductError;
use crate::record_store::{self, Record};

/// Order ids are `O` followed by the 1-based order count, zero-padded to three
/// digits.
pub fn order_id_for(existing_orders: usize) -> String {
    format!("O{:03}", existing_orders + 1)
}

/// The main application system that owns every actor.
///
/// `start` is the only place state is loaded and `shutdown` the only place it
/// is written back.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub customer_client: CustomerClient,
    pub product_client: ProductClient,
    products_file: PathBuf,
    customers_file: PathBuf,
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    pub async fn start(config: &AppConfig) -> Result<Self, AppError> {
        let product_records = load_records(config.products_file.clone(), PRODUCTS_SHEET).await?;
        let customer_records = load_records(config.customers_file.clone(), CUSTOMERS_SHEET).await?;

        // 1. Customer Service
        let (customer_actor, customer_resource_client) =
            ResourceActor::<Customer>::new(config.channel_capacity);
        let customer_client = CustomerClient::new(customer_resource_client);
        let customer_handle = tokio::spawn(customer_actor.run());

        // 2. Product Service
        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new(config.channel_capacity);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 3. Order Service
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::with_id_generator(config.channel_capacity, order_id_for);
        let order_client = OrderClient::new(
            order_resource_client,
            customer_client.clone(),
            product_client.clone(),
        );
        let order_handle = tokio::spawn(order_actor.run());

        let system = Self {
            order_client,
            customer_client,
            product_client,
            products_file: config.products_file.clone(),
            customers_file: config.customers_file.clone(),
            handles: vec![customer_handle, product_handle, order_handle],
        };

        system.seed_products(&product_records).await?;
        system.seed_customers(&customer_records).await?;

        Ok(system)
    }

    async fn seed_products(&self, records: &[Record]) -> Result<(), AppError> {
        for record in records {
            let product = Product::from_record(record)?;
            match self.product_client.register_product(product).await {
                Ok(_) => {}
                Err(ProductError::AlreadyExists(id)) => {
                    warn!(product_id = %id, "Duplicate product row ignored");
                }
                Err(e) => return Err(e.into()),
            }
        }
        info!(count = records.len(), file = %self.products_file.display(), "Products loaded");
        Ok(())
    }

    async fn seed_customers(&self, records: &[Record]) -> Result<(), AppError> {
        for record in records {
            let customer = Customer::from_record(record)?;
            match self.customer_client.register_customer(customer).await {
                Ok(_) => {}
                Err(CustomerError::AlreadyExists(id)) => {
                    warn!(customer_id = %id, "Duplicate customer row ignored");
                }
                Err(e) => return Err(e.into()),
            }
        }
        info!(count = records.len(), file = %self.customers_file.display(), "Customers loaded");
        Ok(())
    }

    /// Writes products and customers back to their workbooks, then stops every
    /// actor. Orders are not persisted.
    pub async fn shutdown(self) -> Result<(), AppError> {
        info!("Shutting down system...");

        let products: Vec<Record> = self
            .product_client
            .list_products()
            .await?
            .iter()
            .map(Product::to_record)
            .collect();
        let customers: Vec<Record> = self
            .customer_client
            .list_customers()
            .await?
            .iter()
            .map(Customer::to_record)
            .collect();

        save_records(self.products_file.clone(), PRODUCTS_SHEET, products).await?;
        save_records(self.customers_file.clone(), CUSTOMERS_SHEET, customers).await?;

        // Drop clients to close channels; each ResourceActor exits when its
        // channel closes.
        let Self {
            order_client,
            customer_client,
            product_client,
            handles,
            ..
        } = self;
        drop(order_client);
        drop(customer_client);
        drop(product_client);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(AppError::Task(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

async fn load_records(path: PathBuf, sheet: &'static str) -> Result<Vec<Record>, AppError> {
    let records = tokio::task::spawn_blocking(move || record_store::load(&path, sheet))
        .await
        .map_err(|e| AppError::Task(e.to_string()))??;
    Ok(records)
}

async fn save_records(path: PathBuf, sheet: &'static str, records: Vec<Record>) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || record_store::save(&path, sheet, &records))
        .await
        .map_err(|e| AppError::Task(e.to_string()))??;
    Ok(())
}

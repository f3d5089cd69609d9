//! Interactive menu loop.
//!
//! The controller owns the [`OrderSystem`] for the whole session and hands it
//! back to [`OrderSystem::shutdown`] when the operator exits.

use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, instrument, warn};
use crate::app_system::{AppError, OrderSystem};
use crate::customer_actor::CustomerError;
use crate::domain::{Customer, CustomerTier, DraftError, OrderDraft, Product};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

const DONE_SENTINEL: &str = "done";

/// Line-oriented console over any async reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn say(&mut self, text: &str) -> Result<(), AppError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Prints `label` and reads one line, trimmed. End of input is reported
    /// as [`AppError::InputClosed`].
    pub async fn ask(&mut self, label: &str) -> Result<String, AppError> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    async fn ask_parsed<T: FromStr>(
        &mut self,
        label: &str,
        field: &'static str,
        expected: &'static str,
    ) -> Result<T, AppError> {
        let input = self.ask(label).await?;
        input.parse().map_err(|_| AppError::InvalidInput {
            field,
            input,
            expected,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddProduct,
    RegisterCustomer,
    PlaceOrder,
    ViewOrders,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AddProduct),
            "2" => Some(MenuChoice::RegisterCustomer),
            "3" => Some(MenuChoice::PlaceOrder),
            "4" => Some(MenuChoice::ViewOrders),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub struct Controller<R, W> {
    system: OrderSystem,
    console: Console<R, W>,
}

impl<R, W> Controller<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(system: OrderSystem, console: Console<R, W>) -> Self {
        Self { system, console }
    }

    #[allow(dead_code)]
    pub fn system(&self) -> &OrderSystem {
        &self.system
    }

    /// Runs the menu until the operator exits or input ends, then saves.
    ///
    /// Any error returned before that point ends the session without saving.
    pub async fn run(mut self) -> Result<(), AppError> {
        loop {
            self.show_menu().await?;
            let choice = match self.console.ask("Choose an option: ").await {
                Ok(input) => input,
                Err(AppError::InputClosed) => break,
                Err(e) => return Err(e),
            };

            let Some(choice) = MenuChoice::parse(&choice) else {
                self.console.say("Invalid choice. Please try again.").await?;
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            match self.dispatch(choice).await {
                Ok(()) => {}
                Err(AppError::InputClosed) => {
                    info!("Input closed mid-operation");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        self.exit().await
    }

    async fn show_menu(&mut self) -> Result<(), AppError> {
        self.console.say("\nWelcome to the E-Commerce System!").await?;
        self.console.say("1. Add a new product").await?;
        self.console.say("2. Register a new customer").await?;
        self.console.say("3. Place an order").await?;
        self.console.say("4. View order details").await?;
        self.console.say("5. Exit").await
    }

    pub async fn dispatch(&mut self, choice: MenuChoice) -> Result<(), AppError> {
        match choice {
            MenuChoice::AddProduct => self.add_product().await,
            MenuChoice::RegisterCustomer => self.register_customer().await,
            MenuChoice::PlaceOrder => self.place_order().await,
            MenuChoice::ViewOrders => self.view_orders().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_product(&mut self) -> Result<(), AppError> {
        let id = self.console.ask("Enter Product ID: ").await?;
        let name = self.console.ask("Enter Product Name: ").await?;
        let price: f64 = self
            .console
            .ask_parsed("Enter Product Price: ", "price", "a number")
            .await?;
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::InvalidInput {
                field: "price",
                input: price.to_string(),
                expected: "a non-negative number",
            });
        }
        let stock: u32 = self
            .console
            .ask_parsed("Enter Product Stock: ", "stock", "a whole number")
            .await?;

        match self
            .system
            .product_client
            .register_product(Product::new(id, name, price, stock))
            .await
        {
            Ok(id) => {
                info!(product_id = %id, "Product added");
                self.console.say("Product added successfully!").await
            }
            Err(ProductError::AlreadyExists(id)) => {
                warn!(product_id = %id, "Duplicate product id rejected");
                self.console.say("Product ID already exists!").await
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn register_customer(&mut self) -> Result<(), AppError> {
        let id = self.console.ask("Enter Customer ID: ").await?;
        let name = self.console.ask("Enter Customer Name: ").await?;
        let email = self.console.ask("Enter Customer Email: ").await?;
        let premium = self.console.ask("Premium customer? (y/n): ").await?;

        let mut customer = Customer::new(id, name, email);
        if matches!(premium.to_ascii_lowercase().as_str(), "y" | "yes") {
            customer.tier = CustomerTier::Premium;
        }

        match self.system.customer_client.register_customer(customer).await {
            Ok(id) => {
                info!(customer_id = %id, "Customer registered");
                self.console.say("Customer registered successfully!").await
            }
            Err(CustomerError::AlreadyExists(id)) => {
                warn!(customer_id = %id, "Duplicate customer id rejected");
                self.console.say("Customer ID already exists!").await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Collects line items into a draft, then commits stock and the order in
    /// one step. Stock is untouched until the operator types `done`.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<(), AppError> {
        let customer_id = self.console.ask("Enter Customer ID: ").await?;
        let customer = self.system.customer_client.get_customer(customer_id.clone()).await?;
        if customer.is_none() {
            return self.console.say("Customer not found!").await;
        }

        let mut draft = OrderDraft::new();
        loop {
            let product_id = self
                .console
                .ask("Enter Product ID (or 'done' to finish): ")
                .await?;
            if product_id.eq_ignore_ascii_case(DONE_SENTINEL) {
                break;
            }

            let Some(product) = self.system.product_client.get_product(product_id).await? else {
                self.console.say("Product not found!").await?;
                continue;
            };

            let quantity: u32 = self
                .console
                .ask_parsed("Enter Quantity: ", "quantity", "a whole number")
                .await?;
            match draft.add_line(&product, quantity) {
                Ok(()) => {}
                Err(DraftError::InsufficientStock { .. }) => {
                    self.console.say("Not enough stock available!").await?;
                }
                Err(DraftError::InvalidQuantity(_)) => {
                    self.console.say("Quantity must be at least 1!").await?;
                }
            }
        }

        if draft.is_empty() {
            return Ok(());
        }

        match self.system.order_client.place_order(customer_id, draft).await {
            Ok(order) => {
                info!(order_id = %order.id, total = order.total_amount, net = order.net_amount, "Order placed");
                self.console
                    .say(&format!(
                        "Order placed successfully! Total Amount: ${:.2}",
                        order.net_amount
                    ))
                    .await
            }
            Err(OrderError::StockReservationFailed(reason)) => {
                warn!(%reason, "Order abandoned");
                self.console.say("Not enough stock available!").await
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn view_orders(&mut self) -> Result<(), AppError> {
        let orders = self.system.order_client.list_orders().await?;
        if orders.is_empty() {
            return self.console.say("No orders found!").await;
        }

        for order in orders {
            self.console.say("\nOrder Details:").await?;
            self.console.say(&format!("Order ID: {}", order.id)).await?;
            self.console.say(&format!("Customer: {}", order.customer_name)).await?;
            self.console
                .say(&format!("Products: {}", order.product_names().join(", ")))
                .await?;
            self.console
                .say(&format!("Total Amount: ${:.2}", order.total_amount))
                .await?;
            if order.discount.is_some() {
                self.console
                    .say(&format!("Discounted Total: ${:.2}", order.net_amount))
                    .await?;
            }
        }
        Ok(())
    }

    async fn exit(self) -> Result<(), AppError> {
        let Self { system, mut console } = self;
        system.shutdown().await?;
        console.say("Data saved successfully. Exiting... Goodbye!").await
    }
}

use thiserror::Error;
use crate::domain::Product;
use crate::record_store::Record;

/// Rate taken off a premium customer's order total.
pub const PREMIUM_DISCOUNT_RATE: f64 = 0.10;

/// A discount that was in force when an order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    PremiumTier,
}

impl DiscountRule {
    pub fn rate(self) -> f64 {
        match self {
            DiscountRule::PremiumTier => PREMIUM_DISCOUNT_RATE,
        }
    }

    pub fn apply(self, total: f64) -> f64 {
        total * (1.0 - self.rate())
    }
}

/// A product as it was when it was ordered. Later edits to the product do not
/// reach existing orders.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Represents a placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    /// Sum of line totals before any discount.
    pub total_amount: f64,
    /// What the customer pays; equals `total_amount` when `discount` is `None`.
    pub net_amount: f64,
    pub discount: Option<DiscountRule>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: String,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    pub discount: Option<DiscountRule>,
}

impl Order {
    pub fn new(id: impl Into<String>, params: OrderCreate) -> Self {
        let total_amount: f64 = params.lines.iter().map(OrderLine::line_total).sum();
        let net_amount = match params.discount {
            Some(rule) => rule.apply(total_amount),
            None => total_amount,
        };
        Self {
            id: id.into(),
            customer_id: params.customer_id,
            customer_name: params.customer_name,
            lines: params.lines,
            total_amount,
            net_amount,
            discount: params.discount,
        }
    }

    pub fn product_names(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.name.as_str()).collect()
    }

    #[allow(dead_code)]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("Order ID".to_string(), self.id.as_str().into());
        record.insert("Customer".to_string(), self.customer_name.as_str().into());
        record.insert("Products".to_string(), self.product_names().join(", ").into());
        record.insert("Total Amount".to_string(), self.total_amount.into());
        record
    }
}

/// Why a line could not be added to an [`OrderDraft`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DraftError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
}

/// Line items collected for an order that has not been placed yet.
///
/// Adding a line never touches product stock; it only checks that the
/// quantity fits in what is left after earlier lines for the same product.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Quantity of `product_id` already held by this draft.
    pub fn drafted_quantity(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }

    pub fn add_line(&mut self, product: &Product, quantity: u32) -> Result<(), DraftError> {
        if quantity == 0 {
            return Err(DraftError::InvalidQuantity(quantity));
        }
        let available = product.stock.saturating_sub(self.drafted_quantity(&product.id));
        if quantity > available {
            return Err(DraftError::InsufficientStock {
                product_id: product.id.clone(),
                requested: quantity,
                available,
            });
        }
        self.lines.push(OrderLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        });
        Ok(())
    }

    /// Stock reservations needed to commit this draft, one per product.
    pub fn reservations(&self) -> Vec<(String, u32)> {
        let mut reservations: Vec<(String, u32)> = Vec::new();
        for line in &self.lines {
            match reservations.iter_mut().find(|(id, _)| *id == line.product_id) {
                Some((_, quantity)) => *quantity += line.quantity,
                None => reservations.push((line.product_id.clone(), line.quantity)),
            }
        }
        reservations
    }

    pub fn into_lines(self) -> Vec<OrderLine> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::FieldValue;

    fn line(name: &str, unit_price: f64, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: name.to_lowercase(),
            name: name.to_string(),
            unit_price,
            quantity,
        }
    }

    fn create(discount: Option<DiscountRule>) -> OrderCreate {
        OrderCreate {
            customer_id: "C1".into(),
            customer_name: "Ada".into(),
            lines: vec![line("Widget", 10.0, 3), line("Gadget", 2.5, 2)],
            discount,
        }
    }

    #[test]
    fn test_total_is_gross_sum_of_lines() {
        let order = Order::new("O001", create(None));
        assert_eq!(order.total_amount, 35.0);
        assert_eq!(order.net_amount, 35.0);
    }

    #[test]
    fn test_discount_only_changes_net_amount() {
        let order = Order::new("O001", create(Some(DiscountRule::PremiumTier)));
        assert_eq!(order.total_amount, 35.0);
        assert!((order.net_amount - 31.5).abs() < 1e-9);
        assert_eq!(order.discount, Some(DiscountRule::PremiumTier));
    }

    #[test]
    fn test_order_record_joins_product_names() {
        let record = Order::new("O001", create(None)).to_record();
        assert_eq!(record["Products"], FieldValue::Text("Widget, Gadget".into()));
        assert_eq!(record["Total Amount"], FieldValue::Number(35.0));
    }

    #[test]
    fn test_draft_counts_earlier_lines_against_stock() {
        let widget = Product::new("P1", "Widget", 10.0, 5);
        let mut draft = OrderDraft::new();

        draft.add_line(&widget, 3).unwrap();
        let err = draft.add_line(&widget, 3).unwrap_err();
        assert_eq!(
            err,
            DraftError::InsufficientStock {
                product_id: "P1".into(),
                requested: 3,
                available: 2,
            }
        );
        draft.add_line(&widget, 2).unwrap();

        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.reservations(), vec![("P1".to_string(), 5)]);
        // The draft never mutates the product it was given.
        assert_eq!(widget.stock, 5);
    }

    #[test]
    fn test_draft_rejects_zero_quantity() {
        let widget = Product::new("P1", "Widget", 10.0, 5);
        let mut draft = OrderDraft::new();
        assert_eq!(draft.add_line(&widget, 0), Err(DraftError::InvalidQuantity(0)));
        assert!(draft.is_empty());
    }
}

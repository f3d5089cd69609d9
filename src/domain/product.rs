use crate::record_store::{required_number, required_text, Record, RecordStoreError};

pub const PRODUCT_ID_FIELD: &str = "Product ID";
pub const PRODUCT_NAME_FIELD: &str = "Name";
pub const PRODUCT_PRICE_FIELD: &str = "Price";
pub const PRODUCT_STOCK_FIELD: &str = "Stock";

/// Represents a product in the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

/// Payload for registering a product under a known id.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
        }
    }

    /// Adjusts stock by a signed amount. Callers check availability before
    /// removing stock; the count itself saturates at zero.
    pub fn update_stock(&mut self, delta: i64) {
        let adjusted = i64::from(self.stock).saturating_add(delta);
        self.stock = u32::try_from(adjusted.max(0)).unwrap_or(u32::MAX);
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(PRODUCT_ID_FIELD.to_string(), self.id.as_str().into());
        record.insert(PRODUCT_NAME_FIELD.to_string(), self.name.as_str().into());
        record.insert(PRODUCT_PRICE_FIELD.to_string(), self.price.into());
        record.insert(PRODUCT_STOCK_FIELD.to_string(), self.stock.into());
        record
    }

    pub fn from_record(record: &Record) -> Result<Self, RecordStoreError> {
        let price = required_number(record, PRODUCT_PRICE_FIELD)?;
        if !price.is_finite() || price < 0.0 {
            return Err(invalid(PRODUCT_PRICE_FIELD, price));
        }
        let stock = required_number(record, PRODUCT_STOCK_FIELD)?;
        if stock.fract() != 0.0 || stock < 0.0 || stock > f64::from(u32::MAX) {
            return Err(invalid(PRODUCT_STOCK_FIELD, stock));
        }

        Ok(Self {
            id: required_text(record, PRODUCT_ID_FIELD)?,
            name: required_text(record, PRODUCT_NAME_FIELD).unwrap_or_default(),
            price,
            stock: stock as u32,
        })
    }
}

impl From<Product> for (String, ProductCreate) {
    fn from(product: Product) -> Self {
        let params = ProductCreate {
            name: product.name,
            price: product.price,
            stock: product.stock,
        };
        (product.id, params)
    }
}

fn invalid(field: &str, value: f64) -> RecordStoreError {
    RecordStoreError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::FieldValue;

    #[test]
    fn test_update_stock_adds_signed_delta() {
        let mut product = Product::new("P1", "Widget", 10.0, 5);
        product.update_stock(7);
        assert_eq!(product.stock, 12);
        product.update_stock(-12);
        assert_eq!(product.stock, 0);
        product.update_stock(-3);
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_record_uses_human_readable_labels() {
        let record = Product::new("P1", "Widget", 10.0, 5).to_record();
        let labels: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["Product ID", "Name", "Price", "Stock"]);
        assert_eq!(record["Stock"], FieldValue::Number(5.0));

        assert_eq!(Product::from_record(&record).unwrap(), Product::new("P1", "Widget", 10.0, 5));
    }

    #[test]
    fn test_from_record_rejects_fractional_stock() {
        let mut record = Product::new("P1", "Widget", 10.0, 5).to_record();
        record.insert(PRODUCT_STOCK_FIELD.to_string(), FieldValue::Number(2.5));
        assert!(matches!(
            Product::from_record(&record),
            Err(RecordStoreError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_from_record_accepts_numeric_ids() {
        let mut record = Product::new("x", "Widget", 1.0, 1).to_record();
        record.insert(PRODUCT_ID_FIELD.to_string(), FieldValue::Number(42.0));
        assert_eq!(Product::from_record(&record).unwrap().id, "42");
    }
}

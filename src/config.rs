use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

pub const PRODUCTS_SHEET: &str = "Products";
pub const CUSTOMERS_SHEET: &str = "Customers";

const DEFAULT_PRODUCTS_FILE: &str = "products.xlsx";
const DEFAULT_CUSTOMERS_FILE: &str = "customers.xlsx";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "shop-desk", about = "Menu-driven inventory and order desk", version)]
pub struct CliArgs {
    #[arg(
        long,
        env = "SHOP_PRODUCTS_FILE",
        value_name = "FILE",
        help = "Workbook holding the Products sheet"
    )]
    pub products_file: Option<PathBuf>,

    #[arg(
        long,
        env = "SHOP_CUSTOMERS_FILE",
        value_name = "FILE",
        help = "Workbook holding the Customers sheet"
    )]
    pub customers_file: Option<PathBuf>,

    #[arg(
        long,
        env = "SHOP_LOG_LEVEL",
        value_name = "LEVEL",
        help = "Log filter used when RUST_LOG is unset"
    )]
    pub log_level: Option<String>,

    #[arg(
        long,
        value_name = "N",
        help = "Mailbox size of each resource actor",
        value_parser = clap::value_parser!(usize)
    )]
    pub channel_capacity: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub products_file: PathBuf,
    pub customers_file: PathBuf,
    pub log_level: String,
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            products_file: PathBuf::from(DEFAULT_PRODUCTS_FILE),
            customers_file: PathBuf::from(DEFAULT_CUSTOMERS_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            products_file: args.products_file.unwrap_or(defaults.products_file),
            customers_file: args.customers_file.unwrap_or(defaults.customers_file),
            log_level: args.log_level.unwrap_or(defaults.log_level),
            channel_capacity: args.channel_capacity.unwrap_or(defaults.channel_capacity),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            bail!("channel capacity must be at least 1");
        }
        if self.products_file == self.customers_file {
            bail!(
                "products and customers must live in different workbooks (both are {})",
                self.products_file.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_file_names() {
        let config = AppConfig::from_args(CliArgs::default()).unwrap();
        assert_eq!(config.products_file, PathBuf::from("products.xlsx"));
        assert_eq!(config.customers_file, PathBuf::from("customers.xlsx"));
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs {
            products_file: Some("stock.xlsx".into()),
            channel_capacity: Some(4),
            ..CliArgs::default()
        };
        let config = AppConfig::from_args(args).unwrap();
        assert_eq!(config.products_file, PathBuf::from("stock.xlsx"));
        assert_eq!(config.customers_file, PathBuf::from("customers.xlsx"));
        assert_eq!(config.channel_capacity, 4);
    }

    #[test]
    fn test_rejects_shared_workbook() {
        let args = CliArgs {
            products_file: Some("shop.xlsx".into()),
            customers_file: Some("shop.xlsx".into()),
            ..CliArgs::default()
        };
        assert!(AppConfig::from_args(args).is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let args = CliArgs {
            channel_capacity: Some(0),
            ..CliArgs::default()
        };
        assert!(AppConfig::from_args(args).is_err());
    }
}

mod catalog;
mod config;
mod engine;
mod error;
mod fills;
mod generators;
mod quantity;
mod state;
mod store;
mod views;

pub use catalog::{Stock, StockCatalog};
pub use config::{RecoveryPolicy, SimConfig};
pub use engine::{normalize_symbol, MarketEngine, RESET_MESSAGE};
pub use error::{StoreError, TradeError, TradeErrorKind};
pub use fills::{Side, TradeReceipt};
pub use generators::{round_cents, step_price};
pub use quantity::{
    parse_quantity, NON_POSITIVE_QUANTITY, QUANTITY_TOO_LARGE, UNPARSABLE_QUANTITY,
};
pub use state::Portfolio;
pub use store::{JsonFileStore, MemoryStore, StateStore, PORTFOLIO_FILE, STOCKS_FILE};
pub use views::{HoldingView, PortfolioView, StockQuote};

#[cfg(test)]
mod tests {
    use super::{SimConfig, StockCatalog};

    #[test]
    fn sim_config_defaults_match_seed_values() {
        let config = SimConfig::default();
        assert_eq!(config.starting_cash, 10_000.0);
        assert_eq!(config.min_price, 0.01);
    }

    #[test]
    fn seed_catalog_is_the_default_catalog() {
        assert_eq!(StockCatalog::default(), StockCatalog::seed());
    }
}

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    error::{StoreError, TradeError},
    fills::{Side, TradeReceipt},
    generators::{round_cents, step_price},
    quantity::{NON_POSITIVE_QUANTITY, QUANTITY_TOO_LARGE},
    store::StateStore,
    views::{HoldingView, PortfolioView, StockQuote},
    Portfolio, RecoveryPolicy, SimConfig, StockCatalog,
};

pub const RESET_MESSAGE: &str = "Game has been reset.";

/// Owns the portfolio and stock catalog and persists each after every change.
///
/// Operations are synchronous read-modify-persist steps with no rollback: when
/// a save fails the in-memory change is kept and the error is returned.
pub struct MarketEngine {
    config: SimConfig,
    portfolio: Portfolio,
    catalog: StockCatalog,
    store: Box<dyn StateStore>,
    rng: StdRng,
}

impl MarketEngine {
    /// Loads both records from `store`, seeding any that are absent.
    pub fn open<S>(store: S, policy: RecoveryPolicy) -> Result<Self, StoreError>
    where
        S: StateStore + 'static,
    {
        Self::with_rng(Box::new(store), policy, StdRng::from_entropy())
    }

    /// Same as [`MarketEngine::open`] with a deterministic price walk.
    pub fn open_seeded<S>(store: S, policy: RecoveryPolicy, seed: u64) -> Result<Self, StoreError>
    where
        S: StateStore + 'static,
    {
        Self::with_rng(Box::new(store), policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        store: Box<dyn StateStore>,
        policy: RecoveryPolicy,
        rng: StdRng,
    ) -> Result<Self, StoreError> {
        let portfolio = recover("portfolio", store.load_portfolio(), policy)?;
        let catalog = recover("stock catalog", store.load_catalog(), policy)?;

        Ok(Self {
            config: SimConfig::default(),
            portfolio,
            catalog,
            store,
            rng,
        })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn catalog(&self) -> &StockCatalog {
        &self.catalog
    }

    pub fn update_prices(&mut self) -> Result<(), StoreError> {
        let min_price = self.config.min_price;
        for (symbol, stock) in self.catalog.iter_mut() {
            let previous = stock.price;
            stock.price = step_price(&mut self.rng, previous, stock.volatility, min_price);
            debug!("price {symbol}: {previous:.2} -> {:.2}", stock.price);
        }

        self.store.save_catalog(&self.catalog)
    }

    pub fn portfolio_view(&self) -> PortfolioView {
        let holdings = self
            .portfolio
            .holdings
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(symbol, quantity)| {
                let price = self.catalog.price(symbol).unwrap_or(0.0);
                HoldingView {
                    symbol: symbol.clone(),
                    quantity: *quantity,
                    current_value: price * *quantity as f64,
                }
            })
            .collect();

        PortfolioView {
            cash: self.portfolio.cash,
            holdings,
        }
    }

    pub fn stocks_view(&self) -> Vec<StockQuote> {
        self.catalog
            .iter()
            .map(|(symbol, stock)| StockQuote {
                symbol: symbol.to_owned(),
                price: stock.price,
            })
            .collect()
    }

    pub fn buy(&mut self, symbol: &str, quantity: u64) -> Result<TradeReceipt, TradeError> {
        let (symbol, price) = self.quote(symbol, quantity)?;
        if self.portfolio.quantity(&symbol).checked_add(quantity).is_none() {
            warn!("rejected buy of {quantity} {symbol}: holding would overflow");
            return Err(TradeError::InvalidQuantity(QUANTITY_TOO_LARGE));
        }
        let cost = round_cents(price * quantity as f64);

        if cost > self.portfolio.cash {
            let err = TradeError::InsufficientFunds {
                required: cost,
                available: self.portfolio.cash,
            };
            warn!("rejected buy of {quantity} {symbol}: {err}");
            return Err(err);
        }

        self.portfolio.cash = round_cents(self.portfolio.cash - cost).max(0.0);
        self.portfolio.add_shares(&symbol, quantity);
        info!("bought {quantity} {symbol} @ {price:.2} for {cost:.2}");
        self.store.save_portfolio(&self.portfolio)?;

        Ok(TradeReceipt {
            side: Side::Buy,
            symbol,
            quantity,
            price,
            notional: cost,
        })
    }

    pub fn sell(&mut self, symbol: &str, quantity: u64) -> Result<TradeReceipt, TradeError> {
        let (symbol, price) = self.quote(symbol, quantity)?;

        if self.portfolio.quantity(&symbol) < quantity {
            let err = TradeError::InsufficientHoldings {
                symbol,
                requested: quantity,
            };
            warn!("rejected sell: {err}");
            return Err(err);
        }

        let revenue = round_cents(price * quantity as f64);
        self.portfolio.cash = round_cents(self.portfolio.cash + revenue);
        self.portfolio.remove_shares(&symbol, quantity);
        info!("sold {quantity} {symbol} @ {price:.2} for {revenue:.2}");
        self.store.save_portfolio(&self.portfolio)?;

        Ok(TradeReceipt {
            side: Side::Sell,
            symbol,
            quantity,
            price,
            notional: revenue,
        })
    }

    /// Restores default records in memory and deletes the persisted ones.
    pub fn reset(&mut self) -> Result<&'static str, StoreError> {
        self.portfolio = Portfolio::with_cash(self.config.starting_cash);
        self.catalog = StockCatalog::seed();
        self.store.clear()?;
        info!("game reset");
        Ok(RESET_MESSAGE)
    }

    fn quote(&self, symbol: &str, quantity: u64) -> Result<(String, f64), TradeError> {
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity(NON_POSITIVE_QUANTITY));
        }

        let symbol = normalize_symbol(symbol);
        match self.catalog.price(&symbol) {
            Some(price) => Ok((symbol, price)),
            None => {
                warn!("rejected trade for unknown symbol {symbol}");
                Err(TradeError::UnknownSymbol { symbol })
            }
        }
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn recover<T: Default>(
    record: &str,
    loaded: Result<Option<T>, StoreError>,
    policy: RecoveryPolicy,
) -> Result<T, StoreError> {
    match loaded {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(T::default()),
        Err(err) if err.is_corrupt() && policy == RecoveryPolicy::Defaults => {
            warn!("{record} could not be loaded, starting from defaults: {err}");
            Ok(T::default())
        }
        Err(err) => Err(err),
    }
}

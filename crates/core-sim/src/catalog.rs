use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub price: f64,
    /// Largest fractional move per update, e.g. `0.02` for +/-2%.
    pub volatility: f64,
}

impl Stock {
    pub fn new(price: f64, volatility: f64) -> Self {
        Self { price, volatility }
    }
}

/// Tradable symbols and their current prices, persisted as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockCatalog {
    stocks: BTreeMap<String, Stock>,
}

impl StockCatalog {
    pub fn from_stocks<I, S>(stocks: I) -> Self
    where
        I: IntoIterator<Item = (S, Stock)>,
        S: Into<String>,
    {
        Self {
            stocks: stocks
                .into_iter()
                .map(|(symbol, stock)| (symbol.into(), stock))
                .collect(),
        }
    }

    pub fn seed() -> Self {
        Self::from_stocks([
            ("AAPL", Stock::new(150.00, 0.02)),
            ("GOOG", Stock::new(2500.00, 0.01)),
            ("MSFT", Stock::new(300.00, 0.015)),
            ("AMZN", Stock::new(3000.00, 0.025)),
        ])
    }

    pub fn get(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|stock| stock.price)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Stock)> {
        self.stocks
            .iter()
            .map(|(symbol, stock)| (symbol.as_str(), stock))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Stock)> {
        self.stocks
            .iter_mut()
            .map(|(symbol, stock)| (symbol.as_str(), stock))
    }

    /// Uppercases keys and rejects prices or volatilities that cannot drive a
    /// random walk.
    pub(crate) fn normalized(self) -> Result<Self, String> {
        let mut stocks = BTreeMap::new();
        for (symbol, stock) in self.stocks {
            if !stock.price.is_finite() || stock.price <= 0.0 {
                return Err(format!("{symbol} has invalid price {}", stock.price));
            }
            if !stock.volatility.is_finite() || stock.volatility < 0.0 {
                return Err(format!(
                    "{symbol} has invalid volatility {}",
                    stock.volatility
                ));
            }
            stocks.insert(symbol.trim().to_uppercase(), stock);
        }

        Ok(Self { stocks })
    }
}

impl Default for StockCatalog {
    fn default() -> Self {
        Self::seed()
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cash balance plus share counts keyed by uppercase symbol.
///
/// `holdings` never stores a zero quantity; selling the last share removes the
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    #[serde(default)]
    pub holdings: BTreeMap<String, u64>,
}

impl Portfolio {
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            holdings: BTreeMap::new(),
        }
    }

    pub fn quantity(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    /// Caller must have checked that the new total fits in a `u64`.
    pub(crate) fn add_shares(&mut self, symbol: &str, quantity: u64) {
        let held = self.holdings.entry(symbol.to_owned()).or_insert(0);
        *held = held.saturating_add(quantity);
    }

    /// Caller must have checked that at least `quantity` shares are held.
    pub(crate) fn remove_shares(&mut self, symbol: &str, quantity: u64) {
        if let Some(held) = self.holdings.get_mut(symbol) {
            *held = held.saturating_sub(quantity);
            if *held == 0 {
                self.holdings.remove(symbol);
            }
        }
    }

    /// Uppercases keys and checks the record invariants after a load.
    pub(crate) fn normalized(self) -> Result<Self, String> {
        if !self.cash.is_finite() || self.cash < 0.0 {
            return Err(format!("cash must be finite and non-negative, got {}", self.cash));
        }

        let mut holdings = BTreeMap::new();
        for (symbol, quantity) in self.holdings {
            if quantity == 0 {
                return Err(format!("holding {symbol} has zero quantity"));
            }
            let merged = holdings.entry(symbol.trim().to_uppercase()).or_insert(0u64);
            *merged = merged
                .checked_add(quantity)
                .ok_or_else(|| format!("holding {symbol} overflows when merged"))?;
        }

        Ok(Self {
            cash: self.cash,
            holdings,
        })
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::with_cash(crate::SimConfig::default().starting_cash)
    }
}

#[cfg(test)]
mod tests {
    use super::Portfolio;

    #[test]
    fn default_portfolio_starts_with_ten_thousand_cash() {
        let portfolio = Portfolio::default();

        assert_eq!(portfolio.cash, 10_000.0);
        assert!(portfolio.holdings.is_empty());
    }

    #[test]
    fn removing_every_share_drops_the_entry() {
        let mut portfolio = Portfolio::default();
        portfolio.add_shares("AAPL", 3);
        portfolio.remove_shares("AAPL", 2);
        assert_eq!(portfolio.quantity("AAPL"), 1);

        portfolio.remove_shares("AAPL", 1);

        assert!(!portfolio.holdings.contains_key("AAPL"));
    }

    #[test]
    fn normalized_uppercases_and_merges_symbols() {
        let mut portfolio = Portfolio::with_cash(5.0);
        portfolio.holdings.insert("aapl".to_string(), 2);
        portfolio.holdings.insert("AAPL".to_string(), 3);

        let portfolio = portfolio.normalized().unwrap();

        assert_eq!(portfolio.quantity("AAPL"), 5);
        assert_eq!(portfolio.holdings.len(), 1);
    }

    #[test]
    fn normalized_rejects_negative_cash_and_zero_holdings() {
        assert!(Portfolio::with_cash(-1.0).normalized().is_err());
        assert!(Portfolio::with_cash(f64::NAN).normalized().is_err());

        let mut portfolio = Portfolio::default();
        portfolio.holdings.insert("MSFT".to_string(), 0);
        assert!(portfolio.normalized().is_err());
    }

    #[test]
    fn normalized_rejects_merged_holdings_past_u64_max() {
        let mut portfolio = Portfolio::with_cash(1.0);
        portfolio.holdings.insert("aapl".to_string(), u64::MAX);
        portfolio.holdings.insert("AAPL".to_string(), 1);

        let err = portfolio.normalized().unwrap_err();

        assert!(err.contains("overflows"));
    }

    #[test]
    fn record_layout_matches_persisted_shape() {
        let mut portfolio = Portfolio::with_cash(8_500.0);
        portfolio.add_shares("AAPL", 10);

        let json = serde_json::to_value(&portfolio).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "cash": 8_500.0, "holdings": { "AAPL": 10 } })
        );
    }
}

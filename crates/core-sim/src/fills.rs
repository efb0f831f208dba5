use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    fn past_tense(self) -> &'static str {
        match self {
            Self::Buy => "bought",
            Self::Sell => "sold",
        }
    }
}

/// Outcome of a filled buy or sell. `notional` is the cost of a buy or the
/// revenue of a sell, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeReceipt {
    pub side: Side,
    pub symbol: String,
    pub quantity: u64,
    pub price: f64,
    pub notional: f64,
}

impl fmt::Display for TradeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully {} {} shares of {} for ${:.2}.",
            self.side.past_tense(),
            self.quantity,
            self.symbol,
            self.notional
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Side, TradeReceipt};

    #[test]
    fn receipt_renders_success_message() {
        let receipt = TradeReceipt {
            side: Side::Sell,
            symbol: "MSFT".to_string(),
            quantity: 3,
            price: 301.5,
            notional: 904.5,
        };

        assert_eq!(
            receipt.to_string(),
            "Successfully sold 3 shares of MSFT for $904.50."
        );
    }
}

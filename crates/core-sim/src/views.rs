use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingView {
    pub symbol: String,
    pub quantity: u64,
    #[serde(rename = "value")]
    pub current_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioView {
    pub cash: f64,
    pub holdings: Vec<HoldingView>,
}

impl PortfolioView {
    pub fn holdings_value(&self) -> f64 {
        self.holdings.iter().map(|holding| holding.current_value).sum()
    }

    pub fn total_equity(&self) -> f64 {
        self.cash + self.holdings_value()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
}

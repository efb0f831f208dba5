use std::path::PathBuf;

use thiserror::Error;

/// Failure reading, writing or validating a persisted record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid state record: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} holds an invalid state record: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the record exists but could not be understood.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. } | Self::Invalid { .. })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeErrorKind {
    UnknownSymbol,
    InsufficientFunds,
    InsufficientHoldings,
    InvalidQuantity,
    Storage,
}

impl TradeErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownSymbol => "unknown_symbol",
            Self::InsufficientFunds => "insufficient_funds",
            Self::InsufficientHoldings => "insufficient_holdings",
            Self::InvalidQuantity => "invalid_quantity",
            Self::Storage => "storage",
        }
    }
}

/// Recoverable failure of a trade request. Nothing is mutated unless the
/// variant is `Storage`, which is raised after the in-memory update landed.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("Stock {symbol} not found.")]
    UnknownSymbol { symbol: String },

    #[error("Not enough cash. You need ${required:.2} but only have ${available:.2}.")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("You don't own {requested} shares of {symbol}.")]
    InsufficientHoldings { symbol: String, requested: u64 },

    #[error("{0}")]
    InvalidQuantity(&'static str),

    #[error("Trade applied but could not be saved: {0}")]
    Storage(#[from] StoreError),
}

impl TradeError {
    pub fn kind(&self) -> TradeErrorKind {
        match self {
            Self::UnknownSymbol { .. } => TradeErrorKind::UnknownSymbol,
            Self::InsufficientFunds { .. } => TradeErrorKind::InsufficientFunds,
            Self::InsufficientHoldings { .. } => TradeErrorKind::InsufficientHoldings,
            Self::InvalidQuantity(_) => TradeErrorKind::InvalidQuantity,
            Self::Storage(_) => TradeErrorKind::Storage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub starting_cash: f64,
    pub min_price: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_cash: 10_000.0,
            min_price: 0.01,
        }
    }
}

/// What to do when a persisted record exists but cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Log a warning and seed the record with defaults.
    #[default]
    Defaults,
    /// Refuse to construct the engine.
    Fail,
}

impl RecoveryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "defaults" => Some(Self::Defaults),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::Fail => "fail",
        }
    }
}

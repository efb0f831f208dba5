use std::sync::{Arc, Mutex};

use core_sim::{MarketEngine, Side, StockQuote, TradeError, TradeErrorKind, TradeReceipt};
use tokio::sync::broadcast;
use ui::Notice;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineAccessError {
    Poisoned,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarketEvent {
    Connected,
    PricesUpdated {
        quotes: Vec<StockQuote>,
    },
    TradeFilled {
        side: Side,
        symbol: String,
        quantity: u64,
        price: f64,
        notional: f64,
    },
    TradeRejected {
        side: Side,
        symbol: String,
        kind: TradeErrorKind,
        message: String,
    },
    GameReset,
}

impl MarketEvent {
    pub fn prices_updated(quotes: Vec<StockQuote>) -> Self {
        Self::PricesUpdated { quotes }
    }

    pub fn trade_filled(receipt: &TradeReceipt) -> Self {
        Self::TradeFilled {
            side: receipt.side,
            symbol: receipt.symbol.clone(),
            quantity: receipt.quantity,
            price: receipt.price,
            notional: receipt.notional,
        }
    }

    pub fn trade_rejected(side: Side, symbol: impl Into<String>, err: &TradeError) -> Self {
        Self::TradeRejected {
            side,
            symbol: symbol.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Shared handle to the single engine instance. Every handler goes through
/// [`AppState::with_engine`], which serializes operations on one mutex.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<MarketEngine>>,
    notice: Arc<Mutex<Option<Notice>>>,
    events_tx: broadcast::Sender<MarketEvent>,
}

impl AppState {
    pub fn new(engine: MarketEngine) -> Self {
        let (events_tx, _) = broadcast::channel(256);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            notice: Arc::new(Mutex::new(None)),
            events_tx,
        }
    }

    /// Runs `f` with exclusive access to the engine. The guard never outlives
    /// the call, so handlers cannot hold it across an await point.
    pub fn with_engine<T>(
        &self,
        f: impl FnOnce(&mut MarketEngine) -> T,
    ) -> Result<T, EngineAccessError> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| EngineAccessError::Poisoned)?;
        Ok(f(&mut engine))
    }

    pub fn set_notice(&self, notice: Notice) {
        if let Ok(mut slot) = self.notice.lock() {
            *slot = Some(notice);
        }
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.notice.lock().ok().and_then(|mut slot| slot.take())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MarketEvent> {
        self.events_tx.subscribe()
    }

    /// Fan out to websocket subscribers. Having none is not an error.
    pub fn publish_event(&self, event: MarketEvent) -> usize {
        self.events_tx.send(event).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        let engine = MarketEngine::open_seeded(
            core_sim::MemoryStore::new(),
            core_sim::RecoveryPolicy::Defaults,
            7,
        )
        .unwrap();
        Self::new(engine)
    }
}

pub mod routes;
pub mod state;
mod ws;

use axum::Router;

pub use state::{AppState, EngineAccessError, MarketEvent};

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

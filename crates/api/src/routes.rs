use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use core_sim::{
    normalize_symbol, parse_quantity, PortfolioView, Side, StockQuote, TradeError,
    TradeErrorKind, TradeReceipt, NON_POSITIVE_QUANTITY, UNPARSABLE_QUANTITY,
};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ui::Notice;

use crate::{
    state::{AppState, EngineAccessError, MarketEvent},
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/buy", post(buy_form))
        .route("/sell", post(sell_form))
        .route("/reset", get(reset_form))
        .route("/api/portfolio", get(api_portfolio))
        .route("/api/stocks", get(api_stocks))
        .route("/api/buy", post(api_buy))
        .route("/api/sell", post(api_sell))
        .route("/api/reset", post(api_reset))
        .route("/ws/events", get(ws::events_socket))
        .route("/static/styles.css", get(styles_css))
        .route("/static/app.js", get(app_js))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TradeForm {
    symbol: String,
    quantity: String,
}

/// `quantity` is kept loose so a missing or non-integer value is reported as an
/// invalid quantity rather than a body rejection.
#[derive(Debug, Deserialize)]
struct TradeRequest {
    symbol: String,
    #[serde(default)]
    quantity: Value,
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl From<TradeError> for ApiError {
    fn from(err: TradeError) -> Self {
        let kind = err.kind();
        let status = match kind {
            TradeErrorKind::UnknownSymbol => StatusCode::NOT_FOUND,
            TradeErrorKind::InsufficientFunds | TradeErrorKind::InsufficientHoldings => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            TradeErrorKind::InvalidQuantity => StatusCode::BAD_REQUEST,
            TradeErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            kind: kind.as_str(),
            message: err.to_string(),
        }
    }
}

impl From<EngineAccessError> for ApiError {
    fn from(_: EngineAccessError) -> Self {
        error!("market engine lock is poisoned");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "engine_unavailable",
            message: "The market engine is unavailable.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            kind: self.kind,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn internal_error(_: EngineAccessError) -> StatusCode {
    error!("market engine lock is poisoned");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Steps prices and broadcasts the new quotes. A failed save is logged; the
/// new prices are still served from memory.
fn advance_prices(state: &AppState) -> Result<(PortfolioView, Vec<StockQuote>), EngineAccessError> {
    let (portfolio, quotes) = state.with_engine(|engine| {
        if let Err(err) = engine.update_prices() {
            error!("failed to persist stock prices: {err}");
        }
        (engine.portfolio_view(), engine.stocks_view())
    })?;

    state.publish_event(MarketEvent::prices_updated(quotes.clone()));
    Ok((portfolio, quotes))
}

fn run_trade(
    state: &AppState,
    side: Side,
    symbol: &str,
    quantity: Result<u64, TradeError>,
) -> Result<TradeReceipt, ApiError> {
    let outcome = match quantity {
        Ok(quantity) => state.with_engine(|engine| match side {
            Side::Buy => engine.buy(symbol, quantity),
            Side::Sell => engine.sell(symbol, quantity),
        })?,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(receipt) => {
            state.publish_event(MarketEvent::trade_filled(&receipt));
            Ok(receipt)
        }
        Err(err) => {
            state.publish_event(MarketEvent::trade_rejected(
                side,
                normalize_symbol(symbol),
                &err,
            ));
            Err(err.into())
        }
    }
}

fn run_reset(state: &AppState) -> Result<&'static str, ApiError> {
    let outcome = state.with_engine(|engine| engine.reset())?;
    state.publish_event(MarketEvent::GameReset);

    outcome.map_err(|err| {
        error!("failed to clear persisted state: {err}");
        ApiError::from(TradeError::Storage(err))
    })
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let (portfolio, quotes) = advance_prices(&state).map_err(internal_error)?;
    let notice = state.take_notice();

    Ok(Html(ui::render_index(&portfolio, &quotes, notice.as_ref())))
}

fn form_trade(state: &AppState, side: Side, form: TradeForm) -> Redirect {
    let notice = match run_trade(state, side, &form.symbol, parse_quantity(&form.quantity)) {
        Ok(receipt) => Notice::success(receipt.to_string()),
        Err(err) => Notice::error(err.message),
    };
    state.set_notice(notice);
    Redirect::to("/")
}

async fn buy_form(State(state): State<AppState>, Form(form): Form<TradeForm>) -> Redirect {
    form_trade(&state, Side::Buy, form)
}

async fn sell_form(State(state): State<AppState>, Form(form): Form<TradeForm>) -> Redirect {
    form_trade(&state, Side::Sell, form)
}

async fn reset_form(State(state): State<AppState>) -> Redirect {
    let notice = match run_reset(&state) {
        Ok(message) => Notice::success(message),
        Err(err) => Notice::error(err.message),
    };
    state.set_notice(notice);
    Redirect::to("/")
}

async fn api_portfolio(State(state): State<AppState>) -> Result<Json<PortfolioView>, ApiError> {
    let view = state.with_engine(|engine| engine.portfolio_view())?;
    Ok(Json(view))
}

async fn api_stocks(State(state): State<AppState>) -> Result<Json<Vec<StockQuote>>, ApiError> {
    let (_, quotes) = advance_prices(&state)?;
    Ok(Json(quotes))
}

fn request_quantity(quantity: &Value) -> Result<u64, TradeError> {
    match quantity {
        Value::Number(number) => match number.as_i64() {
            Some(value) if value > 0 => Ok(value as u64),
            Some(_) => Err(TradeError::InvalidQuantity(NON_POSITIVE_QUANTITY)),
            None => Err(TradeError::InvalidQuantity(UNPARSABLE_QUANTITY)),
        },
        Value::String(text) => parse_quantity(text),
        _ => Err(TradeError::InvalidQuantity(UNPARSABLE_QUANTITY)),
    }
}

async fn api_buy(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeReceipt>, ApiError> {
    let receipt = run_trade(
        &state,
        Side::Buy,
        &request.symbol,
        request_quantity(&request.quantity),
    )?;
    Ok(Json(receipt))
}

async fn api_sell(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeReceipt>, ApiError> {
    let receipt = run_trade(
        &state,
        Side::Sell,
        &request.symbol,
        request_quantity(&request.quantity),
    )?;
    Ok(Json(receipt))
}

async fn api_reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    let message = run_reset(&state)?;
    Ok(Json(ResetResponse { message }))
}

async fn styles_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        ui::styles_css(),
    )
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        ui::app_js(),
    )
}

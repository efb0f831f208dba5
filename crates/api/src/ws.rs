use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use log::{debug, warn};
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::state::{AppState, MarketEvent};

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| forward_events(socket, state))
}

/// What the socket loop does after waiting on the client and the event feed.
enum Step {
    Push(MarketEvent),
    Wait,
    Hangup,
}

async fn forward_events(mut socket: WebSocket, state: AppState) {
    // subscribed before the greeting so no later trade is missed
    let mut feed = state.subscribe_events();
    let mut next = Step::Push(MarketEvent::Connected);

    loop {
        match next {
            Step::Push(event) => {
                if !push(&mut socket, &event).await {
                    return;
                }
            }
            Step::Wait => {}
            Step::Hangup => return,
        }
        next = wait_for_step(&mut socket, &mut feed).await;
    }
}

async fn wait_for_step(socket: &mut WebSocket, feed: &mut Receiver<MarketEvent>) -> Step {
    tokio::select! {
        inbound = socket.recv() => match inbound {
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => Step::Hangup,
            Some(Ok(_)) => Step::Wait,
        },
        event = feed.recv() => match event {
            Ok(event) => Step::Push(event),
            Err(RecvError::Lagged(skipped)) => {
                debug!("market event subscriber fell behind by {skipped} events");
                Step::Wait
            }
            Err(RecvError::Closed) => Step::Hangup,
        },
    }
}

/// `false` once the client is gone.
async fn push(socket: &mut WebSocket, event: &MarketEvent) -> bool {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("dropping unserializable market event: {err}");
            return true;
        }
    };
    socket.send(Message::Text(payload)).await.is_ok()
}

//! Connection relay: one WebSocket, at most one research run at a time.
//!
//! The socket is split into a reader (this task) and a writer task. The
//! writer drains two channels: a priority control lane (`pong`, `rejected`)
//! and the run's event lane. Control replies therefore never wait behind a
//! backlog of streamed chunks.
//!
//! When the client disconnects the in-flight run is cancelled; dropping the
//! run future closes its open inference streams.

use super::AppState;
use super::protocol::ClientMessage;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use localmind_application::{EventSink, InferenceClient, ResearchError};
use localmind_domain::{LifecycleEvent, Query, ResearchRequest, TimedEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const BUSY_MESSAGE: &str = "A research run is already in progress on this connection";

/// `GET /ws`
pub async fn ws_handler<C: InferenceClient + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<C>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forwards a run's events to the connection's writer.
///
/// Clears the busy flag before forwarding a terminal event, so a client that
/// reacts to `complete` by starting a new run is never rejected.
struct ChannelSink {
    tx: mpsc::UnboundedSender<TimedEvent>,
    busy: Arc<AtomicBool>,
}

impl ChannelSink {
    fn forward(&self, event: TimedEvent) {
        if event.event.is_terminal() {
            self.busy.store(false, Ordering::SeqCst);
        }
        // The writer is gone once the client disconnected; nothing to deliver to.
        let _ = self.tx.send(event);
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: LifecycleEvent) {
        self.forward(event.into());
    }

    fn emit_timed(&self, event: LifecycleEvent, elapsed: f64) {
        self.forward(TimedEvent::at(event, elapsed));
    }
}

async fn handle_socket<C: InferenceClient + 'static>(socket: WebSocket, state: AppState<C>) {
    let (mut sender, mut receiver) = socket.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TimedEvent>();
    let (control_tx, mut control_rx) = mpsc::unbounded_channel::<TimedEvent>();

    let writer = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                biased;
                Some(event) = control_rx.recv() => event,
                Some(event) = event_rx.recv() => event,
                else => break,
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to serialize {} event: {}", event.event.type_name(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    info!("WebSocket client connected");
    let connection = CancellationToken::new();
    let busy = Arc::new(AtomicBool::new(false));
    let mut current_run: Option<JoinHandle<()>> = None;

    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!("WebSocket receive error: {}", e);
                break;
            }
        };

        let message = match ClientMessage::parse(text.as_str()) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring malformed client message: {}", e);
                continue;
            }
        };

        match message {
            ClientMessage::Ping => {
                let _ = control_tx.send(LifecycleEvent::Pong.into());
            }
            ClientMessage::Research { ref query, .. } => {
                if busy.load(Ordering::SeqCst) {
                    let _ = control_tx.send(
                        LifecycleEvent::Rejected {
                            message: BUSY_MESSAGE.to_string(),
                        }
                        .into(),
                    );
                    continue;
                }
                let query = match Query::try_new(query.as_str()) {
                    Ok(query) => query,
                    Err(e) => {
                        let _ = control_tx.send(
                            LifecycleEvent::Rejected {
                                message: e.to_string(),
                            }
                            .into(),
                        );
                        continue;
                    }
                };

                let request = ResearchRequest::new(query, message.mode());
                info!(mode = %request.mode.as_str(), "Starting research run");
                busy.store(true, Ordering::SeqCst);
                current_run = Some(spawn_run(
                    &state,
                    request,
                    ChannelSink {
                        tx: event_tx.clone(),
                        busy: Arc::clone(&busy),
                    },
                    connection.child_token(),
                ));
            }
        }
    }

    info!("WebSocket client disconnected");
    connection.cancel();
    if let Some(run) = current_run {
        let _ = run.await;
    }
    writer.abort();
}

fn spawn_run<C: InferenceClient + 'static>(
    state: &AppState<C>,
    request: ResearchRequest,
    sink: ChannelSink,
    cancellation: CancellationToken,
) -> JoinHandle<()> {
    let research = state.research.clone();
    tokio::spawn(async move {
        match research
            .execute_with_cancellation(request, &sink, &cancellation)
            .await
        {
            Ok(result) => info!(
                total_time = result.metrics.total_time,
                agents = result.metrics.agent_count,
                "Research run complete"
            ),
            Err(ResearchError::Cancelled) => info!("Research run abandoned by client"),
            Err(e) => warn!("Research run failed: {}", e),
        }
    })
}

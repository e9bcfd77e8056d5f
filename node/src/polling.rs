//! Long-poll `getUpdates` and feed the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use court_telegram::TelegramClient;
use court_types::InboundMessage;

use crate::metrics::BotMetrics;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Poll until shutdown or until the dispatcher goes away.
///
/// The offset advances past every update received, including ones without
/// a usable message, so nothing is delivered twice. Request failures are
/// logged and retried with exponential backoff.
pub async fn poll_updates(
    client: Arc<TelegramClient>,
    timeout_secs: u64,
    updates: mpsc::Sender<InboundMessage>,
    metrics: Arc<BotMetrics>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut offset: i64 = 0;
    let mut backoff = INITIAL_BACKOFF;
    tracing::info!(timeout_secs, "polling for updates");

    loop {
        let batch = tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("poller shutting down");
                return;
            }
            batch = client.get_updates(offset, timeout_secs) => batch,
        };

        let batch = match batch {
            Ok(batch) => {
                backoff = INITIAL_BACKOFF;
                batch
            }
            Err(e) => {
                tracing::warn!(error = %e, retry_in_secs = backoff.as_secs(), "getUpdates failed");
                tokio::select! {
                    _ = shutdown.recv() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }
        };

        for update in batch {
            offset = offset.max(update.update_id + 1);
            metrics.updates_received.inc();
            let Some(msg) = update.into_inbound() else {
                continue;
            };
            if updates.send(msg).await.is_err() {
                tracing::info!("dispatcher gone, poller stopping");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    /// Minimal Bot API stand-in: the first `getUpdates` returns one update,
    /// later calls return none. Records every offset it was asked for.
    #[derive(Default)]
    struct FakeApi {
        calls: AtomicUsize,
        offsets: std::sync::Mutex<Vec<i64>>,
    }

    async fn get_updates(
        State(api): State<Arc<FakeApi>>,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        api.offsets
            .lock()
            .unwrap()
            .push(body["offset"].as_i64().unwrap_or(-1));
        if api.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Json(serde_json::json!({"ok": true, "result": [
                {"update_id": 41, "message": {"message_id": 1,
                    "chat": {"id": -7, "type": "group"},
                    "from": {"id": 3, "first_name": "Lin", "username": "yanglin1112"},
                    "text": "/agree"}},
                {"update_id": 42}
            ]}))
        } else {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Json(serde_json::json!({"ok": true, "result": []}))
        }
    }

    #[tokio::test]
    async fn delivers_messages_and_advances_offset() {
        let api = Arc::new(FakeApi::default());
        let app = Router::new()
            .route("/bottest/getUpdates", post(get_updates))
            .with_state(api.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = Arc::new(TelegramClient::with_base(base, "test"));
        let (tx, mut rx) = mpsc::channel(8);
        let (shutdown, shutdown_rx) = broadcast::channel(1);
        let metrics = Arc::new(BotMetrics::new());
        let poller = tokio::spawn(poll_updates(client, 0, tx, metrics.clone(), shutdown_rx));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.text, "/agree");

        while api.calls.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        shutdown.send(()).unwrap();
        poller.await.unwrap();

        let offsets = api.offsets.lock().unwrap().clone();
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[1], 43);
        assert_eq!(metrics.updates_received.get(), 2);
    }
}

// Certificate Event Source - Certstream websocket client
//
// The source exposes two independent streams: decoded JSON messages and transport
// errors. Both are unbounded so the websocket reader never waits on the consumer.

use super::parser::is_heartbeat;
use crate::error::WatchError;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

/// Default public certstream endpoint
pub const DEFAULT_CERTSTREAM_URL: &str = "wss://certstream.calidog.io/";

/// Default delay before reconnecting after a dropped connection
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Default silence allowed on a connection before it is treated as dead
///
/// certstream sends a heartbeat frame roughly every 30 seconds.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// One item taken from the source
#[derive(Debug)]
pub enum Incoming {
    /// A raw certificate message
    Event(Value),
    /// A transport-level error
    Error(WatchError),
}

/// Producer half of the source channels
#[derive(Debug, Clone)]
pub struct EventSenders {
    pub events: mpsc::UnboundedSender<Value>,
    pub errors: mpsc::UnboundedSender<WatchError>,
}

impl EventSenders {
    /// Forward an error to the consumer
    pub fn report(&self, error: WatchError) {
        if self.errors.send(error).is_err() {
            debug!("Error stream closed, dropping source error");
        }
    }

    /// True once the consumer has dropped the event stream
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

/// Consumer half: the event stream and the error stream
#[derive(Debug)]
pub struct EventStreams {
    events: mpsc::UnboundedReceiver<Value>,
    errors: mpsc::UnboundedReceiver<WatchError>,
    errors_first: bool,
}

impl EventStreams {
    pub fn new(
        events: mpsc::UnboundedReceiver<Value>,
        errors: mpsc::UnboundedReceiver<WatchError>,
    ) -> Self {
        Self {
            events,
            errors,
            errors_first: false,
        }
    }

    /// Wait for the next item from either stream
    ///
    /// Priority alternates between the two streams on every call, so a busy stream
    /// cannot starve the other. Returns `None` once both streams are closed and empty.
    /// Cancel safe.
    pub async fn next(&mut self) -> Option<Incoming> {
        self.errors_first = !self.errors_first;

        if self.errors_first {
            tokio::select! {
                biased;
                Some(err) = self.errors.recv() => Some(Incoming::Error(err)),
                Some(event) = self.events.recv() => Some(Incoming::Event(event)),
                else => None,
            }
        } else {
            tokio::select! {
                biased;
                Some(event) = self.events.recv() => Some(Incoming::Event(event)),
                Some(err) = self.errors.recv() => Some(Incoming::Error(err)),
                else => None,
            }
        }
    }
}

/// Create a connected sender/stream pair
pub fn channel() -> (EventSenders, EventStreams) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (errors_tx, errors_rx) = mpsc::unbounded_channel();

    (
        EventSenders {
            events: events_tx,
            errors: errors_tx,
        },
        EventStreams::new(events_rx, errors_rx),
    )
}

/// Certstream websocket client
#[derive(Debug, Clone)]
pub struct CertstreamSource {
    url: String,
    reconnect_delay: Duration,
    idle_timeout: Option<Duration>,
    skip_heartbeats: bool,
}

impl CertstreamSource {
    /// Create a new source for a certstream endpoint
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
            skip_heartbeats: true,
        }
    }

    /// Drop a connection that has been silent for `idle`; `None` waits forever
    pub fn with_idle_timeout(mut self, idle: Option<Duration>) -> Self {
        self.idle_timeout = idle;
        self
    }

    /// Also forward heartbeat messages
    pub fn with_heartbeats(mut self) -> Self {
        self.skip_heartbeats = false;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start the client on the runtime and hand back the consumer streams
    pub fn spawn(self) -> (EventStreams, JoinHandle<()>) {
        let (senders, streams) = channel();
        let handle = tokio::spawn(async move { self.run(senders).await });
        (streams, handle)
    }

    /// Connect, read, and reconnect until the consumer goes away
    pub async fn run(self, senders: EventSenders) {
        while !senders.is_closed() {
            info!("Connecting to certstream at {}", self.url);

            match connect_async(self.url.as_str()).await {
                Ok((ws, _response)) => {
                    info!("Connected to certstream at {}", self.url);
                    self.pump(ws, &senders).await;
                }
                Err(e) => senders.report(WatchError::StreamError(e)),
            }

            if senders.is_closed() {
                break;
            }

            warn!(
                "Certstream connection lost, reconnecting in {:?}",
                self.reconnect_delay
            );
            sleep(self.reconnect_delay).await;
        }

        info!("Certstream source stopped");
    }

    /// Forward frames from one connection until it ends or goes idle
    ///
    /// Every frame, heartbeats included, resets the idle timer.
    pub async fn pump<S>(&self, mut ws: S, senders: &EventSenders)
    where
        S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
    {
        loop {
            let next = match self.idle_timeout {
                Some(idle) => match timeout(idle, ws.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        senders.report(WatchError::IdleTimeout { idle });
                        return;
                    }
                },
                None => ws.next().await,
            };

            let Some(frame) = next else {
                return;
            };

            let payload = match frame {
                Ok(Message::Text(text)) => serde_json::from_str::<Value>(&text),
                Ok(Message::Binary(bytes)) => serde_json::from_slice::<Value>(&bytes),
                Ok(Message::Close(frame)) => {
                    debug!("Certstream closed the connection: {:?}", frame);
                    return;
                }
                Ok(_) => continue,
                Err(e) => {
                    senders.report(WatchError::StreamError(e));
                    return;
                }
            };

            match payload {
                Ok(message) => {
                    if self.skip_heartbeats && is_heartbeat(&message) {
                        debug!("Certstream heartbeat");
                        continue;
                    }
                    if senders.events.send(message).is_err() {
                        debug!("Event stream closed, stopping reader");
                        return;
                    }
                }
                Err(e) => senders.report(WatchError::FrameError(e)),
            }
        }
    }
}

impl Default for CertstreamSource {
    fn default() -> Self {
        Self::new(DEFAULT_CERTSTREAM_URL, DEFAULT_RECONNECT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    fn text(value: Value) -> std::result::Result<Message, tungstenite::Error> {
        Ok(Message::Text(value.to_string()))
    }

    #[tokio::test]
    async fn test_pump_forwards_events_and_skips_heartbeats() {
        let (senders, mut streams) = channel();
        let source = CertstreamSource::default();

        let frames = stream::iter(vec![
            text(json!({ "message_type": "heartbeat" })),
            text(json!({ "message_type": "certificate_update", "data": {} })),
            Ok(Message::Ping(vec![1])),
        ]);
        source.pump(frames, &senders).await;
        drop(senders);

        match streams.next().await {
            Some(Incoming::Event(v)) => assert_eq!(v["message_type"], "certificate_update"),
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(streams.next().await.is_none());
    }

    #[tokio::test]
    async fn test_pump_keeps_heartbeats_when_asked() {
        let (senders, mut streams) = channel();
        let source = CertstreamSource::default().with_heartbeats();

        source
            .pump(stream::iter(vec![text(json!({ "message_type": "heartbeat" }))]), &senders)
            .await;
        drop(senders);

        assert!(matches!(streams.next().await, Some(Incoming::Event(_))));
    }

    #[tokio::test]
    async fn test_pump_reports_invalid_frames() {
        let (senders, mut streams) = channel();
        let source = CertstreamSource::default();

        let frames = stream::iter(vec![
            Ok(Message::Text("not json".to_string())),
            Err(tungstenite::Error::ConnectionClosed),
            text(json!({ "message_type": "certificate_update" })),
        ]);
        source.pump(frames, &senders).await;
        drop(senders);

        let mut errors = 0;
        let mut events = 0;
        while let Some(item) = streams.next().await {
            match item {
                Incoming::Error(_) => errors += 1,
                Incoming::Event(_) => events += 1,
            }
        }

        // the transport error ends the connection before the third frame
        assert_eq!(errors, 2);
        assert_eq!(events, 0);
    }

    #[tokio::test]
    async fn test_streams_alternate_priority() {
        let (senders, mut streams) = channel();
        for i in 0..3 {
            senders.events.send(json!(i)).unwrap();
            senders.report(WatchError::Other(format!("e{i}")));
        }
        drop(senders);

        let mut order = Vec::new();
        while let Some(item) = streams.next().await {
            order.push(matches!(item, Incoming::Error(_)));
        }

        assert_eq!(order, vec![true, false, true, false, true, false]);
    }

    #[tokio::test]
    async fn test_streams_drain_one_side_after_other_closes() {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel::<WatchError>();
        let mut streams = EventStreams::new(events_rx, errors_rx);

        drop(errors_tx);
        events_tx.send(json!(1)).unwrap();
        events_tx.send(json!(2)).unwrap();
        drop(events_tx);

        assert!(matches!(streams.next().await, Some(Incoming::Event(_))));
        assert!(matches!(streams.next().await, Some(Incoming::Event(_))));
        assert!(streams.next().await.is_none());
    }

    #[tokio::test]
    async fn test_pump_reports_silent_connection() {
        let (senders, mut streams) = channel();
        let source = CertstreamSource::default().with_idle_timeout(Some(Duration::from_millis(50)));

        source.pump(stream::pending(), &senders).await;
        drop(senders);

        assert!(matches!(
            streams.next().await,
            Some(Incoming::Error(WatchError::IdleTimeout { .. }))
        ));
        assert!(streams.next().await.is_none());
    }

    #[tokio::test]
    async fn test_heartbeats_keep_connection_alive() {
        let (senders, mut streams) = channel();
        let source = CertstreamSource::default().with_idle_timeout(Some(Duration::from_millis(200)));

        // ten heartbeats 50ms apart outlast the idle timeout several times over
        let frames = stream::unfold(0, |n| async move {
            if n == 10 {
                return None;
            }
            sleep(Duration::from_millis(50)).await;
            Some((text(json!({ "message_type": "heartbeat" })), n + 1))
        });
        source.pump(Box::pin(frames), &senders).await;
        drop(senders);

        assert!(streams.next().await.is_none());
    }

    #[tokio::test]
    async fn test_silent_server_triggers_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let _ws = accept_async(tcp).await.unwrap();
            sleep(Duration::from_secs(30)).await;
        });

        let source = CertstreamSource::new(format!("ws://{addr}/"), Duration::from_secs(30))
            .with_idle_timeout(Some(Duration::from_millis(200)));
        let (mut streams, handle) = source.spawn();

        let item = tokio::time::timeout(Duration::from_secs(5), streams.next())
            .await
            .expect("source stayed silent");
        assert!(matches!(
            item,
            Some(Incoming::Error(WatchError::IdleTimeout { .. }))
        ));

        handle.abort();
        server.abort();
    }

    #[tokio::test]
    async fn test_run_reports_connect_failures_and_stops() {
        let source = CertstreamSource::new("ws://127.0.0.1:1/", Duration::from_millis(20));
        let (mut streams, handle) = source.spawn();

        for _ in 0..3 {
            let item = tokio::time::timeout(Duration::from_secs(5), streams.next())
                .await
                .expect("no connection error reported");
            assert!(matches!(item, Some(Incoming::Error(WatchError::StreamError(_)))));
        }

        drop(streams);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("source kept running after the consumer went away")
            .unwrap();
    }
}

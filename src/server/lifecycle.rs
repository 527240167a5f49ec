use crate::error::{Error, Result};
use crate::server::ServerId;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::broadcast;

/// Capacity of the live event channel
const CHANNEL_CAPACITY: usize = 256;

/// Server lifecycle event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerLifecycleEvent {
    /// Record added to the registry
    Created,
    /// Fields merged by an update
    Updated,
    /// Record removed from the registry
    Removed,
    /// Entered `starting`
    Starting,
    /// Entered `online`
    Online,
    /// Entered `stopping`
    Stopping,
    /// Entered `offline` after a stop
    Offline,
    /// Restart requested
    Restarting,
}

/// Server lifecycle event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEvent {
    /// Server ID
    pub id: ServerId,
    /// Server name at the time of the event
    pub name: String,
    /// Event type
    pub event: ServerLifecycleEvent,
    /// Virtual tick the event happened on
    pub tick: u64,
    /// Event timestamp
    pub timestamp: DateTime<Utc>,
    /// Event details
    pub details: Option<String>,
}

/// Bounded history of lifecycle events plus a live broadcast of new ones
pub struct ServerLifecycleManager {
    events: VecDeque<ServerEvent>,
    capacity: usize,
    sender: broadcast::Sender<ServerEvent>,
}

impl ServerLifecycleManager {
    /// Create a manager keeping at most `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            sender,
        }
    }

    /// Record a server event and publish it to subscribers
    pub fn record(&mut self, event: ServerEvent) {
        if self.sender.receiver_count() > 0 {
            if let Err(e) = self.sender.send(event.clone()) {
                tracing::debug!(error = %e, "Lifecycle event not delivered");
            }
        }

        self.events.push_back(event);

        // Limit event history
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// Get recent events for a server, newest first
    pub fn server_events(&self, id: ServerId, limit: Option<usize>) -> Vec<ServerEvent> {
        self.events
            .iter()
            .rev()
            .filter(|e| e.id == id)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Get all events, newest first
    pub fn all_events(&self, limit: Option<usize>) -> Vec<ServerEvent> {
        self.events
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Clear events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Receive every event recorded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }
}

impl Default for ServerLifecycleManager {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Adapt a subscription into a stream of events.
///
/// Events missed because the receiver lagged are skipped with a warning;
/// the stream ends once the registry that owns the sender is dropped.
pub fn into_stream(mut receiver: broadcast::Receiver<ServerEvent>) -> impl Stream<Item = ServerEvent> {
    async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::trace!(server_id = %event.id, event = ?event.event, "Forwarding lifecycle event");
                    yield event;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Lifecycle event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

/// Receive the next event without waiting
pub fn try_next(receiver: &mut broadcast::Receiver<ServerEvent>) -> Result<Option<ServerEvent>> {
    match receiver.try_recv() {
        Ok(event) => Ok(Some(event)),
        Err(broadcast::error::TryRecvError::Empty) => Ok(None),
        Err(broadcast::error::TryRecvError::Lagged(skipped)) => Err(Error::Other(format!(
            "Lifecycle subscriber lagged by {} events",
            skipped
        ))),
        Err(broadcast::error::TryRecvError::Closed) => {
            Err(Error::Other("Lifecycle event channel closed".to_string()))
        }
    }
}

use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Simple broadcast hub wrapper used by the SSE services.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let hub = SseHub::new(4);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.broadcast(ServerEvent {
            event: Some("matches.changed".into()),
            data: "[]".into(),
        });

        assert_eq!(first.recv().await.unwrap().data, "[]");
        assert_eq!(second.recv().await.unwrap().event.as_deref(), Some("matches.changed"));
    }

    #[test]
    fn broadcast_without_subscribers_is_ignored() {
        let hub = SseHub::new(1);
        hub.broadcast(ServerEvent {
            event: None,
            data: "x".into(),
        });
    }
}

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Events emitted after successful order mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(i64),
    OrderUpdated(i64),
    OrderLineApproved { order_id: i64, line_id: i64 },
    OrderDeleted(i64),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. Failure to deliver never fails the
    /// operation that produced the event; callers log and move on.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender
/// is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderCreated(order_id) => {
                info!(order_id = order_id, "order created");
            }
            Event::OrderUpdated(order_id) => {
                info!(order_id = order_id, "order updated");
            }
            Event::OrderLineApproved { order_id, line_id } => {
                info!(order_id = order_id, line_id = line_id, "order line approved");
            }
            Event::OrderDeleted(order_id) => {
                info!(order_id = order_id, "order deleted");
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender.send(Event::OrderCreated(7)).await.unwrap();

        match rx.recv().await {
            Some(Event::OrderCreated(7)) => {}
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_reports_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        assert!(sender.send(Event::OrderDeleted(1)).await.is_err());
    }
}

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the replenishment core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A draft of suggested order lines was generated for an editing session
    SuggestionsGenerated { draft_id: Uuid, line_count: usize },
    /// One vendor group's replenishment order was committed to the store
    ReplenishmentOrderCreated(Uuid),
    /// A vendor group's order failed to persist (earlier groups remain committed)
    ReplenishmentSaveFailed { vendor_group: String },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Spawned once at startup;
/// exits when every sender has been dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::SuggestionsGenerated {
                draft_id,
                line_count,
            } => {
                info!(%draft_id, line_count, "Replenishment suggestions generated");
            }
            Event::ReplenishmentOrderCreated(order_id) => {
                info!(%order_id, "Replenishment order created");
            }
            Event::ReplenishmentSaveFailed { vendor_group } => {
                warn!(%vendor_group, "Replenishment save failed for vendor group");
            }
        }
    }
    info!("Event channel closed; processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::ReplenishmentOrderCreated(Uuid::new_v4()))
            .await
            .expect("send should succeed");

        assert!(matches!(
            rx.recv().await,
            Some(Event::ReplenishmentOrderCreated(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Domain events emitted by services after state changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    AppointmentBooked {
        salon_id: Uuid,
        appointment_id: Uuid,
    },
    AppointmentStatusChanged {
        salon_id: Uuid,
        appointment_id: Uuid,
        old_status: String,
        new_status: String,
    },
    AppointmentRescheduled {
        salon_id: Uuid,
        appointment_id: Uuid,
        scheduled_date: chrono::NaiveDate,
    },
    AppointmentCancelled {
        salon_id: Uuid,
        appointment_id: Uuid,
    },
    MessageReceived {
        salon_id: Uuid,
        message_id: Uuid,
    },
    InventoryAdjusted {
        salon_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    },
}

/// Sender handle cloned into every service
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.sender.send(event).await
    }
}

/// Background task that drains the event channel. Events are currently
/// only logged; notification fan-out hangs off this loop.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::AppointmentBooked {
                salon_id,
                appointment_id,
            } => {
                info!(%salon_id, %appointment_id, "Appointment booked");
            }
            Event::AppointmentStatusChanged {
                salon_id,
                appointment_id,
                old_status,
                new_status,
            } => {
                info!(
                    %salon_id, %appointment_id, %old_status, %new_status,
                    "Appointment status changed"
                );
            }
            Event::AppointmentRescheduled {
                salon_id,
                appointment_id,
                scheduled_date,
            } => {
                info!(%salon_id, %appointment_id, %scheduled_date, "Appointment rescheduled");
            }
            Event::AppointmentCancelled {
                salon_id,
                appointment_id,
            } => {
                info!(%salon_id, %appointment_id, "Appointment cancelled");
            }
            Event::MessageReceived {
                salon_id,
                message_id,
            } => {
                info!(%salon_id, %message_id, "Client message received");
            }
            Event::InventoryAdjusted {
                salon_id,
                item_id,
                quantity,
            } => {
                info!(%salon_id, %item_id, quantity, "Inventory adjusted");
            }
        }
    }
    info!("Event processor stopped");
}

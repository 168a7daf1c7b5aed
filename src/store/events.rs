//! Typed per-store change notifications.
//!
//! Each store carries its own publisher so consumers subscribe only to what
//! they need, instead of re-deriving everything from an ambient
//! "something changed" broadcast. Events are delivered over mpsc channels;
//! coordinators drain their receiver at the top of their event-handler turn.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::models::User;

/// What changed in the pin collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinChange {
    Created { id: String },
    Updated { id: String },
    Deleted { id: String },
    CommentAdded { id: String, index: usize },
    CommentLikeToggled { id: String, index: usize },
    /// Collection rehydrated from storage (e.g. cross-tab storage signal).
    Reloaded,
}

/// A pin-collection change, stamped with the store revision after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinEvent {
    pub revision: i64,
    pub change: PinChange,
}

/// Current-session identity transition (login, logout, signup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEvent {
    /// The identity after the transition; `None` on logout.
    pub user: Option<User>,
}

/// Fan-out publisher for one store's typed events.
pub struct Publisher<E: Clone> {
    senders: Vec<Sender<E>>,
}

impl<E: Clone> Default for Publisher<E> {
    fn default() -> Self {
        Self {
            senders: Vec::new(),
        }
    }
}

impl<E: Clone> Publisher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber, dropping closed ones.
    pub fn emit(&mut self, event: E) {
        self.senders
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let mut publisher: Publisher<PinEvent> = Publisher::new();
        let rx1 = publisher.subscribe();
        let rx2 = publisher.subscribe();

        publisher.emit(PinEvent {
            revision: 1,
            change: PinChange::Reloaded,
        });

        assert_eq!(rx1.try_recv().unwrap().revision, 1);
        assert_eq!(rx2.try_recv().unwrap().revision, 1);
        assert!(rx1.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut publisher: Publisher<IdentityEvent> = Publisher::new();
        let rx1 = publisher.subscribe();
        {
            let _rx2 = publisher.subscribe();
        }
        publisher.emit(IdentityEvent { user: None });

        assert_eq!(publisher.subscriber_count(), 1);
        assert_eq!(rx1.try_recv().unwrap(), IdentityEvent { user: None });
    }
}

//! Hand-off queue between I/O tasks and the tick thread.
//!
//! Any number of [`EventSender`]s may push from any thread or task. Only the
//! owner of the [`EventInbox`] drains, once per tick, so the registry keeps a
//! single writer.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::trace;

use crate::error::GameError;
use crate::events::GameEvent;

/// Cloneable producer half.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<GameEvent>,
}

impl EventSender {
    /// Queues `event` for the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InboxClosed`] once the inbox has been dropped.
    pub fn send(&self, event: GameEvent) -> Result<(), GameError> {
        self.tx.send(event).map_err(|_| GameError::InboxClosed)
    }
}

/// Consumer half, owned by the simulation.
#[derive(Debug)]
pub struct EventInbox {
    rx: UnboundedReceiver<GameEvent>,
    // Kept so the channel stays open while no external sender exists.
    tx: UnboundedSender<GameEvent>,
}

impl EventInbox {
    /// Opens an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// A new producer handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Takes the events queued when the call starts, in arrival order,
    /// without waiting. Events sent during the drain stay for the next one.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let queued = self.rx.len();
        let mut events = Vec::with_capacity(queued);
        while events.len() < queued {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        if !events.is_empty() {
            trace!(count = events.len(), "drained inbox");
        }
        events
    }
}

impl Default for EventInbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_fifo() {
        let mut inbox = EventInbox::new();
        let tx = inbox.sender();
        for nonce in 0..5 {
            tx.send(GameEvent::Ping { nonce }).unwrap();
        }
        let nonces: Vec<u64> = inbox
            .drain()
            .into_iter()
            .map(|event| match event {
                GameEvent::Ping { nonce } => nonce,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(nonces, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drain_stops_at_events_queued_when_called() {
        let mut inbox = EventInbox::new();
        let tx = inbox.sender();
        tx.send(GameEvent::Ping { nonce: 0 }).unwrap();
        tx.send(GameEvent::Ping { nonce: 1 }).unwrap();

        let flood = std::thread::spawn(move || {
            let mut nonce = 2;
            while tx.send(GameEvent::Ping { nonce }).is_ok() {
                nonce += 1;
            }
        });

        let first = inbox.drain();
        assert!(first.len() >= 2);
        assert_eq!(first[0], GameEvent::Ping { nonce: 0 });
        assert_eq!(first[1], GameEvent::Ping { nonce: 1 });

        drop(inbox);
        flood.join().unwrap();
    }

    #[test]
    fn test_drain_leaves_later_events_for_next_call() {
        let mut inbox = EventInbox::new();
        let tx = inbox.sender();
        tx.send(GameEvent::Ping { nonce: 0 }).unwrap();
        assert_eq!(inbox.drain().len(), 1);

        tx.send(GameEvent::Ping { nonce: 1 }).unwrap();
        assert_eq!(inbox.drain(), vec![GameEvent::Ping { nonce: 1 }]);
    }

    #[test]
    fn test_drain_empty() {
        let mut inbox = EventInbox::new();
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn test_send_after_drop_fails() {
        let inbox = EventInbox::new();
        let tx = inbox.sender();
        drop(inbox);
        assert!(matches!(
            tx.send(GameEvent::Disconnect),
            Err(GameError::InboxClosed)
        ));
    }
}

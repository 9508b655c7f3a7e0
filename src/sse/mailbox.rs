use crate::sse::models::Message;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Outcome of a non-blocking delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Accepted,
    /// Mailbox full; this copy is discarded.
    Full,
    /// The reading side is gone.
    Gone,
}

/// Creates a bounded mailbox. A capacity of zero behaves as a single-slot handoff.
pub(crate) fn mailbox(capacity: usize) -> (MailboxSender, Mailbox) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (MailboxSender { tx }, Mailbox { rx })
}

/// Hub-side half. Dropping it closes the mailbox.
#[derive(Debug)]
pub(crate) struct MailboxSender {
    tx: mpsc::Sender<Message>,
}

impl MailboxSender {
    pub(crate) fn try_put(&self, message: Message) -> Delivery {
        match self.tx.try_send(message) {
            Ok(()) => Delivery::Accepted,
            Err(TrySendError::Full(_)) => Delivery::Full,
            Err(TrySendError::Closed(_)) => Delivery::Gone,
        }
    }
}

/// Reader half owned by one connection.
#[derive(Debug)]
pub struct Mailbox {
    rx: mpsc::Receiver<Message>,
}

impl Mailbox {
    /// Waits for the next message. `None` once the hub has closed this mailbox
    /// and everything already accepted has been taken.
    pub async fn take(&mut self) -> Option<Message> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_when_full() {
        let (tx, mut rx) = mailbox(2);
        assert_eq!(tx.try_put(Message::new("a", "1")), Delivery::Accepted);
        assert_eq!(tx.try_put(Message::new("a", "2")), Delivery::Accepted);
        assert_eq!(tx.try_put(Message::new("a", "3")), Delivery::Full);

        assert_eq!(rx.take().await, Some(Message::new("a", "1")));
        assert_eq!(tx.try_put(Message::new("a", "4")), Delivery::Accepted);
        assert_eq!(rx.take().await, Some(Message::new("a", "2")));
        assert_eq!(rx.take().await, Some(Message::new("a", "4")));
    }

    #[tokio::test]
    async fn zero_capacity_holds_one_message() {
        let (tx, mut rx) = mailbox(0);
        assert_eq!(tx.try_put(Message::new("a", "1")), Delivery::Accepted);
        assert_eq!(tx.try_put(Message::new("a", "2")), Delivery::Full);
        assert_eq!(rx.take().await, Some(Message::new("a", "1")));
    }

    #[tokio::test]
    async fn drains_then_reports_closed() {
        let (tx, mut rx) = mailbox(4);
        tx.try_put(Message::new("a", "1"));
        drop(tx);

        assert_eq!(rx.take().await, Some(Message::new("a", "1")));
        assert_eq!(rx.take().await, None);
    }

    #[tokio::test]
    async fn reports_gone_reader() {
        let (tx, rx) = mailbox(4);
        drop(rx);
        assert_eq!(tx.try_put(Message::new("a", "1")), Delivery::Gone);
    }
}

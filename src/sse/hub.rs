//! The hub: one worker task owns the subscriber registry and applies every
//! subscribe, unsubscribe and broadcast in the order they were submitted.

use crate::error::HubError;
use crate::sse::mailbox::{self, Delivery, Mailbox, MailboxSender};
use crate::sse::models::{DEFAULT_EVENT, HubStats, Message, SubscriberHandle};
use axum::body::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};

pub const DEFAULT_MAILBOX_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Messages buffered per subscriber before further copies are dropped.
    pub mailbox_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

enum Command {
    Subscribe {
        handle: SubscriberHandle,
        sender: MailboxSender,
    },
    Unsubscribe(SubscriberHandle),
    Broadcast(Message),
    DisconnectAll,
    Stats(oneshot::Sender<HubStats>),
    Shutdown,
}

/// Handle to a running hub. Clones share the same worker.
///
/// The command queue is unbounded so that publishing and dropping a
/// [`Subscription`] never wait on the worker. Producers are not slowed down:
/// a caller that publishes faster than the worker fans out grows the queue
/// without limit. Per-subscriber backlog stays bounded by the mailbox capacity.
#[derive(Clone)]
pub struct Hub {
    commands: mpsc::UnboundedSender<Command>,
    next_handle: Arc<AtomicU64>,
    config: HubConfig,
}

impl Hub {
    /// Spawns the hub worker. Must be called from within a tokio runtime.
    pub fn new(config: HubConfig) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(Worker::default().run(rx));

        Hub {
            commands,
            next_handle: Arc::new(AtomicU64::new(1)),
            config,
        }
    }

    /// Registers a new mailbox. The subscription is ordered before any
    /// command submitted after this call returns.
    pub fn subscribe(&self) -> Result<Subscription, HubError> {
        let handle = SubscriberHandle::from_raw(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let (sender, mailbox) = mailbox::mailbox(self.config.mailbox_capacity);
        self.submit(Command::Subscribe { handle, sender })?;

        Ok(Subscription {
            handle,
            mailbox,
            commands: self.commands.clone(),
        })
    }

    /// Removes `handle` and closes its mailbox. Unknown handles are ignored.
    pub fn unsubscribe(&self, handle: SubscriberHandle) -> Result<(), HubError> {
        self.submit(Command::Unsubscribe(handle))
    }

    /// Broadcasts `payload` as a `message` event.
    pub fn send(&self, payload: impl Into<Bytes>) -> Result<(), HubError> {
        self.send_event(DEFAULT_EVENT, payload)
    }

    /// Queues a broadcast and returns without waiting for delivery.
    pub fn send_event(&self, event: &str, payload: impl Into<Bytes>) -> Result<(), HubError> {
        self.submit(Command::Broadcast(Message::new(event, payload)))
    }

    pub fn disconnect_all(&self) -> Result<(), HubError> {
        self.submit(Command::DisconnectAll)
    }

    /// Closes every mailbox and stops the worker. Later calls fail with
    /// [`HubError::Closed`].
    pub fn shutdown(&self) -> Result<(), HubError> {
        self.submit(Command::Shutdown)
    }

    /// Counters as of every command submitted before this call.
    pub async fn stats(&self) -> Result<HubStats, HubError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Stats(reply))?;
        rx.await.map_err(|_| HubError::Closed)
    }

    pub async fn subscriber_count(&self) -> Result<usize, HubError> {
        Ok(self.stats().await?.subscribers)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn submit(&self, command: Command) -> Result<(), HubError> {
        self.commands.send(command).map_err(|_| HubError::Closed)
    }
}

/// One registered mailbox. Dropping it unsubscribes.
pub struct Subscription {
    handle: SubscriberHandle,
    mailbox: Mailbox,
    commands: mpsc::UnboundedSender<Command>,
}

impl Subscription {
    pub fn handle(&self) -> SubscriberHandle {
        self.handle
    }

    /// Next message, or `None` once the hub has removed this subscriber.
    pub async fn recv(&mut self) -> Option<Message> {
        self.mailbox.take().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // A stopped hub has already closed the mailbox.
        let _ = self.commands.send(Command::Unsubscribe(self.handle));
    }
}

#[derive(Default)]
struct Worker {
    registry: HashMap<SubscriberHandle, MailboxSender>,
    delivered: u64,
    dropped: u64,
}

impl Worker {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            match command {
                Command::Subscribe { handle, sender } => {
                    self.registry.insert(handle, sender);
                    info!("new subscriber: total {}", self.registry.len());
                }
                Command::Unsubscribe(handle) => {
                    if self.registry.remove(&handle).is_some() {
                        info!("del subscriber: total {}", self.registry.len());
                    }
                }
                Command::Broadcast(message) => self.broadcast(message),
                Command::DisconnectAll => {
                    let count = self.registry.len();
                    self.registry.clear();
                    info!("disconnected {} subscribers", count);
                }
                Command::Stats(reply) => {
                    let _ = reply.send(self.stats());
                }
                Command::Shutdown => break,
            }
        }

        self.registry.clear();
        debug!("hub worker stopped");
    }

    fn broadcast(&mut self, message: Message) {
        let mut gone = Vec::new();

        for (handle, sender) in &self.registry {
            match sender.try_put(message.clone()) {
                Delivery::Accepted => self.delivered += 1,
                Delivery::Full => {
                    self.dropped += 1;
                    debug!(%handle, event = message.event(), "mailbox full, message dropped");
                }
                Delivery::Gone => gone.push(*handle),
            }
        }

        for handle in gone {
            self.registry.remove(&handle);
            warn!(%handle, "mailbox reader gone, subscriber pruned");
            info!("del subscriber: total {}", self.registry.len());
        }
    }

    fn stats(&self) -> HubStats {
        HubStats {
            subscribers: self.registry.len(),
            delivered: self.delivered,
            dropped: self.dropped,
        }
    }
}

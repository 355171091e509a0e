//! # chart_event - Editor Event System
//!
//! Decouples the edit engine from the observers that react to it
//! (timeline footers, hitsound panels, autosave):
//! - Synchronous delivery with [`EventBus::emit`]
//! - Deferred delivery with [`EventBus::publish`] + [`EventBus::process`]
//! - Priority-ordered handlers
//! - Single-type polling channels

use std::any::{Any, TypeId};
use std::collections::BTreeMap;

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Event priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// A queued event awaiting [`EventBus::process`]
struct EventEnvelope {
    type_id: TypeId,
    data: Box<dyn Any + Send + Sync>,
    priority: Priority,
}

impl EventEnvelope {
    fn new<E: Event>(event: E, priority: Priority) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            data: Box::new(event),
            priority,
        }
    }
}

/// Type-erased handler
type DynamicHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Event bus for publishing and subscribing to events
pub struct EventBus {
    queue_tx: Sender<EventEnvelope>,
    queue_rx: Receiver<EventEnvelope>,
    handlers: BTreeMap<TypeId, Vec<(SubscriberId, Priority, DynamicHandler)>>,
    next_subscriber_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        let (queue_tx, queue_rx) = unbounded();
        Self {
            queue_tx,
            queue_rx,
            handlers: BTreeMap::new(),
            next_subscriber_id: 1,
        }
    }

    /// Deliver an event to every subscriber now, on the calling thread.
    pub fn emit<E: Event>(&self, event: &E) {
        if let Some(handlers) = self.handlers.get(&TypeId::of::<E>()) {
            for (_, _, handler) in handlers {
                handler(event);
            }
        }
    }

    /// Queue an event for the next [`Self::process`]
    pub fn publish<E: Event>(&self, event: E) {
        self.publish_with_priority(event, Priority::Normal);
    }

    /// Queue an event with priority
    pub fn publish_with_priority<E: Event>(&self, event: E, priority: Priority) {
        let envelope = EventEnvelope::new(event, priority);
        // Both ends live in `self`, so the channel cannot be disconnected.
        let _ = self.queue_tx.send(envelope);
    }

    /// Subscribe to an event type
    pub fn subscribe<E: Event, F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority::<E, F>(handler, Priority::Normal)
    }

    /// Subscribe with priority. Higher priorities run first; equal
    /// priorities run in subscription order.
    pub fn subscribe_with_priority<E: Event, F>(
        &mut self,
        handler: F,
        priority: Priority,
    ) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let wrapped_handler: DynamicHandler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        let handlers = self.handlers.entry(TypeId::of::<E>()).or_default();
        handlers.push((id, priority, wrapped_handler));
        handlers.sort_by(|a, b| b.1.cmp(&a.1));

        log::trace!("Subscriber {:?} registered for {}", id, std::any::type_name::<E>());
        id
    }

    /// Unsubscribe. Returns whether the subscriber existed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sub_id, _, _)| *sub_id != id);
            found |= handlers.len() != before;
        }
        found
    }

    /// Number of handlers registered for `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Process all pending events
    pub fn process(&mut self) {
        let mut events: Vec<_> = self.queue_rx.try_iter().collect();

        // Stable: equal priorities keep publication order
        events.sort_by(|a, b| b.priority.cmp(&a.priority));

        for envelope in events {
            if let Some(handlers) = self.handlers.get(&envelope.type_id) {
                for (_, _, handler) in handlers {
                    handler(envelope.data.as_ref());
                }
            }
        }
    }

    /// Drop all pending events without processing
    pub fn clear(&self) {
        while self.queue_rx.try_recv().is_ok() {}
    }

    pub fn pending_count(&self) -> usize {
        self.queue_rx.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue_rx.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel for single-type events, drained by a polling observer
pub struct EventChannel<E: Event> {
    tx: Sender<E>,
    rx: Receiver<E>,
}

impl<E: Event> EventChannel<E> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Send an event
    pub fn send(&self, event: E) {
        let _ = self.tx.send(event);
    }

    /// A sender that can be moved into a bus handler
    pub fn sender(&self) -> Sender<E> {
        self.tx.clone()
    }

    /// Receive an event
    pub fn receive(&self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Drain all events
    pub fn drain(&self) -> Vec<E> {
        self.rx.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventBus, EventChannel, Priority, SubscriberId};
}

//! # overlink_event - Typed Event Bus
//!
//! Hub state changes are published as plain typed values and handed to
//! subscribers on [`EventBus::process`]. Events of a type nobody listens to
//! are dropped at publish time, so the queue only ever holds deliverable work.

use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, VecDeque};

/// Anything that can travel on the bus
pub trait Event: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Event for T {}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

type Handler = Box<dyn Fn(&dyn Any) + Send + Sync>;

struct Queued {
    type_id: TypeId,
    payload: Box<dyn Any + Send + Sync>,
}

/// Queued typed publish/subscribe
pub struct EventBus {
    queue: Mutex<VecDeque<Queued>>,
    subscribers: BTreeMap<TypeId, Vec<(SubscriberId, Handler)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            subscribers: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Queue an event for the next [`process`](Self::process).
    ///
    /// Returns `false` (and drops the event) when the type has no subscribers.
    pub fn publish<E: Event>(&self, event: E) -> bool {
        if self.subscriber_count::<E>() == 0 {
            return false;
        }
        self.queue.lock().push_back(Queued {
            type_id: TypeId::of::<E>(),
            payload: Box::new(event),
        });
        true
    }

    /// Register a handler for events of type `E`, called in subscription order
    pub fn subscribe<E: Event, F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;

        let erased: Handler = Box::new(move |payload: &dyn Any| {
            if let Some(event) = payload.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.subscribers
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, erased));
        id
    }

    /// Remove a handler. Already queued events of its type stay queued and
    /// reach whoever is still subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut found = false;
        self.subscribers.retain(|_, handlers| {
            handlers.retain(|(sub, _)| {
                let keep = *sub != id;
                found |= !keep;
                keep
            });
            !handlers.is_empty()
        });
        found
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Deliver every queued event in publish order, returning how many were drained
    pub fn process(&mut self) -> usize {
        let drained: Vec<Queued> = self.queue.lock().drain(..).collect();
        for queued in &drained {
            if let Some(handlers) = self.subscribers.get(&queued.type_id) {
                for (_, handler) in handlers {
                    handler(queued.payload.as_ref());
                }
            }
        }
        if !drained.is_empty() {
            log::trace!("Delivered {} hub events", drained.len());
        }
        drained.len()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending_count())
            .field("event_types", &self.subscribers.len())
            .finish()
    }
}

pub mod prelude {
    pub use crate::{Event, EventBus, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct ZoneChange(&'static str);
    struct Unheard;

    fn recorder(bus: &mut EventBus) -> (SubscriberId, Arc<Mutex<Vec<&'static str>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = bus.subscribe(move |e: &ZoneChange| sink.lock().push(e.0));
        (id, seen)
    }

    #[test]
    fn test_delivery_in_publish_order() {
        let mut bus = EventBus::new();
        let (_, seen) = recorder(&mut bus);

        assert!(bus.publish(ZoneChange("hub")));
        assert!(bus.publish(ZoneChange("toppler")));
        assert_eq!(bus.pending_count(), 2);
        assert!(seen.lock().is_empty());

        assert_eq!(bus.process(), 2);
        assert_eq!(*seen.lock(), vec!["hub", "toppler"]);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_unheard_events_are_not_queued() {
        let mut bus = EventBus::new();
        let _ = recorder(&mut bus);
        for _ in 0..1000 {
            assert!(!bus.publish(Unheard));
        }
        assert_eq!(bus.pending_count(), 0);
        assert_eq!(bus.process(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let (id, seen) = recorder(&mut bus);
        assert_eq!(bus.subscriber_count::<ZoneChange>(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count::<ZoneChange>(), 0);

        assert!(!bus.publish(ZoneChange("hub")));
        bus.process();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_every_subscriber_sees_the_event() {
        let mut bus = EventBus::new();
        let (_, first) = recorder(&mut bus);
        let (_, second) = recorder(&mut bus);

        bus.publish(ZoneChange("preview"));
        bus.process();
        assert_eq!(*first.lock(), vec!["preview"]);
        assert_eq!(*second.lock(), vec!["preview"]);
    }
}

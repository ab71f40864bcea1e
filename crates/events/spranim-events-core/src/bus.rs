//! Publish/subscribe registry keyed by event-type strings.
//!
//! Each event type maps to a [`PriorityQueue`] of owner → handler list. Handlers that the
//! same owner registers at the same priority accumulate and fire in registration order.
//!
//! `dispatch` iterates a snapshot of the queue taken before the first handler runs and
//! releases the registry borrow while handlers execute. Handlers may therefore call
//! `on`, `off` or `dispatch` on the same bus; registry changes become visible to the
//! next dispatch of that type, not the one in flight.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use log::trace;

use crate::priority_queue::{Priority, PriorityQueue};

/// Priority used by [`EventBus::on`].
pub const DEFAULT_PRIORITY: Priority = 1;

/// Identity of a subscriber. Handlers receive the id of the owner they were registered
/// under, which is how `off` finds them again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u64);

pub type Handler<P> = Rc<dyn Fn(OwnerId, &P)>;

type HandlerQueue<P> = PriorityQueue<OwnerId, Vec<Handler<P>>>;

struct Registry<P> {
    events: HashMap<String, HandlerQueue<P>>,
    next_owner: u64,
}

/// Shared handle to one registry. Cloning the handle shares the registry.
pub struct EventBus<P> {
    inner: Rc<RefCell<Registry<P>>>,
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.inner.borrow();
        let mut types: Vec<&String> = reg.events.keys().collect();
        types.sort();
        f.debug_struct("EventBus")
            .field("event_types", &types)
            .field("next_owner", &reg.next_owner)
            .finish()
    }
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                events: HashMap::new(),
                next_owner: 0,
            })),
        }
    }

    /// Allocate a fresh owner id, unique within this bus.
    pub fn new_owner(&self) -> OwnerId {
        let mut reg = self.inner.borrow_mut();
        let id = OwnerId(reg.next_owner);
        reg.next_owner = reg.next_owner.wrapping_add(1);
        id
    }

    /// Register `handler` for `event_type` at [`DEFAULT_PRIORITY`].
    pub fn on<F>(&self, event_type: &str, owner: OwnerId, handler: F)
    where
        F: Fn(OwnerId, &P) + 'static,
    {
        self.on_with_priority(event_type, owner, DEFAULT_PRIORITY, handler);
    }

    /// Register `handler` for `event_type`. Lower priorities fire first.
    pub fn on_with_priority<F>(&self, event_type: &str, owner: OwnerId, priority: Priority, handler: F)
    where
        F: Fn(OwnerId, &P) + 'static,
    {
        let handler: Handler<P> = Rc::new(handler);
        let mut reg = self.inner.borrow_mut();
        let queue = reg.events.entry(event_type.to_string()).or_default();
        match queue.get_mut(priority, &owner) {
            Some(handlers) => handlers.push(handler),
            None => {
                queue.push(priority, owner, vec![handler]);
            }
        }
        trace!("on {event_type}: owner {} at priority {priority}", owner.0);
    }

    /// Detach every handler `owner` registered for `event_type`. No-op when nothing matches.
    pub fn off(&self, event_type: &str, owner: OwnerId) {
        let mut reg = self.inner.borrow_mut();
        let now_empty = match reg.events.get_mut(event_type) {
            Some(queue) => {
                queue.remove_key(&owner);
                queue.is_empty()
            }
            None => return,
        };
        if now_empty {
            reg.events.remove(event_type);
        }
    }

    /// Detach all handlers of `event_type`, whoever owns them.
    pub fn off_all(&self, event_type: &str) {
        self.inner.borrow_mut().events.remove(event_type);
    }

    /// Detach `owner` from every event type.
    pub fn forget_owner(&self, owner: OwnerId) {
        let mut reg = self.inner.borrow_mut();
        reg.events.retain(|_, queue| {
            queue.remove_key(&owner);
            !queue.is_empty()
        });
    }

    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.inner.borrow().events.contains_key(event_type)
    }

    /// Number of handler functions registered for `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        let reg = self.inner.borrow();
        reg.events.get(event_type).map_or(0, |queue| {
            queue.iter().map(|(_, handlers)| handlers.len()).sum()
        })
    }

    /// Invoke every handler of `event_type` in priority-then-registration order.
    /// Dispatching a type nobody listens to does nothing.
    pub fn dispatch(&self, event_type: &str, payload: &P) {
        let snapshot = {
            let reg = self.inner.borrow();
            match reg.events.get(event_type) {
                Some(queue) => queue.clone(),
                None => return,
            }
        };
        trace!("dispatch {event_type} to {} owner slot(s)", snapshot.len());
        for (owner, handlers) in snapshot {
            for handler in &handlers {
                handler(owner, payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn owners_are_unique() {
        let bus: EventBus<()> = EventBus::new();
        let a = bus.new_owner();
        let b = bus.new_owner();
        assert_ne!(a, b);
    }

    #[test]
    fn same_owner_same_priority_accumulates() {
        let bus: EventBus<u32> = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let owner = bus.new_owner();
        for tag in ["one", "two"] {
            let log = Rc::clone(&log);
            bus.on("tick", owner, move |_, n: &u32| log.borrow_mut().push((tag, *n)));
        }
        assert_eq!(bus.handler_count("tick"), 2);
        bus.dispatch("tick", &9);
        assert_eq!(*log.borrow(), vec![("one", 9), ("two", 9)]);
    }

    #[test]
    fn off_without_registrations_is_a_no_op() {
        let bus: EventBus<()> = EventBus::new();
        let owner = bus.new_owner();
        bus.off("missing", owner);
        bus.off_all("missing");
        bus.dispatch("missing", &());
        assert!(!bus.has_listeners("missing"));
    }

    #[test]
    fn off_drops_empty_event_types() {
        let bus: EventBus<()> = EventBus::new();
        let owner = bus.new_owner();
        bus.on("a", owner, |_, _| {});
        assert!(bus.has_listeners("a"));
        bus.off("a", owner);
        assert!(!bus.has_listeners("a"));
    }
}

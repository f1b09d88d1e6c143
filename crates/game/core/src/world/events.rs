//! Synchronous world event bus.
//!
//! Handlers run on the caller's stack as soon as an event is emitted, unless
//! a batch is open. Inside a batch events are queued and delivered in arrival
//! order when the outermost batch ends. A flush delivers a snapshot of the
//! queue exactly once: events raised by handlers while the flush runs are
//! queued for the next `end_batch` instead of joining the current pass.
use std::collections::BTreeMap;

use crate::component::{Component, ComponentKind};
use crate::entity::{Entity, EntityId};
use crate::geometry::Point;

/// Event names handlers subscribe to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum WorldEventKind {
    EntityAdded,
    EntityRemoved,
    EntityMoved,
    EntityModified,
    ComponentAdded,
    ComponentRemoved,
    ComponentModified,
    FovChanged,
    PlayerVisionUpdated,
}

/// Payload of every event the world emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    EntityAdded {
        entity: Entity,
    },
    EntityRemoved {
        entity: Entity,
        position: Point,
    },
    EntityMoved {
        entity: EntityId,
        from: Point,
        to: Point,
    },
    EntityModified {
        entity: EntityId,
    },
    ComponentAdded {
        entity: EntityId,
        component: Component,
    },
    ComponentRemoved {
        entity: EntityId,
        component: Component,
    },
    ComponentModified {
        entity: EntityId,
        component: Component,
    },
    FovChanged,
    PlayerVisionUpdated {
        player_pos: Point,
        visible_locations: Vec<Point>,
    },
}

impl WorldEvent {
    pub fn kind(&self) -> WorldEventKind {
        match self {
            WorldEvent::EntityAdded { .. } => WorldEventKind::EntityAdded,
            WorldEvent::EntityRemoved { .. } => WorldEventKind::EntityRemoved,
            WorldEvent::EntityMoved { .. } => WorldEventKind::EntityMoved,
            WorldEvent::EntityModified { .. } => WorldEventKind::EntityModified,
            WorldEvent::ComponentAdded { .. } => WorldEventKind::ComponentAdded,
            WorldEvent::ComponentRemoved { .. } => WorldEventKind::ComponentRemoved,
            WorldEvent::ComponentModified { .. } => WorldEventKind::ComponentModified,
            WorldEvent::FovChanged => WorldEventKind::FovChanged,
            WorldEvent::PlayerVisionUpdated { .. } => WorldEventKind::PlayerVisionUpdated,
        }
    }

    /// Component kind carried by component events.
    pub fn component_kind(&self) -> Option<ComponentKind> {
        match self {
            WorldEvent::ComponentAdded { component, .. }
            | WorldEvent::ComponentRemoved { component, .. }
            | WorldEvent::ComponentModified { component, .. } => Some(component.kind()),
            _ => None,
        }
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(u64);

/// Events a handler wants to raise in response to the one it received.
#[derive(Debug, Default)]
pub struct Followups {
    events: Vec<WorldEvent>,
}

impl Followups {
    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }
}

type Handler = Box<dyn FnMut(&WorldEvent, &mut Followups)>;

#[derive(Default)]
pub struct EventBus {
    handlers: BTreeMap<WorldEventKind, Vec<(HandlerId, Handler)>>,
    next_handler: u64,
    batch_depth: usize,
    flushing: bool,
    queue: Vec<WorldEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler; several handlers may listen to the same event.
    pub fn on<F>(&mut self, kind: WorldEventKind, handler: F) -> HandlerId
    where
        F: FnMut(&WorldEvent, &mut Followups) + 'static,
    {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if it was not registered for `kind`.
    pub fn off(&mut self, kind: WorldEventKind, handler: HandlerId) -> bool {
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != handler);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.handlers.remove(&kind);
        }
        removed
    }

    pub fn emit(&mut self, event: WorldEvent) {
        if self.batch_depth > 0 || self.flushing {
            self.queue.push(event);
        } else {
            self.dispatch(event);
        }
    }

    pub fn start_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes a batch. The outermost close flushes the queued events.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            tracing::warn!("end_batch called without a matching start_batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }

        let pending = std::mem::take(&mut self.queue);
        tracing::trace!(count = pending.len(), "flushing batched world events");
        self.flushing = true;
        for event in pending {
            self.dispatch(event);
        }
        self.flushing = false;
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Number of events waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn handler_count(&self, kind: WorldEventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    fn dispatch(&mut self, event: WorldEvent) {
        let mut followups = Followups::default();
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for (_, handler) in handlers.iter_mut() {
                handler(&event, &mut followups);
            }
        }
        for followup in followups.events {
            self.emit(followup);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "handlers",
                &self
                    .handlers
                    .iter()
                    .map(|(kind, handlers)| (*kind, handlers.len()))
                    .collect::<Vec<_>>(),
            )
            .field("batch_depth", &self.batch_depth)
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn modified(id: &str) -> WorldEvent {
        WorldEvent::EntityModified {
            entity: EntityId::new(id),
        }
    }

    fn recorder(bus: &mut EventBus) -> Rc<RefCell<Vec<WorldEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.on(WorldEventKind::EntityModified, move |event, _| {
            sink.borrow_mut().push(event.clone());
        });
        seen
    }

    #[test]
    fn emit_outside_batch_is_immediate() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);

        bus.emit(modified("a"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn batch_delivers_in_order_after_end() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);

        bus.start_batch();
        bus.emit(modified("e1"));
        bus.emit(modified("e2"));
        bus.emit(modified("e3"));
        assert!(seen.borrow().is_empty());

        bus.end_batch();
        assert_eq!(
            *seen.borrow(),
            vec![modified("e1"), modified("e2"), modified("e3")]
        );
    }

    #[test]
    fn nested_batches_flush_once_at_outermost_end() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);

        bus.start_batch();
        bus.start_batch();
        bus.emit(modified("a"));
        bus.end_batch();
        assert!(seen.borrow().is_empty());
        bus.end_batch();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn followups_raised_during_flush_wait_for_next_batch() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);
        bus.on(WorldEventKind::EntityAdded, |_, followups| {
            followups.emit(WorldEvent::EntityModified {
                entity: EntityId::new("echo"),
            });
        });

        bus.start_batch();
        bus.emit(WorldEvent::EntityAdded {
            entity: crate::entity::Entity::with_id("x".into(), Point::ORIGIN),
        });
        bus.end_batch();

        assert!(seen.borrow().is_empty());
        assert_eq!(bus.pending(), 1);

        bus.start_batch();
        bus.end_batch();
        assert_eq!(*seen.borrow(), vec![modified("echo")]);
    }

    #[test]
    fn followups_outside_batch_dispatch_immediately() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);
        bus.on(WorldEventKind::FovChanged, |_, followups| {
            followups.emit(WorldEvent::EntityModified {
                entity: EntityId::new("echo"),
            });
        });

        bus.emit(WorldEvent::FovChanged);
        assert_eq!(*seen.borrow(), vec![modified("echo")]);
    }

    #[test]
    fn off_unregisters_only_the_given_handler() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);
        let other = bus.on(WorldEventKind::EntityModified, |_, _| {});

        assert!(bus.off(WorldEventKind::EntityModified, other));
        assert!(!bus.off(WorldEventKind::EntityModified, other));
        assert_eq!(bus.handler_count(WorldEventKind::EntityModified), 1);

        bus.emit(modified("a"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn event_names_are_camel_case() {
        assert_eq!(
            WorldEventKind::PlayerVisionUpdated.to_string(),
            "playerVisionUpdated"
        );
        assert_eq!(WorldEventKind::FovChanged.as_ref(), "fovChanged");
    }
}

use crossbeam_channel::{Receiver, Sender, unbounded};
use influence_core::NodeKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a context menu was opened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContextTarget {
    Node(NodeKey),
    Edge { src: NodeKey, dst: NodeKey },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Document
    /// Nodes or edges changed; the scene must be rebuilt.
    GraphChanged,
    DocumentLoaded {
        path: Option<PathBuf>,
        node_count: usize,
        edge_count: usize,
    },
    DocumentSaved {
        path: PathBuf,
    },
    DocumentReset,
    LoadFailed {
        error: String,
    },

    // View
    ViewChanged {
        scale: f64,
        offset: [f64; 2],
    },
    SnapChanged {
        enabled: bool,
    },

    // Interaction
    SelectionChanged {
        key: Option<NodeKey>,
    },
    HoverChanged {
        key: Option<NodeKey>,
    },
    /// Transient edge guide from a source node to the pointer (screen space).
    GuideLineChanged {
        source: NodeKey,
        to: [f64; 2],
    },
    GuideLineCleared,
    ContextMenuRequested {
        target: ContextTarget,
        screen: [f64; 2],
    },

    // ========================================================================
    // Undo/Redo Events
    // ========================================================================
    UndoStackChanged {
        can_undo: bool,
        can_redo: bool,
        undo_description: Option<String>,
        redo_description: Option<String>,
    },
}

/// Shared change feed between the editor and its views.
///
/// The queue is unbounded and nothing is dropped, so whoever owns the bus must
/// empty it regularly with [`EventBus::dispatch_to`] or [`EventBus::drain`].
/// A headless embedder that has no listeners drains it after each batch of
/// commands.
#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!("Publishing {:?}", event);
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// This is useful for processing events in the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Remove and return every pending event.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// Number of events waiting to be dispatched or drained.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Event>,
    }

    impl EventListener for Recorder {
        fn handle_event(&mut self, event: &Event) {
            self.seen.push(event.clone());
        }
    }

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let receiver = bus.receiver();

        sender
            .send(Event::SelectionChanged {
                key: Some(NodeKey::new("F3")),
            })
            .unwrap();

        match receiver.recv().unwrap() {
            Event::SelectionChanged { key } => assert_eq!(key.as_deref(), Some("F3")),
            other => panic!("Expected SelectionChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let bus = EventBus::new();
        bus.publish(Event::GraphChanged);
        bus.publish(Event::SnapChanged { enabled: false });
        bus.publish(Event::UndoStackChanged {
            can_undo: true,
            can_redo: false,
            undo_description: Some("Add node".into()),
            redo_description: None,
        });

        let mut recorder = Recorder::default();
        bus.dispatch_to(&mut recorder);

        assert_eq!(recorder.seen.len(), 3);
        assert_eq!(recorder.seen[0], Event::GraphChanged);
        assert_eq!(recorder.seen[1], Event::SnapChanged { enabled: false });
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_pending_counts_until_drained() {
        let bus = EventBus::new();
        let listener_side = bus.clone();
        for _ in 0..5 {
            bus.publish(Event::GraphChanged);
        }
        assert_eq!(listener_side.pending(), 5);
        assert_eq!(listener_side.drain().len(), 5);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_context_target_serializes() {
        let event = Event::ContextMenuRequested {
            target: ContextTarget::Edge {
                src: NodeKey::new("F1"),
                dst: NodeKey::new("F2"),
            },
            screen: [10.0, 20.0],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["ContextMenuRequested"]["target"]["Edge"]["src"], "F1");
    }
}

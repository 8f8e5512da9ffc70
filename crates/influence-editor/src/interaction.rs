use crate::controller::EditorSnapshot;
use influence_core::NodeKey;
use influence_graph::Vec2;

/// Coarse interaction state, for status bars and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    DraggingNode,
    DrawingEdge,
    Panning,
}

/// The gesture in progress. Every variant except `Idle` is left by a pointer
/// release, or dropped uncommitted when undo, redo, load or a new document
/// replaces the state underneath it.
#[derive(Debug, Clone, Default)]
pub(crate) enum InteractionState {
    #[default]
    Idle,
    DraggingNode {
        key: NodeKey,
        /// Pointer minus node origin, in world units.
        grab_offset: Vec2,
        /// State before the drag, committed on release if the node moved.
        before: Box<EditorSnapshot>,
    },
    DrawingEdge {
        source: NodeKey,
        /// Latest pointer position in screen space.
        pointer: Vec2,
    },
    Panning {
        last: Vec2,
    },
}

impl InteractionState {
    pub(crate) fn mode(&self) -> InteractionMode {
        match self {
            InteractionState::Idle => InteractionMode::Idle,
            InteractionState::DraggingNode { .. } => InteractionMode::DraggingNode,
            InteractionState::DrawingEdge { .. } => InteractionMode::DrawingEdge,
            InteractionState::Panning { .. } => InteractionMode::Panning,
        }
    }
}

//! Input classification.
//!
//! All modifier handling lives here: the state machine only ever sees a
//! [`GestureIntent`] or a [`KeyCommand`], never raw modifier bits.

use influence_core::NodeKey;
use influence_events::ContextTarget;
use influence_graph::{HitResult, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Connect modifier: primary-drag from a node draws an edge.
    pub shift: bool,
    /// Zoom modifier for the wheel, command modifier for keys.
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
}

/// Raw pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, pos: Vec2 },
    Move { pos: Vec2 },
    Up { button: PointerButton, pos: Vec2 },
    /// Positive `delta` scrolls up / zooms in.
    Wheel { delta: f64, pos: Vec2 },
}

impl PointerEvent {
    pub fn pos(&self) -> Vec2 {
        match *self {
            PointerEvent::Down { pos, .. }
            | PointerEvent::Move { pos }
            | PointerEvent::Up { pos, .. }
            | PointerEvent::Wheel { pos, .. } => pos,
        }
    }
}

/// What an idle pointer event means.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureIntent {
    DragNode(NodeKey),
    DrawEdge(NodeKey),
    CreateNode,
    ContextMenu(ContextTarget),
    Pan,
    /// Zoom at the pointer; `zoom_in` picks the direction.
    Zoom { zoom_in: bool },
    /// Plain wheel scrolling pans the view.
    Scroll { delta: Vec2 },
    Hover,
    Ignore,
}

/// Screen pixels panned per wheel notch.
pub const SCROLL_STEP: f64 = 40.0;

/// Decide what a pointer event does when no gesture is in progress.
///
/// `hit` is the hit-test result at the event position.
pub fn classify_gesture(event: &PointerEvent, modifiers: Modifiers, hit: &HitResult) -> GestureIntent {
    match *event {
        PointerEvent::Down {
            button: PointerButton::Primary,
            ..
        } => match hit {
            HitResult::Node(key) if modifiers.shift => GestureIntent::DrawEdge(key.clone()),
            HitResult::Node(key) => GestureIntent::DragNode(key.clone()),
            HitResult::Edge { .. } | HitResult::None => GestureIntent::CreateNode,
        },
        PointerEvent::Down {
            button: PointerButton::Secondary,
            ..
        } => match hit {
            HitResult::Node(key) => GestureIntent::ContextMenu(ContextTarget::Node(key.clone())),
            HitResult::Edge { src, dst } => GestureIntent::ContextMenu(ContextTarget::Edge {
                src: src.clone(),
                dst: dst.clone(),
            }),
            HitResult::None => GestureIntent::Pan,
        },
        PointerEvent::Down {
            button: PointerButton::Middle,
            ..
        } => GestureIntent::Pan,
        PointerEvent::Wheel { delta, .. } if delta == 0.0 || !delta.is_finite() => {
            GestureIntent::Ignore
        }
        PointerEvent::Wheel { delta, .. } if modifiers.ctrl => GestureIntent::Zoom {
            zoom_in: delta > 0.0,
        },
        PointerEvent::Wheel { delta, .. } => {
            let step = delta.signum() * SCROLL_STEP;
            if modifiers.shift {
                GestureIntent::Scroll {
                    delta: Vec2::new(step, 0.0),
                }
            } else {
                GestureIntent::Scroll {
                    delta: Vec2::new(0.0, step),
                }
            }
        }
        PointerEvent::Move { .. } => GestureIntent::Hover,
        PointerEvent::Up { .. } => GestureIntent::Ignore,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    F2,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    DeleteSelected,
    RenameSelected,
    Undo,
    Redo,
    ToggleSnap,
    ResetView,
    ZoomIn,
    ZoomOut,
    FitView,
}

/// Keyboard bindings. Unbound keys return `None`.
pub fn classify_key(key: Key, modifiers: Modifiers) -> Option<KeyCommand> {
    match key {
        Key::Delete | Key::Backspace => Some(KeyCommand::DeleteSelected),
        Key::F2 => Some(KeyCommand::RenameSelected),
        Key::Char(c) => {
            let c = c.to_ascii_lowercase();
            if modifiers.ctrl {
                match c {
                    'z' if modifiers.shift => Some(KeyCommand::Redo),
                    'z' => Some(KeyCommand::Undo),
                    'y' => Some(KeyCommand::Redo),
                    _ => None,
                }
            } else {
                match c {
                    'g' => Some(KeyCommand::ToggleSnap),
                    '0' => Some(KeyCommand::ResetView),
                    '+' | '=' => Some(KeyCommand::ZoomIn),
                    '-' => Some(KeyCommand::ZoomOut),
                    'f' => Some(KeyCommand::FitView),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(button: PointerButton) -> PointerEvent {
        PointerEvent::Down {
            button,
            pos: Vec2::new(10.0, 10.0),
        }
    }

    fn node_hit() -> HitResult {
        HitResult::Node(NodeKey::new("F1"))
    }

    fn edge_hit() -> HitResult {
        HitResult::Edge {
            src: NodeKey::new("F1"),
            dst: NodeKey::new("F2"),
        }
    }

    #[test]
    fn test_primary_down() {
        let ev = down(PointerButton::Primary);
        assert_eq!(
            classify_gesture(&ev, Modifiers::NONE, &node_hit()),
            GestureIntent::DragNode(NodeKey::new("F1"))
        );
        assert_eq!(
            classify_gesture(&ev, Modifiers::SHIFT, &node_hit()),
            GestureIntent::DrawEdge(NodeKey::new("F1"))
        );
        assert_eq!(
            classify_gesture(&ev, Modifiers::NONE, &HitResult::None),
            GestureIntent::CreateNode
        );
        assert_eq!(
            classify_gesture(&ev, Modifiers::SHIFT, &HitResult::None),
            GestureIntent::CreateNode
        );
    }

    #[test]
    fn test_secondary_down() {
        let ev = down(PointerButton::Secondary);
        assert_eq!(
            classify_gesture(&ev, Modifiers::NONE, &node_hit()),
            GestureIntent::ContextMenu(ContextTarget::Node(NodeKey::new("F1")))
        );
        assert!(matches!(
            classify_gesture(&ev, Modifiers::NONE, &edge_hit()),
            GestureIntent::ContextMenu(ContextTarget::Edge { .. })
        ));
        assert_eq!(
            classify_gesture(&ev, Modifiers::NONE, &HitResult::None),
            GestureIntent::Pan
        );
        assert_eq!(
            classify_gesture(&down(PointerButton::Middle), Modifiers::NONE, &node_hit()),
            GestureIntent::Pan
        );
    }

    #[test]
    fn test_wheel() {
        let up = PointerEvent::Wheel {
            delta: 1.0,
            pos: Vec2::ZERO,
        };
        let down = PointerEvent::Wheel {
            delta: -3.0,
            pos: Vec2::ZERO,
        };
        assert_eq!(
            classify_gesture(&up, Modifiers::CTRL, &HitResult::None),
            GestureIntent::Zoom { zoom_in: true }
        );
        assert_eq!(
            classify_gesture(&down, Modifiers::CTRL, &node_hit()),
            GestureIntent::Zoom { zoom_in: false }
        );
        assert_eq!(
            classify_gesture(&down, Modifiers::NONE, &HitResult::None),
            GestureIntent::Scroll {
                delta: Vec2::new(0.0, -SCROLL_STEP)
            }
        );
        assert_eq!(
            classify_gesture(&up, Modifiers::SHIFT, &HitResult::None),
            GestureIntent::Scroll {
                delta: Vec2::new(SCROLL_STEP, 0.0)
            }
        );
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            classify_key(Key::Delete, Modifiers::NONE),
            Some(KeyCommand::DeleteSelected)
        );
        assert_eq!(
            classify_key(Key::Backspace, Modifiers::NONE),
            Some(KeyCommand::DeleteSelected)
        );
        assert_eq!(classify_key(Key::F2, Modifiers::NONE), Some(KeyCommand::RenameSelected));
        assert_eq!(classify_key(Key::Char('z'), Modifiers::CTRL), Some(KeyCommand::Undo));
        assert_eq!(classify_key(Key::Char('Y'), Modifiers::CTRL), Some(KeyCommand::Redo));
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert_eq!(classify_key(Key::Char('Z'), ctrl_shift), Some(KeyCommand::Redo));
        assert_eq!(classify_key(Key::Char('G'), Modifiers::NONE), Some(KeyCommand::ToggleSnap));
        assert_eq!(classify_key(Key::Char('0'), Modifiers::NONE), Some(KeyCommand::ResetView));
        assert_eq!(classify_key(Key::Char('z'), Modifiers::NONE), None);
        assert_eq!(classify_key(Key::Char('g'), Modifiers::CTRL), None);
        assert_eq!(classify_key(Key::Char('q'), Modifiers::NONE), None);
    }
}

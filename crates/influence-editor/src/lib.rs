//! Interactive editing of influence diagrams: the gesture state machine,
//! snapshot undo/redo, modal prompts, settings and document files.

pub mod controller;
pub mod error;
pub mod gesture;
pub mod history;
pub mod interaction;
pub mod persistence;
pub mod prompt;
pub mod settings;

pub use controller::{Editor, EditorSnapshot};
pub use error::EditorError;
pub use gesture::{
    GestureIntent, Key, KeyCommand, Modifiers, PointerButton, PointerEvent, SCROLL_STEP,
    classify_gesture, classify_key,
};
pub use history::History;
pub use interaction::InteractionMode;
pub use persistence::{read_document, write_document};
pub use prompt::{
    PromptKind, PromptRequest, Prompter, ScriptedPrompter, WeightInputError, normalize_label,
    parse_weight,
};
pub use settings::{EditorSettings, LoadViewPolicy, ViewportSize};

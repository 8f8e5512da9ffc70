//! The editor context object.
//!
//! [`Editor`] owns the graph, the view, the selection, the undo history and the
//! gesture in progress. Input arrives through [`Editor::handle_pointer`] and
//! [`Editor::handle_key`]; everything else is the command surface used by menus
//! and tools. Changes are announced on the [`EventBus`].

use crate::gesture::{GestureIntent, Key, KeyCommand, Modifiers, PointerEvent, classify_gesture, classify_key};
use crate::history::History;
use crate::interaction::{InteractionMode, InteractionState};
use crate::persistence;
use crate::prompt::{PromptRequest, Prompter, normalize_label, parse_weight};
use crate::settings::{EditorSettings, LoadViewPolicy};
use crate::EditorError;
use influence_core::{
    DocumentSnapshot, EdgePresentation, InfluenceGraph, NodeKey, NodePresentation, ViewSnapshot,
};
use influence_events::{ContextTarget, Event, EventBus};
use influence_graph::{
    HitResult, HitTester, OverviewMapper, Scene, SceneOverlay, Vec2, ViewTransform, build_scene,
    content_bounds, snap_point,
};
use std::path::{Path, PathBuf};

/// Everything undo/redo restores.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub graph: InfluenceGraph,
    pub view: ViewSnapshot,
    pub selection: Option<NodeKey>,
}

pub struct Editor<P: Prompter> {
    graph: InfluenceGraph,
    view: ViewTransform,
    selection: Option<NodeKey>,
    hover: Option<NodeKey>,
    snap_enabled: bool,
    state: InteractionState,
    history: History<EditorSnapshot>,
    hit_tester: HitTester,
    settings: EditorSettings,
    prompter: P,
    event_bus: EventBus,
    document_path: Option<PathBuf>,
}

impl<P: Prompter> Editor<P> {
    pub fn new(settings: EditorSettings, prompter: P, event_bus: EventBus) -> Self {
        Self {
            graph: InfluenceGraph::new(),
            view: ViewTransform::new(settings.scale_limits()),
            selection: None,
            hover: None,
            snap_enabled: settings.snap_enabled,
            state: InteractionState::Idle,
            history: History::new(settings.history_limit, event_bus.clone()),
            hit_tester: HitTester::new(settings.node_radius, settings.edge_tolerance),
            settings,
            prompter,
            event_bus,
            document_path: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn graph(&self) -> &InfluenceGraph {
        &self.graph
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn selection(&self) -> Option<&NodeKey> {
        self.selection.as_ref()
    }

    pub fn hover(&self) -> Option<&NodeKey> {
        self.hover.as_ref()
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn mode(&self) -> InteractionMode {
        self.state.mode()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn history(&self) -> &History<EditorSnapshot> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            graph: self.graph.clone(),
            view: self.view.to_snapshot(),
            selection: self.selection.clone(),
        }
    }

    pub fn hit_test_screen(&self, screen: Vec2) -> HitResult {
        let world = self.view.screen_to_world(screen);
        self.hit_tester.hit_test(&self.graph, world, self.view.scale())
    }

    /// Screen-space scene for the renderer.
    pub fn scene(&self) -> Scene {
        let guide = match &self.state {
            InteractionState::DrawingEdge { source, pointer } => Some((source.as_str(), *pointer)),
            _ => None,
        };
        let overlay = SceneOverlay {
            selection: self.selection.as_deref(),
            hover: self.hover.as_deref(),
            guide,
        };
        build_scene(&self.graph, &self.view, &self.settings.render_metrics(), overlay)
    }

    pub fn overview(&self) -> OverviewMapper {
        OverviewMapper::new(&self.graph, &self.settings.minimap)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn handle_pointer(&mut self, event: PointerEvent, modifiers: Modifiers) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            InteractionState::Idle => self.handle_idle(event, modifiers),
            InteractionState::DraggingNode {
                key,
                grab_offset,
                before,
            } => self.handle_dragging(event, key, grab_offset, before),
            InteractionState::DrawingEdge { source, pointer } => {
                self.handle_drawing_edge(event, source, pointer)
            }
            InteractionState::Panning { last } => self.handle_panning(event, last),
        };
    }

    fn handle_idle(&mut self, event: PointerEvent, modifiers: Modifiers) -> InteractionState {
        let pos = event.pos();
        let world = self.view.screen_to_world(pos);
        let hit = self.hit_test_screen(pos);

        match classify_gesture(&event, modifiers, &hit) {
            GestureIntent::DragNode(key) => {
                let Some(node) = self.graph.node(&key) else {
                    return InteractionState::Idle;
                };
                let grab_offset = world - Vec2::new(node.x, node.y);
                self.set_selection(Some(key.clone()));
                tracing::debug!("Start dragging {}", key);
                InteractionState::DraggingNode {
                    key,
                    grab_offset,
                    before: Box::new(self.snapshot()),
                }
            }
            GestureIntent::DrawEdge(source) => {
                tracing::debug!("Start drawing edge from {}", source);
                self.event_bus.publish(Event::GuideLineChanged {
                    source: source.clone(),
                    to: pos.into(),
                });
                InteractionState::DrawingEdge {
                    source,
                    pointer: pos,
                }
            }
            GestureIntent::CreateNode => {
                self.set_selection(None);
                let request = PromptRequest::new_node_label();
                if let Some(label) = self.prompter.prompt(&request).as_deref().and_then(normalize_label) {
                    self.create_node_at(world, &label);
                }
                InteractionState::Idle
            }
            GestureIntent::ContextMenu(target) => {
                if let ContextTarget::Node(key) = &target {
                    self.set_selection(Some(key.clone()));
                }
                self.event_bus.publish(Event::ContextMenuRequested {
                    target,
                    screen: pos.into(),
                });
                InteractionState::Idle
            }
            GestureIntent::Pan => InteractionState::Panning { last: pos },
            GestureIntent::Zoom { zoom_in } => {
                let factor = if zoom_in {
                    self.settings.zoom_step
                } else {
                    1.0 / self.settings.zoom_step
                };
                self.zoom_at(factor, pos);
                InteractionState::Idle
            }
            GestureIntent::Scroll { delta } => {
                self.view.pan_by(delta);
                self.publish_view();
                InteractionState::Idle
            }
            GestureIntent::Hover => {
                let hovered = hit.node().cloned();
                if hovered != self.hover {
                    self.hover = hovered.clone();
                    self.event_bus.publish(Event::HoverChanged { key: hovered });
                }
                InteractionState::Idle
            }
            GestureIntent::Ignore => InteractionState::Idle,
        }
    }

    fn handle_dragging(
        &mut self,
        event: PointerEvent,
        key: NodeKey,
        grab_offset: Vec2,
        before: Box<EditorSnapshot>,
    ) -> InteractionState {
        match event {
            PointerEvent::Move { pos } => {
                let target = self.snap(self.view.screen_to_world(pos) - grab_offset);
                if self.graph.contains_node(&key) {
                    self.graph.move_node(&key, target.x, target.y);
                    tracing::trace!("Dragging {} to ({}, {})", key, target.x, target.y);
                    self.event_bus.publish(Event::GraphChanged);
                }
                InteractionState::DraggingNode {
                    key,
                    grab_offset,
                    before,
                }
            }
            PointerEvent::Up { .. } => {
                let moved = match (self.graph.node(&key), before.graph.node(&key)) {
                    (Some(now), Some(then)) => now.x != then.x || now.y != then.y,
                    _ => false,
                };
                if moved {
                    self.history.checkpoint("Move node", *before);
                    tracing::debug!("Committed move of {}", key);
                }
                InteractionState::Idle
            }
            _ => InteractionState::DraggingNode {
                key,
                grab_offset,
                before,
            },
        }
    }

    fn handle_drawing_edge(
        &mut self,
        event: PointerEvent,
        source: NodeKey,
        pointer: Vec2,
    ) -> InteractionState {
        match event {
            PointerEvent::Move { pos } => {
                self.event_bus.publish(Event::GuideLineChanged {
                    source: source.clone(),
                    to: pos.into(),
                });
                InteractionState::DrawingEdge {
                    source,
                    pointer: pos,
                }
            }
            PointerEvent::Up { pos, .. } => {
                self.event_bus.publish(Event::GuideLineCleared);
                let world = self.view.screen_to_world(pos);
                let target = self
                    .hit_tester
                    .hit_node(&self.graph, world, self.view.scale())
                    .cloned();
                match target {
                    Some(target) if target != source => {
                        let initial = self
                            .graph
                            .edge(&source, &target)
                            .map_or(self.settings.default_weight, |e| e.weight);
                        if let Some(weight) = self.prompt_weight(&source, &target, initial) {
                            self.create_or_update_edge(&source, &target, weight);
                        }
                    }
                    _ => tracing::debug!("Edge gesture from {} cancelled", source),
                }
                InteractionState::Idle
            }
            _ => InteractionState::DrawingEdge { source, pointer },
        }
    }

    fn handle_panning(&mut self, event: PointerEvent, last: Vec2) -> InteractionState {
        match event {
            PointerEvent::Move { pos } => {
                self.view.pan_by(pos - last);
                self.publish_view();
                InteractionState::Panning { last: pos }
            }
            PointerEvent::Up { .. } => InteractionState::Idle,
            _ => InteractionState::Panning { last },
        }
    }

    /// Ask for a weight until a valid one is given, the user cancels, or the
    /// attempt budget runs out.
    fn prompt_weight(&mut self, src: &NodeKey, dst: &NodeKey, initial: f64) -> Option<f64> {
        let mut request = PromptRequest::edge_weight(src, dst, initial);
        for _ in 0..self.settings.max_prompt_attempts.max(1) {
            let answer = self.prompter.prompt(&request)?;
            match parse_weight(&answer, self.settings.weight_min, self.settings.weight_max) {
                Ok(weight) => return Some(weight),
                Err(e) => {
                    tracing::debug!("Rejected weight input: {}", e);
                    request.initial = answer;
                    request.error = Some(e.to_string());
                }
            }
        }
        tracing::debug!("Giving up on weight for {} -> {}", src, dst);
        None
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Run the command bound to `key`. Keys are ignored while a gesture is in
    /// progress.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Option<KeyCommand> {
        if self.mode() != InteractionMode::Idle {
            return None;
        }
        let command = classify_key(key, modifiers)?;
        match command {
            KeyCommand::DeleteSelected => {
                self.delete_selected();
            }
            KeyCommand::RenameSelected => {
                self.prompt_rename_selected();
            }
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::ToggleSnap => self.toggle_snap(),
            KeyCommand::ResetView => self.reset_view(),
            KeyCommand::ZoomIn => self.zoom_in(),
            KeyCommand::ZoomOut => self.zoom_out(),
            KeyCommand::FitView => self.fit_view(),
        }
        Some(command)
    }

    // ------------------------------------------------------------------
    // Model commands
    // ------------------------------------------------------------------

    /// Create a node at a world point (snapped if snapping is on). Blank labels
    /// are rejected, as is any node once the key counter is used up.
    pub fn create_node_at(&mut self, world: Vec2, label: &str) -> Option<NodeKey> {
        let label = normalize_label(label)?;
        if self.graph.keys_exhausted() {
            tracing::warn!("Not adding {:?}: no node keys left", label);
            return None;
        }
        let pos = self.snap(world);
        self.checkpoint("Add node");
        let key = match self.graph.add_node(label, pos.x, pos.y) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Add node failed: {}", e);
                return None;
            }
        };
        self.event_bus.publish(Event::GraphChanged);
        Some(key)
    }

    pub fn delete_node(&mut self, key: &str) -> bool {
        if !self.graph.contains_node(key) {
            return false;
        }
        self.checkpoint("Delete node");
        self.graph.remove_node(key);
        if self.selection.as_deref() == Some(key) {
            self.set_selection(None);
        }
        if self.hover.as_deref() == Some(key) {
            self.hover = None;
        }
        self.event_bus.publish(Event::GraphChanged);
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selection.clone() {
            Some(key) => self.delete_node(&key),
            None => false,
        }
    }

    pub fn rename_node(&mut self, key: &str, label: &str) -> bool {
        let Some(label) = normalize_label(label) else {
            return false;
        };
        match self.graph.node(key) {
            Some(node) if node.label != label => {}
            _ => return false,
        }
        self.checkpoint("Rename node");
        self.graph.rename_node(key, label);
        self.event_bus.publish(Event::GraphChanged);
        true
    }

    pub fn rename_selected(&mut self, label: &str) -> bool {
        match self.selection.clone() {
            Some(key) => self.rename_node(&key, label),
            None => false,
        }
    }

    /// Prompt for a new label for the selected node.
    pub fn prompt_rename_selected(&mut self) -> bool {
        let Some(key) = self.selection.clone() else {
            return false;
        };
        let Some(node) = self.graph.node(&key) else {
            return false;
        };
        let request = PromptRequest::rename_node(&key, &node.label);
        match self.prompter.prompt(&request) {
            Some(label) => self.rename_node(&key, &label),
            None => false,
        }
    }

    pub fn set_node_presentation(&mut self, key: &str, presentation: NodePresentation) -> bool {
        match self.graph.node(key) {
            Some(node) if node.presentation != presentation => {}
            _ => return false,
        }
        self.checkpoint("Restyle node");
        self.graph.set_node_presentation(key, presentation);
        self.event_bus.publish(Event::GraphChanged);
        true
    }

    /// Insert an edge or overwrite the weight of an existing one.
    ///
    /// Self-loops, missing endpoints and weights outside the configured range
    /// are refused.
    pub fn create_or_update_edge(&mut self, src: &str, dst: &str, weight: f64) -> bool {
        if src == dst || !self.graph.contains_node(src) || !self.graph.contains_node(dst) {
            return false;
        }
        if !self.settings.weight_in_range(weight) {
            tracing::debug!("Refusing edge weight {} outside range", weight);
            return false;
        }
        let description = match self.graph.edge(src, dst) {
            Some(edge) if edge.weight == weight => return false,
            Some(_) => "Change edge weight",
            None => "Add edge",
        };
        self.checkpoint(description);
        match self.graph.edge(src, dst) {
            Some(_) => self.graph.set_edge_weight(src, dst, weight),
            None => self.graph.add_edge(src, dst, weight),
        }
        self.event_bus.publish(Event::GraphChanged);
        true
    }

    /// Prompt for a new weight for an existing edge.
    pub fn edit_edge_weight(&mut self, src: &str, dst: &str) -> bool {
        let Some(edge) = self.graph.edge(src, dst) else {
            return false;
        };
        let (src, dst, initial) = (edge.src.clone(), edge.dst.clone(), edge.weight);
        match self.prompt_weight(&src, &dst, initial) {
            Some(weight) => self.create_or_update_edge(&src, &dst, weight),
            None => false,
        }
    }

    pub fn set_edge_presentation(&mut self, src: &str, dst: &str, presentation: EdgePresentation) -> bool {
        match self.graph.edge(src, dst) {
            Some(edge) if edge.presentation != presentation => {}
            _ => return false,
        }
        self.checkpoint("Restyle edge");
        self.graph.set_edge_presentation(src, dst, presentation);
        self.event_bus.publish(Event::GraphChanged);
        true
    }

    pub fn delete_edge(&mut self, src: &str, dst: &str) -> bool {
        if self.graph.edge(src, dst).is_none() {
            return false;
        }
        self.checkpoint("Delete edge");
        self.graph.remove_edge(src, dst);
        self.event_bus.publish(Event::GraphChanged);
        true
    }

    // ------------------------------------------------------------------
    // View commands (not undoable)
    // ------------------------------------------------------------------

    pub fn set_snap(&mut self, enabled: bool) {
        if self.snap_enabled != enabled {
            self.snap_enabled = enabled;
            tracing::debug!("Snap {}", if enabled { "on" } else { "off" });
            self.event_bus.publish(Event::SnapChanged { enabled });
        }
    }

    pub fn toggle_snap(&mut self) {
        self.set_snap(!self.snap_enabled);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.publish_view();
    }

    pub fn zoom_at(&mut self, factor: f64, anchor: Vec2) -> bool {
        let changed = self.view.zoom_at(factor, anchor);
        if changed {
            self.publish_view();
        }
        changed
    }

    pub fn zoom_in(&mut self) {
        let center = self.viewport_center();
        self.zoom_at(self.settings.zoom_step, center);
    }

    pub fn zoom_out(&mut self) {
        let center = self.viewport_center();
        self.zoom_at(1.0 / self.settings.zoom_step, center);
    }

    /// Fit all nodes into the viewport. An empty graph resets the view.
    pub fn fit_view(&mut self) {
        match content_bounds(&self.graph) {
            Some(bounds) => {
                let padding = self.settings.minimap.content_padding;
                self.view.fit_bounds(bounds, self.settings.viewport.into(), padding);
            }
            None => self.view.reset(),
        }
        self.publish_view();
    }

    /// Centre the main view on the world point under a minimap click.
    pub fn navigate_minimap(&mut self, minimap_point: Vec2) -> Vec2 {
        let target = self
            .overview()
            .navigate(minimap_point, &mut self.view, self.settings.viewport.into());
        self.publish_view();
        target
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn checkpoint(&mut self, description: &str) {
        let snapshot = self.snapshot();
        self.history.checkpoint(description, snapshot);
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.cancel_gesture();
        self.graph = snapshot.graph;
        self.view.apply_snapshot(&snapshot.view);
        let selection = snapshot
            .selection
            .filter(|key| self.graph.contains_node(key));
        if self.hover.as_ref().is_some_and(|key| !self.graph.contains_node(key)) {
            self.hover = None;
        }
        self.event_bus.publish(Event::GraphChanged);
        self.publish_view();
        self.set_selection(selection);
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Serialize the current document.
    pub fn save(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            graph: self.graph.to_snapshot(),
            view: Some(self.view.to_snapshot()),
        }
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), EditorError> {
        persistence::write_document(path, &self.save())?;
        self.document_path = Some(path.to_path_buf());
        self.event_bus.publish(Event::DocumentSaved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Replace the document. The previous one stays reachable through undo.
    pub fn load(&mut self, document: DocumentSnapshot) -> Result<(), EditorError> {
        self.load_document(document, None)
    }

    /// Parse and load a JSON document. On failure nothing changes.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        match DocumentSnapshot::from_json_str(json) {
            Ok(document) => self.load_document(document, None),
            Err(e) => Err(self.load_failed(e.into())),
        }
    }

    pub fn open(&mut self, path: &Path) -> Result<(), EditorError> {
        match persistence::read_document(path) {
            Ok(document) => self.load_document(document, Some(path.to_path_buf())),
            Err(e) => Err(self.load_failed(e)),
        }
    }

    fn load_document(
        &mut self,
        document: DocumentSnapshot,
        path: Option<PathBuf>,
    ) -> Result<(), EditorError> {
        let graph = match InfluenceGraph::from_snapshot(document.graph) {
            Ok(graph) => graph,
            Err(e) => return Err(self.load_failed(e.into())),
        };

        self.cancel_gesture();
        self.checkpoint("Load document");
        self.graph = graph;
        match self.settings.load_view_policy {
            LoadViewPolicy::FromSnapshot => {
                self.view.reset();
                if let Some(view) = &document.view {
                    self.view.apply_snapshot(view);
                }
            }
            LoadViewPolicy::Reset => self.view.reset(),
            LoadViewPolicy::Preserve => {}
        }
        self.hover = None;
        self.set_selection(None);
        self.document_path = path.clone();

        tracing::info!(
            "Loaded document with {} nodes and {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.event_bus.publish(Event::DocumentLoaded {
            path,
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
        });
        self.event_bus.publish(Event::GraphChanged);
        self.publish_view();
        Ok(())
    }

    fn load_failed(&self, error: EditorError) -> EditorError {
        tracing::warn!("Load failed: {}", error);
        self.event_bus.publish(Event::LoadFailed {
            error: error.to_string(),
        });
        error
    }

    /// Start an empty document with an identity view.
    pub fn new_document(&mut self) {
        self.cancel_gesture();
        self.checkpoint("New document");
        self.graph = InfluenceGraph::new();
        self.view.reset();
        self.hover = None;
        self.set_selection(None);
        self.document_path = None;
        tracing::info!("New document");
        self.event_bus.publish(Event::DocumentReset);
        self.event_bus.publish(Event::GraphChanged);
        self.publish_view();
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Drop the gesture in progress without committing it. A drag's `before`
    /// snapshot belongs to the document it started on.
    fn cancel_gesture(&mut self) {
        let state = std::mem::take(&mut self.state);
        match state.mode() {
            InteractionMode::Idle => {}
            InteractionMode::DrawingEdge => {
                self.event_bus.publish(Event::GuideLineCleared);
                tracing::debug!("Cancelled edge drawing");
            }
            mode => tracing::debug!("Cancelled {:?} gesture", mode),
        }
    }

    fn snap(&self, world: Vec2) -> Vec2 {
        if self.snap_enabled {
            snap_point(world, self.settings.grid_step)
        } else {
            world
        }
    }

    fn viewport_center(&self) -> Vec2 {
        Vec2::from(self.settings.viewport) * 0.5
    }

    fn set_selection(&mut self, key: Option<NodeKey>) {
        if self.selection != key {
            self.selection = key.clone();
            self.event_bus.publish(Event::SelectionChanged { key });
        }
    }

    fn publish_view(&self) {
        self.event_bus.publish(Event::ViewChanged {
            scale: self.view.scale(),
            offset: self.view.offset().into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PointerButton;
    use crate::prompt::ScriptedPrompter;

    fn editor() -> Editor<ScriptedPrompter> {
        let settings = EditorSettings {
            snap_enabled: false,
            ..Default::default()
        };
        Editor::new(settings, ScriptedPrompter::new(), EventBus::new())
    }

    fn down(button: PointerButton, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            button,
            pos: Vec2::new(x, y),
        }
    }

    fn up(button: PointerButton, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            button,
            pos: Vec2::new(x, y),
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            pos: Vec2::new(x, y),
        }
    }

    #[test]
    fn test_click_on_empty_canvas_creates_node() {
        let mut editor = editor();
        editor.prompter_mut().push_answer("Preis");

        editor.handle_pointer(down(PointerButton::Primary, 260.0, 220.0), Modifiers::NONE);
        editor.handle_pointer(up(PointerButton::Primary, 260.0, 220.0), Modifiers::NONE);

        let node = editor.graph().node("F1").unwrap();
        assert_eq!((node.x, node.y, node.label.as_str()), (260.0, 220.0, "Preis"));
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert_eq!(editor.history().undo_description().as_deref(), Some("Add node"));
    }

    #[test]
    fn test_cancelled_or_blank_label_creates_nothing() {
        let mut editor = editor();
        editor.prompter_mut().push_cancel();
        editor.prompter_mut().push_answer("   ");

        editor.handle_pointer(down(PointerButton::Primary, 10.0, 10.0), Modifiers::NONE);
        editor.handle_pointer(down(PointerButton::Primary, 10.0, 10.0), Modifiers::NONE);

        assert!(editor.graph().is_empty());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_node_creation_snaps_to_grid() {
        let mut editor = editor();
        editor.set_snap(true);
        let key = editor.create_node_at(Vec2::new(37.0, 11.0), "A").unwrap();
        let node = editor.graph().node(&key).unwrap();
        assert_eq!((node.x, node.y), (48.0, 0.0));
    }

    #[test]
    fn test_drag_moves_live_and_commits_once() {
        let mut editor = editor();
        let key = editor.create_node_at(Vec2::new(100.0, 100.0), "A").unwrap();

        // Grab 5px right of the centre.
        editor.handle_pointer(down(PointerButton::Primary, 105.0, 100.0), Modifiers::NONE);
        assert_eq!(editor.mode(), InteractionMode::DraggingNode);
        assert_eq!(editor.selection(), Some(&key));

        editor.handle_pointer(moved(155.0, 130.0), Modifiers::NONE);
        let node = editor.graph().node(&key).unwrap();
        assert_eq!((node.x, node.y), (150.0, 130.0));
        assert_eq!(editor.history().undo_len(), 1);

        editor.handle_pointer(moved(205.0, 160.0), Modifiers::NONE);
        editor.handle_pointer(up(PointerButton::Primary, 205.0, 160.0), Modifiers::NONE);
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert_eq!(editor.history().undo_len(), 2);

        assert!(editor.undo());
        let node = editor.graph().node(&key).unwrap();
        assert_eq!((node.x, node.y), (100.0, 100.0));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut editor = editor();
        editor.create_node_at(Vec2::new(100.0, 100.0), "A").unwrap();
        editor.handle_pointer(down(PointerButton::Primary, 100.0, 100.0), Modifiers::NONE);
        editor.handle_pointer(up(PointerButton::Primary, 100.0, 100.0), Modifiers::NONE);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_pan_moves_offset_and_is_not_undoable() {
        let mut editor = editor();
        editor.handle_pointer(down(PointerButton::Secondary, 10.0, 10.0), Modifiers::NONE);
        assert_eq!(editor.mode(), InteractionMode::Panning);
        editor.handle_pointer(moved(30.0, 5.0), Modifiers::NONE);
        editor.handle_pointer(moved(40.0, 15.0), Modifiers::NONE);
        editor.handle_pointer(up(PointerButton::Secondary, 40.0, 15.0), Modifiers::NONE);

        assert_eq!(editor.view().offset(), Vec2::new(30.0, 5.0));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_ctrl_wheel_zooms_at_pointer() {
        let mut editor = editor();
        let pointer = Vec2::new(300.0, 200.0);
        let before = editor.view().screen_to_world(pointer);
        editor.handle_pointer(
            PointerEvent::Wheel {
                delta: 1.0,
                pos: pointer,
            },
            Modifiers::CTRL,
        );
        assert!((editor.view().scale() - 1.1).abs() < 1e-12);
        let after = editor.view().screen_to_world(pointer);
        assert!((after.x - before.x).abs() < 1e-9 && (after.y - before.y).abs() < 1e-9);
    }

    #[test]
    fn test_hover_changes_are_published_once() {
        let mut editor = editor();
        editor.create_node_at(Vec2::new(50.0, 50.0), "A").unwrap();
        editor.event_bus().drain();

        editor.handle_pointer(moved(52.0, 50.0), Modifiers::NONE);
        editor.handle_pointer(moved(53.0, 50.0), Modifiers::NONE);
        editor.handle_pointer(moved(200.0, 200.0), Modifiers::NONE);

        let hovers: Vec<_> = editor
            .event_bus()
            .drain()
            .into_iter()
            .filter(|e| matches!(e, Event::HoverChanged { .. }))
            .collect();
        assert_eq!(
            hovers,
            vec![
                Event::HoverChanged {
                    key: Some(NodeKey::new("F1"))
                },
                Event::HoverChanged { key: None },
            ]
        );
    }

    #[test]
    fn test_keys_are_ignored_during_gesture() {
        let mut editor = editor();
        editor.handle_pointer(down(PointerButton::Middle, 0.0, 0.0), Modifiers::NONE);
        assert_eq!(editor.handle_key(Key::Char('g'), Modifiers::NONE), None);
        assert!(!editor.snap_enabled());
        editor.handle_pointer(up(PointerButton::Middle, 0.0, 0.0), Modifiers::NONE);
        assert_eq!(
            editor.handle_key(Key::Char('g'), Modifiers::NONE),
            Some(KeyCommand::ToggleSnap)
        );
        assert!(editor.snap_enabled());
    }

    #[test]
    fn test_undo_mid_drag_drops_the_gesture() {
        let mut editor = editor();
        let a = editor.create_node_at(Vec2::new(100.0, 100.0), "A").unwrap();
        editor.create_node_at(Vec2::new(300.0, 100.0), "B").unwrap();

        editor.handle_pointer(down(PointerButton::Primary, 100.0, 100.0), Modifiers::NONE);
        editor.handle_pointer(moved(150.0, 150.0), Modifiers::NONE);
        assert!(editor.undo());
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert_eq!(editor.history().redo_len(), 1);

        editor.handle_pointer(moved(200.0, 200.0), Modifiers::NONE);
        editor.handle_pointer(up(PointerButton::Primary, 200.0, 200.0), Modifiers::NONE);
        assert_eq!(editor.history().undo_len(), 1);
        assert_eq!(editor.history().redo_len(), 1);
        assert_eq!(editor.history().undo_description().as_deref(), Some("Add node"));
        let node = editor.graph().node(&a).unwrap();
        assert_eq!((node.x, node.y), (100.0, 100.0));
    }

    #[test]
    fn test_load_and_new_document_end_gestures() {
        let mut editor = editor();
        editor.create_node_at(Vec2::new(100.0, 100.0), "A").unwrap();
        editor.create_node_at(Vec2::new(300.0, 100.0), "B").unwrap();

        editor.handle_pointer(down(PointerButton::Primary, 100.0, 100.0), Modifiers::NONE);
        editor.handle_pointer(moved(150.0, 150.0), Modifiers::NONE);
        editor
            .load_json(r#"{ "nodes": { "F1": { "x": 0, "y": 0, "label": "X" } }, "edges": [] }"#)
            .unwrap();
        editor.handle_pointer(up(PointerButton::Primary, 150.0, 150.0), Modifiers::NONE);
        assert_eq!(
            editor.history().undo_description().as_deref(),
            Some("Load document")
        );
        let node = editor.graph().node("F1").unwrap();
        assert_eq!((node.x, node.y), (0.0, 0.0));

        editor.handle_pointer(down(PointerButton::Primary, 0.0, 0.0), Modifiers::SHIFT);
        assert_eq!(editor.mode(), InteractionMode::DrawingEdge);
        editor.event_bus().drain();
        editor.new_document();
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert!(editor.scene().guide.is_none());
        assert!(editor.event_bus().drain().contains(&Event::GuideLineCleared));
        editor.handle_pointer(up(PointerButton::Primary, 0.0, 0.0), Modifiers::NONE);
        assert_eq!(
            editor.history().undo_description().as_deref(),
            Some("New document")
        );
    }

    #[test]
    fn test_create_node_stops_when_keys_run_out() {
        let mut editor = editor();
        editor
            .load_json(r#"{ "nodes": {}, "edges": [], "counter": 18446744073709551614 }"#)
            .unwrap();
        let last = editor.create_node_at(Vec2::ZERO, "Letzter").unwrap();
        assert_eq!(last.as_str(), "F18446744073709551614");
        let undo_len = editor.history().undo_len();

        assert_eq!(editor.create_node_at(Vec2::new(50.0, 50.0), "Zu viel"), None);
        assert_eq!(editor.graph().node_count(), 1);
        assert_eq!(editor.history().undo_len(), undo_len);
    }
}

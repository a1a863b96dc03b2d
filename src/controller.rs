//! Interaction controller: turns input events into graph, transform and
//! selection updates.
//!
//! [`EditorState`] is a plain reducer. Every event goes through
//! [`EditorState::update`] together with the host-owned [`EditMode`] and the
//! [`EditorConfig`], and the returned [`Changes`] tell the host what to redraw.
//! Handlers run to completion before the next event; nothing is deferred.
//!
//! [`TraceEditorController`] wraps the state in `Rc<RefCell<_>>` and hands
//! out ready-made closures for Slint callbacks.
//!
//! # Example
//!
//! ```ignore
//! use slint_trace_editor::{EditMode, EditorConfig, TraceEditorController};
//!
//! let ctrl = TraceEditorController::new(EditorConfig::default());
//! ctrl.set_mode(EditMode::Edit);
//!
//! window.on_pointer_down(ctrl.pointer_down_callback());
//! window.on_pointer_moved(ctrl.pointer_move_callback());
//! window.on_pointer_up(ctrl.pointer_up_callback());
//! window.on_scrolled(ctrl.scroll_callback());
//! window.on_key_pressed(ctrl.key_pressed_callback());
//!
//! ctrl.on_changed({
//!     let models = models.clone();
//!     let ctrl = ctrl.clone();
//!     move |_| models.sync(&ctrl.scene())
//! });
//! ```

use crate::config::EditorConfig;
use crate::graph::{EdgeId, GraphData, NodeId, Removed};
use crate::hit_test::{hit_test, Hit};
use crate::import::{ImportReport, SkeletonResult};
use crate::input::{classify_gesture, EditMode, EditorKey, GestureKind, InputEvent, Modifiers, PointerButton};
use crate::layers::LayerStack;
use crate::scene::Scene;
use crate::selection::{ChainState, Selection, SelectionState};
use crate::viewport::{Point, ViewTransform};
use slint::platform::PointerEventButton;
use slint::SharedString;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Which parts of the editor an event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    pub graph: bool,
    pub view: bool,
    pub selection: bool,
}

impl Changes {
    pub const NONE: Changes = Changes { graph: false, view: false, selection: false };

    pub fn any(&self) -> bool {
        self.graph || self.view || self.selection
    }

    fn graph() -> Self {
        Changes { graph: true, selection: true, ..Self::NONE }
    }

    fn view() -> Self {
        Changes { view: true, ..Self::NONE }
    }

    fn selection() -> Self {
        Changes { selection: true, ..Self::NONE }
    }
}

/// The gesture in progress, fixed at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    None,
    Panning { last: Point },
    Editing,
}

/// Graph, view transform, selection and raster layers, plus the in-flight
/// gesture.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    graph: GraphData,
    view: ViewTransform,
    selection: SelectionState,
    layers: LayerStack,
    /// Top-left of the canvas container in pointer-event coordinates.
    origin: Point,
    gesture: Gesture,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(graph: GraphData) -> Self {
        Self { graph, ..Self::default() }
    }

    pub fn graph(&self) -> &GraphData {
        &self.graph
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn chain_anchor(&self) -> Option<&NodeId> {
        self.selection.chain.anchor()
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Replace the view. The scale is clamped into `MIN_SCALE..=MAX_SCALE`.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view.sanitized();
    }

    /// Center and fit an image of `image_size` into the canvas.
    pub fn fit_image(&mut self, image_size: (f32, f32), viewport_size: (f32, f32), config: &EditorConfig) {
        self.view = ViewTransform::fit_image(image_size, viewport_size, config);
    }

    /// Fit the bottom layer into the canvas. Returns `false` without layers.
    pub fn fit_to_layers(&mut self, viewport_size: (f32, f32), config: &EditorConfig) -> bool {
        match self.layers.image_size() {
            Some(size) => {
                self.fit_image(size, viewport_size, config);
                true
            }
            None => false,
        }
    }

    /// Pointer position (event coordinates) to image coordinates.
    pub fn to_image_coords(&self, position: Point) -> Point {
        self.view.to_image_coords(position, self.origin)
    }

    /// Replace the graph wholesale, e.g. with an imported computation result.
    /// Chain and selection refer to the old graph and are dropped.
    pub fn replace_graph(&mut self, graph: GraphData) -> Changes {
        self.graph = graph;
        self.selection.reset();
        Changes::graph()
    }

    /// Import a computed skeleton, replacing the current graph.
    pub fn import_skeleton(&mut self, result: &SkeletonResult) -> ImportReport {
        let (graph, report) = result.to_graph();
        self.replace_graph(graph);
        report
    }

    pub fn clear_graph(&mut self) -> Changes {
        self.graph.clear();
        self.selection.reset();
        Changes::graph()
    }

    /// Render projection of the current state.
    pub fn scene(&self, mode: EditMode, config: &EditorConfig) -> Scene {
        Scene::project(self, mode, config)
    }

    // === Reducer ===

    /// Apply one input event.
    pub fn update(&mut self, event: &InputEvent, mode: EditMode, config: &EditorConfig) -> Changes {
        match *event {
            InputEvent::PointerDown { position, button, modifiers } => {
                self.pointer_down(position, button, modifiers, mode, config)
            }
            InputEvent::PointerMove { position } => self.pointer_move(position, mode),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::PointerLeave => {
                self.gesture = Gesture::None;
                if self.selection.ghost.take().is_some() {
                    Changes::selection()
                } else {
                    Changes::NONE
                }
            }
            InputEvent::Wheel { position, delta } => self.wheel(position, delta, config),
            InputEvent::KeyDown { key } => self.key_down(key, mode),
            InputEvent::ContextMenuDelete => {
                if mode != EditMode::Edit {
                    self.selection.close_context_menu();
                    return Changes::selection();
                }
                if let Some(menu) = self.selection.context_menu.take() {
                    self.selection.select(menu.target);
                }
                self.delete_selected()
            }
            InputEvent::DismissContextMenu => {
                if self.selection.context_menu.take().is_some() {
                    Changes::selection()
                } else {
                    Changes::NONE
                }
            }
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
        mode: EditMode,
        config: &EditorConfig,
    ) -> Changes {
        match classify_gesture(button, modifiers, mode) {
            GestureKind::Pan => {
                trace!(x = position.x, y = position.y, "pan started");
                self.gesture = Gesture::Panning { last: position };
                Changes::NONE
            }
            GestureKind::Context => {
                self.gesture = Gesture::None;
                self.cancel_chain();
                if mode == EditMode::Edit {
                    let target = match self.hit(position, config) {
                        Hit::Node(id) => Selection::Node(id),
                        Hit::Edge(id) => Selection::Edge(id),
                        Hit::Empty => Selection::None,
                    };
                    self.selection.open_context_menu(target, position - self.origin);
                }
                Changes::selection()
            }
            GestureKind::Edit => {
                self.gesture = Gesture::Editing;
                self.edit_click(position, config)
            }
            GestureKind::Ignore => Changes::NONE,
        }
    }

    /// A plain left click in edit mode.
    fn edit_click(&mut self, position: Point, config: &EditorConfig) -> Changes {
        let point = self.to_image_coords(position);
        self.selection.ghost = Some(point);

        match self.hit(position, config) {
            Hit::Node(clicked) => {
                let mut changes = Changes::selection();
                if let Some(anchor) = self.selection.live_anchor(&self.graph).cloned() {
                    if anchor != clicked && self.graph.add_edge(&anchor, &clicked).is_some() {
                        changes = Changes::graph();
                    }
                }
                trace!(anchor = %clicked, "chain continues from existing node");
                self.selection.chain = ChainState::Chaining(clicked);
                self.selection.clear_selection();
                self.selection.close_context_menu();
                changes
            }
            Hit::Edge(id) => {
                self.selection.select(Selection::Edge(id));
                self.selection.close_context_menu();
                Changes::selection()
            }
            Hit::Empty => {
                self.selection.clear_selection();
                self.selection.close_context_menu();
                let anchor = self.selection.live_anchor(&self.graph).cloned();
                let new_id = self.graph.add_node(point);
                if let Some(anchor) = anchor {
                    self.graph.add_edge(&anchor, &new_id);
                }
                trace!(anchor = %new_id, "chain extended with new node");
                self.selection.chain = ChainState::Chaining(new_id);
                Changes::graph()
            }
        }
    }

    fn pointer_move(&mut self, position: Point, mode: EditMode) -> Changes {
        if let Gesture::Panning { last } = self.gesture {
            self.view = self.view.panned(position - last);
            self.gesture = Gesture::Panning { last: position };
            return Changes::view();
        }
        if mode == EditMode::Edit {
            self.selection.ghost = Some(self.to_image_coords(position));
            Changes::selection()
        } else if self.selection.ghost.take().is_some() {
            Changes::selection()
        } else {
            Changes::NONE
        }
    }

    fn pointer_up(&mut self) -> Changes {
        if self.is_panning() {
            trace!("pan ended");
        }
        self.gesture = Gesture::None;
        Changes::NONE
    }

    fn wheel(&mut self, position: Point, delta: f32, config: &EditorConfig) -> Changes {
        let zoomed = self.view.zoomed(position - self.origin, delta, config);
        if zoomed == self.view {
            return Changes::NONE;
        }
        self.view = zoomed;
        Changes::view()
    }

    fn key_down(&mut self, key: EditorKey, mode: EditMode) -> Changes {
        match key {
            EditorKey::Escape => {
                self.cancel_chain();
                Changes::selection()
            }
            k if k.is_delete() && mode == EditMode::Edit => self.delete_selected(),
            _ => Changes::NONE,
        }
    }

    fn hit(&self, position: Point, config: &EditorConfig) -> Hit {
        hit_test(&self.graph, &self.view, self.to_image_coords(position), config)
    }

    fn cancel_chain(&mut self) {
        if let ChainState::Chaining(anchor) = &self.selection.chain {
            debug!(%anchor, "chain abandoned");
        }
        self.selection.reset();
    }

    // === Deletion ===

    /// Delete whatever is selected. Node deletion wins if, somehow, both are.
    pub fn delete_selected(&mut self) -> Changes {
        let removed = match self.selection.selection.clone() {
            Selection::Node(id) => self.graph.remove_node(&id),
            Selection::Edge(id) => self.graph.remove_edge(&id),
            Selection::None => {
                self.selection.close_context_menu();
                return Changes::selection();
            }
        };
        self.after_removal(removed)
    }

    /// Delete a node and its edges. Resets the chain if it was the anchor.
    pub fn delete_node(&mut self, id: &NodeId) -> Changes {
        let removed = self.graph.remove_node(id);
        self.after_removal(removed)
    }

    /// Delete an edge and prune isolated nodes. Resets the chain if its anchor
    /// was pruned.
    pub fn delete_edge(&mut self, id: &EdgeId) -> Changes {
        let removed = self.graph.remove_edge(id);
        self.after_removal(removed)
    }

    fn after_removal(&mut self, removed: Removed) -> Changes {
        self.selection.clear_selection();
        self.selection.close_context_menu();
        if removed.is_empty() {
            return Changes::selection();
        }
        if let Some(anchor) = self.selection.chain.anchor() {
            if removed.contains_node(anchor) {
                debug!(%anchor, "chain anchor deleted, chain reset");
            }
        }
        self.selection.forget_stale(&self.graph);
        Changes::graph()
    }
}

// ============================================================================
// Shared controller for Slint callbacks
// ============================================================================

type ChangeHook = Box<dyn Fn(Changes)>;

/// Controller that owns an [`EditorState`] and provides callback implementations.
///
/// Clone this controller to share it across callbacks. The edit mode is owned
/// by the host and only read here.
#[derive(Clone)]
pub struct TraceEditorController {
    state: Rc<RefCell<EditorState>>,
    config: Rc<RefCell<EditorConfig>>,
    mode: Rc<Cell<EditMode>>,
    on_changed: Rc<RefCell<Option<ChangeHook>>>,
}

fn checked_config(config: EditorConfig) -> EditorConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            warn!(error = %err, "invalid editor config, using defaults");
            EditorConfig::default()
        }
    }
}

impl Default for TraceEditorController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl TraceEditorController {
    /// An invalid `config` is replaced by the defaults.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(EditorState::new())),
            config: Rc::new(RefCell::new(checked_config(config))),
            mode: Rc::new(Cell::new(EditMode::default())),
            on_changed: Rc::new(RefCell::new(None)),
        }
    }

    /// Access to the editor state.
    pub fn state(&self) -> Rc<RefCell<EditorState>> {
        self.state.clone()
    }

    pub fn config(&self) -> EditorConfig {
        self.config.borrow().clone()
    }

    /// Replace the config. An invalid `config` is replaced by the defaults.
    pub fn set_config(&self, config: EditorConfig) {
        *self.config.borrow_mut() = checked_config(config);
    }

    pub fn mode(&self) -> EditMode {
        self.mode.get()
    }

    /// Forward the host's view/edit toggle.
    pub fn set_mode(&self, mode: EditMode) {
        self.mode.set(mode);
    }

    pub fn set_canvas_origin(&self, x: f32, y: f32) {
        self.state.borrow_mut().set_canvas_origin(Point::new(x, y));
    }

    /// Register a hook called after every event that changed something.
    pub fn on_changed(&self, hook: impl Fn(Changes) + 'static) {
        *self.on_changed.borrow_mut() = Some(Box::new(hook));
    }

    /// Apply an event and notify the change hook.
    pub fn dispatch(&self, event: InputEvent) -> Changes {
        let changes = {
            let config = self.config.borrow();
            self.state.borrow_mut().update(&event, self.mode.get(), &config)
        };
        self.notify(changes);
        changes
    }

    /// Replace the graph with a computed skeleton.
    pub fn import_skeleton(&self, result: &SkeletonResult) -> ImportReport {
        let report = self.state.borrow_mut().import_skeleton(result);
        self.notify(Changes::graph());
        report
    }

    pub fn clear_graph(&self) {
        let changes = self.state.borrow_mut().clear_graph();
        self.notify(changes);
    }

    /// Edit the layer stack and redraw.
    pub fn with_layers<R>(&self, f: impl FnOnce(&mut LayerStack) -> R) -> R {
        let result = f(self.state.borrow_mut().layers_mut());
        self.notify(Changes::view());
        result
    }

    /// Fit the bottom layer into a canvas of `width` x `height`.
    pub fn fit_to_layers(&self, width: f32, height: f32) {
        let fitted = {
            let config = self.config.borrow();
            self.state.borrow_mut().fit_to_layers((width, height), &config)
        };
        if fitted {
            self.notify(Changes::view());
        }
    }

    /// Replace the graph wholesale, e.g. from a saved document.
    pub fn replace_graph(&self, graph: GraphData) {
        let changes = self.state.borrow_mut().replace_graph(graph);
        self.notify(changes);
    }

    /// Snapshot of the graph for external consumers.
    pub fn graph(&self) -> GraphData {
        self.state.borrow().graph().clone()
    }

    pub fn scene(&self) -> Scene {
        self.state.borrow().scene(self.mode.get(), &self.config.borrow())
    }

    fn notify(&self, changes: Changes) {
        if !changes.any() {
            return;
        }
        if let Some(hook) = self.on_changed.borrow().as_ref() {
            hook(changes);
        }
    }

    // === Callback factories ===

    /// Returns a callback for pointer presses: `(x, y, button, shift, control)`.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32, PointerEventButton, bool, bool) {
        let ctrl = self.clone();
        move |x, y, button, shift, control| {
            ctrl.dispatch(InputEvent::PointerDown {
                position: Point::new(x, y),
                button: button.into(),
                modifiers: Modifiers { shift, control, ..Modifiers::NONE },
            });
        }
    }

    /// Returns a callback for pointer motion: `(x, y)`.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.dispatch(InputEvent::PointerMove { position: Point::new(x, y) });
        }
    }

    /// Returns a callback for pointer releases: `(x, y, button)`.
    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32, PointerEventButton) {
        let ctrl = self.clone();
        move |x, y, button| {
            ctrl.dispatch(InputEvent::PointerUp { position: Point::new(x, y), button: button.into() });
        }
    }

    /// Returns a callback for wheel events: `(x, y, delta_y) -> accepted`.
    pub fn scroll_callback(&self) -> impl Fn(f32, f32, f32) -> bool {
        let ctrl = self.clone();
        move |x, y, delta| {
            ctrl.dispatch(InputEvent::Wheel { position: Point::new(x, y), delta });
            true
        }
    }

    /// Returns a callback for key presses: `(text) -> handled`.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString) -> bool {
        let ctrl = self.clone();
        move |text| {
            let key = EditorKey::from_text(text.as_str());
            if key == EditorKey::Other {
                return false;
            }
            ctrl.dispatch(InputEvent::KeyDown { key });
            true
        }
    }

    /// Returns a callback for the context menu's delete entry.
    pub fn context_menu_delete_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.dispatch(InputEvent::ContextMenuDelete);
        }
    }
}

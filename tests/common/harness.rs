//! Test harness around [`TraceEditorController`].
//!
//! Wires the controller's callback factories the way a window would and adds
//! helpers for simulating user input. Pointer positions are in window
//! coordinates; the canvas sits at [`CANVAS_ORIGIN`].

#![allow(dead_code)]

use super::ChangeTracker;
use slint::platform::PointerEventButton;
use slint::{Model, SharedString, VecModel};
use slint_trace_editor::{
    EdgeId, EditMode, EditorConfig, GraphData, InputEvent, NodeId, Point, Scene, SceneModels,
    ScenePalette, Selection, TraceEditorController, ViewTransform,
};
use std::rc::Rc;

/// Top-left of the canvas container inside the simulated window.
pub const CANVAS_ORIGIN: (f32, f32) = (40.0, 30.0);

/// Controller plus bound models, as a host window would hold them.
pub struct EditorHarness {
    pub ctrl: TraceEditorController,
    pub tracker: ChangeTracker,
    pub node_rows: Rc<VecModel<SharedString>>,
    pub edge_rows: Rc<VecModel<SharedString>>,
    pub models: Rc<SceneModels>,
    pointer_down: Box<dyn Fn(f32, f32, PointerEventButton, bool, bool)>,
    pointer_move: Box<dyn Fn(f32, f32)>,
    pointer_up: Box<dyn Fn(f32, f32, PointerEventButton)>,
    scroll: Box<dyn Fn(f32, f32, f32) -> bool>,
    key: Box<dyn Fn(SharedString) -> bool>,
    menu_delete: Box<dyn Fn()>,
}

impl EditorHarness {
    /// Edit mode, default config, empty graph.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let ctrl = TraceEditorController::new(config);
        ctrl.set_mode(EditMode::Edit);
        ctrl.set_canvas_origin(CANVAS_ORIGIN.0, CANVAS_ORIGIN.1);

        let node_rows = Rc::new(VecModel::<SharedString>::default());
        let edge_rows = Rc::new(VecModel::<SharedString>::default());
        let mut models = SceneModels::new(ScenePalette::default());
        models.bind_nodes(node_rows.clone(), |node, _| SharedString::from(node.id.as_str()));
        models.bind_edges(edge_rows.clone(), |edge, _| SharedString::from(edge.path_commands.as_str()));
        let models = Rc::new(models);

        let tracker = ChangeTracker::new();
        ctrl.on_changed({
            let tracker = tracker.clone();
            let models = models.clone();
            let ctrl = ctrl.clone();
            move |changes| {
                tracker.changes.borrow_mut().push(changes);
                models.sync(&ctrl.scene());
            }
        });

        Self {
            pointer_down: Box::new(ctrl.pointer_down_callback()),
            pointer_move: Box::new(ctrl.pointer_move_callback()),
            pointer_up: Box::new(ctrl.pointer_up_callback()),
            scroll: Box::new(ctrl.scroll_callback()),
            key: Box::new(ctrl.key_pressed_callback()),
            menu_delete: Box::new(ctrl.context_menu_delete_callback()),
            ctrl,
            tracker,
            node_rows,
            edge_rows,
            models,
        }
    }

    pub fn with_graph(graph: GraphData) -> Self {
        let harness = Self::new();
        harness.ctrl.replace_graph(graph);
        harness.tracker.clear();
        harness
    }

    pub fn set_mode(&self, mode: EditMode) {
        self.ctrl.set_mode(mode);
    }

    pub fn set_view(&self, view: ViewTransform) {
        self.ctrl.state().borrow_mut().set_view(view);
    }

    pub fn view(&self) -> ViewTransform {
        *self.ctrl.state().borrow().view()
    }

    pub fn graph(&self) -> GraphData {
        self.ctrl.graph()
    }

    pub fn scene(&self) -> Scene {
        self.ctrl.scene()
    }

    pub fn anchor(&self) -> Option<NodeId> {
        self.ctrl.state().borrow().chain_anchor().cloned()
    }

    pub fn selection(&self) -> Selection {
        self.ctrl.state().borrow().selection().selection.clone()
    }

    pub fn ghost(&self) -> Option<Point> {
        self.ctrl.state().borrow().selection().ghost
    }

    pub fn menu_open(&self) -> bool {
        self.ctrl.state().borrow().selection().context_menu.is_some()
    }

    // === Coordinate helpers ===

    /// Window position of an image-space point under the current view.
    pub fn window_pos(&self, image_x: f32, image_y: f32) -> (f32, f32) {
        let origin = Point::new(CANVAS_ORIGIN.0, CANVAS_ORIGIN.1);
        let p = self.view().to_screen_coords(Point::new(image_x, image_y), origin);
        (p.x, p.y)
    }

    /// Image-space point under a window position.
    pub fn image_pos(&self, x: f32, y: f32) -> Point {
        self.ctrl.state().borrow().to_image_coords(Point::new(x, y))
    }

    pub fn node_position(&self, id: &NodeId) -> Option<Point> {
        self.graph().node(id).map(|n| n.position())
    }

    /// Id of the node stored at an image position (within float noise).
    pub fn node_at(&self, image_x: f32, image_y: f32) -> Option<NodeId> {
        let target = Point::new(image_x, image_y);
        self.graph()
            .nodes()
            .find(|n| n.position().distance(target) < 0.01)
            .map(|n| n.id.clone())
    }

    // === Mouse event helpers ===

    pub fn mouse_down_button(&self, x: f32, y: f32, button: PointerEventButton) {
        (self.pointer_down)(x, y, button, false, false);
    }

    pub fn mouse_down_modified(&self, x: f32, y: f32, shift: bool, control: bool) {
        (self.pointer_down)(x, y, PointerEventButton::Left, shift, control);
    }

    pub fn mouse_move(&self, x: f32, y: f32) {
        (self.pointer_move)(x, y);
    }

    pub fn mouse_up_button(&self, x: f32, y: f32, button: PointerEventButton) {
        (self.pointer_up)(x, y, button);
    }

    /// Left click (down + up) at a window position.
    pub fn click(&self, x: f32, y: f32) {
        self.mouse_down_button(x, y, PointerEventButton::Left);
        self.mouse_up_button(x, y, PointerEventButton::Left);
    }

    /// Left click at an image-space position.
    pub fn click_image(&self, image_x: f32, image_y: f32) {
        let (x, y) = self.window_pos(image_x, image_y);
        self.click(x, y);
    }

    pub fn right_click_image(&self, image_x: f32, image_y: f32) {
        let (x, y) = self.window_pos(image_x, image_y);
        self.mouse_down_button(x, y, PointerEventButton::Right);
        self.mouse_up_button(x, y, PointerEventButton::Right);
    }

    /// Press, move in `steps` increments, release.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32), button: PointerEventButton, steps: usize) {
        self.mouse_down_button(from.0, from.1, button);
        self.move_in_steps(from, to, steps);
        self.mouse_up_button(to.0, to.1, button);
    }

    pub fn shift_drag(&self, from: (f32, f32), to: (f32, f32), steps: usize) {
        self.mouse_down_modified(from.0, from.1, true, false);
        self.move_in_steps(from, to, steps);
        self.mouse_up_button(to.0, to.1, PointerEventButton::Left);
    }

    fn move_in_steps(&self, from: (f32, f32), to: (f32, f32), steps: usize) {
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.mouse_move(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
        }
    }

    pub fn wheel(&self, x: f32, y: f32, delta: f32) -> bool {
        (self.scroll)(x, y, delta)
    }

    pub fn leave(&self) {
        self.ctrl.dispatch(InputEvent::PointerLeave);
    }

    // === Keyboard helpers ===

    pub fn press_escape(&self) -> bool {
        (self.key)(SharedString::from("\u{1b}"))
    }

    pub fn press_delete(&self) -> bool {
        (self.key)(SharedString::from("\u{7f}"))
    }

    pub fn press_backspace(&self) -> bool {
        (self.key)(SharedString::from("\u{8}"))
    }

    pub fn press_text(&self, text: &str) -> bool {
        (self.key)(SharedString::from(text))
    }

    pub fn menu_delete(&self) {
        (self.menu_delete)();
    }

    // === Invariant checks ===

    /// Assert the structural invariants that must hold after every event.
    pub fn assert_invariants(&self) {
        let state = self.ctrl.state();
        let state = state.borrow();
        let graph = state.graph();

        for edge in graph.edges() {
            assert!(graph.contains_node(&edge.source_id), "edge {} has dangling source", edge.id);
            assert!(graph.contains_node(&edge.target_id), "edge {} has dangling target", edge.id);
            assert_ne!(edge.source_id, edge.target_id, "edge {} is a self-loop", edge.id);
        }
        let mut pairs: Vec<(String, String)> = graph
            .edges()
            .map(|e| {
                let (a, b) = (e.source_id.to_string(), e.target_id.to_string());
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        let before = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(before, pairs.len(), "duplicate edge between the same pair of nodes");

        let scale = state.view().scale;
        assert!((0.1..=10.0).contains(&scale), "scale {} out of range", scale);

        match &state.selection().selection {
            Selection::Node(id) => assert!(graph.contains_node(id), "selected node {} is gone", id),
            Selection::Edge(id) => assert!(graph.contains_edge(id), "selected edge {} is gone", id),
            Selection::None => {}
        }
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.graph().edges().map(|e| e.id.clone()).collect()
    }

    pub fn node_rows(&self) -> usize {
        self.node_rows.row_count()
    }

    pub fn edge_rows(&self) -> usize {
        self.edge_rows.row_count()
    }
}

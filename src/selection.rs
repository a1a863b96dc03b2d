//! Selection, chain anchor, ghost cursor and context menu state.
//!
//! Node and edge selection are mutually exclusive by construction: a single
//! [`Selection`] value holds at most one of them.

use crate::graph::{EdgeId, GraphData, NodeId};
use crate::viewport::Point;

/// What is currently selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Selection::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<&EdgeId> {
        match self {
            Selection::Edge(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_node_selected(&self, id: &NodeId) -> bool {
        self.node() == Some(id)
    }

    pub fn is_edge_selected(&self, id: &EdgeId) -> bool {
        self.edge() == Some(id)
    }
}

/// Chain-creation state: which node the next edit click connects from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChainState {
    #[default]
    Idle,
    Chaining(NodeId),
}

impl ChainState {
    pub fn anchor(&self) -> Option<&NodeId> {
        match self {
            ChainState::Chaining(id) => Some(id),
            ChainState::Idle => None,
        }
    }
}

/// A context menu opened on a node or edge, anchored at a screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub target: Selection,
    /// Pointer position relative to the canvas container.
    pub anchor: Point,
}

/// Everything about the editor that is neither graph nor transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selection: Selection,
    pub chain: ChainState,
    /// Pointer position in image coordinates, for the prospective-edge preview.
    pub ghost: Option<Point>,
    pub context_menu: Option<ContextMenu>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Select `target` and open its context menu at `anchor`.
    pub fn open_context_menu(&mut self, target: Selection, anchor: Point) {
        if target.is_none() {
            self.context_menu = None;
            return;
        }
        self.selection = target.clone();
        self.context_menu = Some(ContextMenu { target, anchor });
    }

    /// Drop the chain anchor and all selection and menu state. Nothing in the
    /// graph is touched.
    pub fn reset(&mut self) {
        self.chain = ChainState::Idle;
        self.selection = Selection::None;
        self.context_menu = None;
    }

    /// The chain anchor, only if it still exists in `graph`.
    pub fn live_anchor<'a>(&'a self, graph: &GraphData) -> Option<&'a NodeId> {
        self.chain.anchor().filter(|id| graph.contains_node(id))
    }

    /// Forget every id that no longer exists in `graph`.
    pub fn forget_stale(&mut self, graph: &GraphData) {
        if self.chain.anchor().is_some_and(|id| !graph.contains_node(id)) {
            self.chain = ChainState::Idle;
        }
        let stale = match &self.selection {
            Selection::Node(id) => !graph.contains_node(id),
            Selection::Edge(id) => !graph.contains_edge(id),
            Selection::None => false,
        };
        if stale {
            self.selection = Selection::None;
        }
        if self.context_menu.as_ref().is_some_and(|menu| menu.target != self.selection) {
            self.context_menu = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Selection
    // ========================================================================

    #[test]
    fn test_default_selection_is_empty() {
        let state = SelectionState::new();
        assert!(state.selection.is_none());
        assert_eq!(state.chain, ChainState::Idle);
        assert!(state.ghost.is_none());
        assert!(state.context_menu.is_none());
    }

    #[test]
    fn test_selecting_edge_replaces_node() {
        let mut state = SelectionState::new();
        state.select(Selection::Node(NodeId::from("n")));
        state.select(Selection::Edge(EdgeId::from("e")));
        assert!(state.selection.node().is_none());
        assert!(state.selection.is_edge_selected(&EdgeId::from("e")));
    }

    // ========================================================================
    // Context menu
    // ========================================================================

    #[test]
    fn test_open_context_menu_selects_target() {
        let mut state = SelectionState::new();
        state.open_context_menu(Selection::Node(NodeId::from("n")), Point::new(3.0, 4.0));
        assert!(state.selection.is_node_selected(&NodeId::from("n")));
        let menu = state.context_menu.as_ref().expect("menu should be open");
        assert_eq!(menu.anchor, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_open_context_menu_on_nothing_closes() {
        let mut state = SelectionState::new();
        state.open_context_menu(Selection::Edge(EdgeId::from("e")), Point::ZERO);
        state.open_context_menu(Selection::None, Point::ZERO);
        assert!(state.context_menu.is_none());
    }

    // ========================================================================
    // reset() / forget_stale()
    // ========================================================================

    #[test]
    fn test_reset_clears_everything_but_ghost() {
        let mut state = SelectionState::new();
        state.chain = ChainState::Chaining(NodeId::from("a"));
        state.open_context_menu(Selection::Node(NodeId::from("a")), Point::ZERO);
        state.ghost = Some(Point::new(1.0, 1.0));
        state.reset();
        assert_eq!(state.chain, ChainState::Idle);
        assert!(state.selection.is_none());
        assert!(state.context_menu.is_none());
        assert!(state.ghost.is_some());
    }

    #[test]
    fn test_forget_stale_drops_missing_anchor_and_selection() {
        let mut graph = GraphData::new();
        let live = graph.add_node(Point::ZERO);
        let mut state = SelectionState::new();
        state.chain = ChainState::Chaining(NodeId::from("gone"));
        state.open_context_menu(Selection::Node(NodeId::from("gone")), Point::ZERO);
        state.forget_stale(&graph);
        assert_eq!(state.chain, ChainState::Idle);
        assert!(state.selection.is_none());
        assert!(state.context_menu.is_none());

        state.chain = ChainState::Chaining(live.clone());
        state.forget_stale(&graph);
        assert_eq!(state.live_anchor(&graph), Some(&live));
    }
}

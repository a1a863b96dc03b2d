//! The editable trace graph: nodes in image coordinates joined by edges.
//!
//! [`GraphData`] is the single owner of all nodes and edges. Edges refer to
//! their endpoints by [`NodeId`] only; every lookup goes back through the
//! graph so a stale id is simply "not found".
//!
//! Structural rules kept by every mutating operation:
//!
//! - every edge's endpoints exist in the node set
//! - `remove_edge` prunes every node left without incident edges
//! - ids are unique and never reused
//! - `add_edge` refuses self loops and a second edge between the same
//!   unordered pair of nodes

use crate::error::{ImportError, ImportResult};
use crate::viewport::Point;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Identifier of a node. Assigned once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// Identifier of an edge. Assigned once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

macro_rules! impl_id {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            /// A fresh, globally unique id.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "-{}"), uuid::Uuid::new_v4()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

impl_id!(NodeId, "node");
impl_id!(EdgeId, "edge");

/// A graph vertex, stored in image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, x: f32, y: f32) -> Self {
        Self { id: id.into(), x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A connection between two nodes.
///
/// `path`, when present, is the full curved route in image coordinates
/// (endpoints included). Without it the edge is a straight segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "source")]
    pub source_id: NodeId,
    #[serde(rename = "target")]
    pub target_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Point>>,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self { id: id.into(), source_id: source.into(), target_id: target.into(), path: None }
    }

    pub fn with_path(mut self, path: Vec<Point>) -> Self {
        self.path = Some(path);
        self
    }

    /// True if this edge touches `node`.
    pub fn is_incident_to(&self, node: &NodeId) -> bool {
        &self.source_id == node || &self.target_id == node
    }

    /// True if this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source_id == a && &self.target_id == b) || (&self.source_id == b && &self.target_id == a)
    }
}

// ============================================================================
// Edge validation
// ============================================================================

/// Result of checking whether an edge may be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Why an edge was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Endpoint does not exist (stale id).
    NodeNotFound(NodeId),
    /// Source and target are the same node.
    SelfLoop,
    /// An edge between this unordered pair already exists.
    DuplicateEdge(EdgeId),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "Node {} not found", id),
            Self::SelfLoop => write!(f, "Cannot connect a node to itself"),
            Self::DuplicateEdge(id) => write!(f, "Edge {} already connects these nodes", id),
        }
    }
}

/// What a removal took out of the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Removed {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Removed {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }
}

// ============================================================================
// GraphData
// ============================================================================

/// The full editable graph. Nodes and edges keep insertion order, which is
/// also their draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphData {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
}

impl GraphData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from raw parts, dropping edges whose endpoints are missing.
    pub fn from_parts<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let mut graph = Self::new();
        graph.replace_all(nodes, edges);
        graph
    }

    // === Queries ===

    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Edges touching `node`.
    pub fn edges_of<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| e.is_incident_to(node))
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.edges_of(node).count()
    }

    /// The edge joining `a` and `b` in either direction, if any.
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&Edge> {
        self.edges.values().find(|e| e.connects(a, b))
    }

    /// Resolve an edge's endpoints to live nodes. `None` means the edge is
    /// defective and must be skipped.
    pub fn resolve_edge<'a>(&'a self, edge: &Edge) -> Option<(&'a Node, &'a Node)> {
        Some((self.nodes.get(&edge.source_id)?, self.nodes.get(&edge.target_id)?))
    }

    /// Geometry of an edge in image coordinates: its `path` when present,
    /// otherwise the segment between its endpoints. `None` for defective edges.
    pub fn edge_polyline(&self, edge: &Edge) -> Option<Vec<Point>> {
        let (source, target) = self.resolve_edge(edge)?;
        match &edge.path {
            Some(path) if path.len() >= 2 => Some(path.clone()),
            _ => Some(vec![source.position(), target.position()]),
        }
    }

    /// Nodes with no incident edge, in insertion order.
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        let connected = self.connected_node_set();
        self.nodes
            .keys()
            .filter(|id| !connected.contains(id))
            .cloned()
            .collect()
    }

    /// Check whether an edge between `source` and `target` may be added.
    pub fn validate_edge(&self, source: &NodeId, target: &NodeId) -> ValidationResult {
        if source == target {
            return ValidationResult::Invalid(ValidationError::SelfLoop);
        }
        for id in [source, target] {
            if !self.nodes.contains_key(id) {
                return ValidationResult::Invalid(ValidationError::NodeNotFound(id.clone()));
            }
        }
        match self.edge_between(source, target) {
            Some(existing) => ValidationResult::Invalid(ValidationError::DuplicateEdge(existing.id.clone())),
            None => ValidationResult::Valid,
        }
    }

    // === Mutations ===

    /// Add a node at `point` (image coordinates) and return its new id.
    pub fn add_node(&mut self, point: Point) -> NodeId {
        let id = NodeId::generate();
        trace!(%id, x = point.x, y = point.y, "add node");
        self.nodes.insert(id.clone(), Node { id: id.clone(), x: point.x, y: point.y });
        id
    }

    /// Connect two existing nodes with a straight edge.
    ///
    /// Returns `None` and changes nothing for self loops, duplicates (in
    /// either direction) and unknown endpoints.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> Option<EdgeId> {
        if let ValidationResult::Invalid(reason) = self.validate_edge(source, target) {
            debug!(%source, %target, %reason, "edge rejected");
            return None;
        }
        let id = EdgeId::generate();
        trace!(%id, %source, %target, "add edge");
        self.edges.insert(id.clone(), Edge::new(id.clone(), source.clone(), target.clone()));
        Some(id)
    }

    /// Remove an edge, then every node left without edges.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Removed {
        let Some(edge) = self.edges.shift_remove(id) else {
            return Removed::default();
        };
        let pruned = self.prune_isolated();
        debug!(edge = %edge.id, pruned = pruned.len(), "removed edge");
        Removed { nodes: pruned, edges: vec![edge.id] }
    }

    /// Remove a node together with all edges touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Removed {
        if !self.nodes.contains_key(id) {
            return Removed::default();
        }
        let mut edges = Vec::new();
        self.edges.retain(|edge_id, edge| {
            let keep = !edge.is_incident_to(id);
            if !keep {
                edges.push(edge_id.clone());
            }
            keep
        });
        self.nodes.shift_remove(id);
        debug!(node = %id, edges = edges.len(), "removed node");
        Removed { nodes: vec![id.clone()], edges }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Replace the whole graph. Edges with missing endpoints are dropped;
    /// isolated nodes are kept as given.
    pub fn replace_all<N, E>(&mut self, nodes: N, edges: E)
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        self.clear();
        for node in nodes {
            self.nodes.insert(node.id.clone(), node);
        }
        let mut dangling = 0usize;
        for edge in edges {
            if self.nodes.contains_key(&edge.source_id) && self.nodes.contains_key(&edge.target_id) {
                self.edges.insert(edge.id.clone(), edge);
            } else {
                dangling += 1;
            }
        }
        if dangling > 0 {
            warn!(dangling, "dropped edges with missing endpoints");
        }
        debug!(nodes = self.nodes.len(), edges = self.edges.len(), "graph replaced");
    }

    fn connected_node_set(&self) -> std::collections::HashSet<&NodeId> {
        self.edges
            .values()
            .flat_map(|e| [&e.source_id, &e.target_id])
            .collect()
    }

    fn prune_isolated(&mut self) -> Vec<NodeId> {
        let isolated = self.isolated_nodes();
        for id in &isolated {
            self.nodes.shift_remove(id);
        }
        isolated
    }

    // === Serialization ===

    /// Serialize as `{ "nodes": [...], "edges": [...] }`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&GraphDocument {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        })
    }

    /// Parse a graph previously written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> ImportResult<Self> {
        let doc: GraphDocument = serde_json::from_str(json).map_err(ImportError::Json)?;
        Ok(Self::from_parts(doc.nodes, doc.edges))
    }
}

#[derive(Serialize, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

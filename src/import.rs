//! Import of the external skeleton computation's result.
//!
//! The computation returns seed points and traced paths as `[y, x]` pairs
//! (row, column). Each distinct seed becomes a node whose id is derived from
//! its coordinates, so a seed and a path endpoint at the same pixel collapse
//! into one node. Each path becomes an edge between its first and last point;
//! paths longer than two points keep the full route as the edge's `path`.
//!
//! Import is best effort: malformed entries are dropped and counted, the rest
//! is applied.

use crate::error::{ImportError, ImportResult};
use crate::graph::{Edge, EdgeId, GraphData, Node, NodeId};
use crate::viewport::Point;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Raw result of the skeleton computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonResult {
    /// Seed points as `[y, x]`.
    #[serde(default)]
    pub seeds: Vec<Vec<f64>>,
    /// Traced paths, each a sequence of `[y, x]` points.
    #[serde(default)]
    pub edges: Vec<Vec<Vec<f64>>>,
}

/// Counts from one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub nodes: usize,
    pub edges: usize,
    pub dropped_seeds: usize,
    pub dropped_edges: usize,
}

impl ImportReport {
    pub fn dropped(&self) -> usize {
        self.dropped_seeds + self.dropped_edges
    }
}

/// Node id for a seed at image position `point`.
pub fn seed_node_id(point: Point) -> NodeId {
    NodeId::from(format!("seed-{}-{}", point.x, point.y))
}

/// Convert a `[y, x]` pair into an image point. Anything else is malformed.
fn yx_to_point(pair: &[f64]) -> Option<Point> {
    let [y, x] = pair else {
        return None;
    };
    let point = Point::new(*x as f32, *y as f32);
    point.is_finite().then_some(point)
}

impl SkeletonResult {
    /// Parse the computation's JSON output.
    ///
    /// Entries that are not numeric pairs are kept as empty pairs so that
    /// [`to_graph`](Self::to_graph) drops and counts them rather than failing
    /// the whole import.
    pub fn from_json(json: &str) -> ImportResult<Self> {
        let raw: RawSkeleton = serde_json::from_str(json).map_err(ImportError::Json)?;
        Ok(Self {
            seeds: raw.seeds.iter().map(lenient_pair).collect(),
            edges: raw
                .edges
                .iter()
                .map(|path| match path {
                    Value::Array(points) => points.iter().map(lenient_pair).collect(),
                    _ => Vec::new(),
                })
                .collect(),
        })
    }

    /// Build a graph, dropping malformed seeds and paths.
    pub fn to_graph(&self) -> (GraphData, ImportReport) {
        let mut report = ImportReport::default();
        let mut nodes: IndexMap<NodeId, Node> = IndexMap::new();
        let mut edges: Vec<Edge> = Vec::new();

        for seed in &self.seeds {
            match yx_to_point(seed) {
                Some(point) => {
                    intern(&mut nodes, point);
                }
                None => report.dropped_seeds += 1,
            }
        }

        for (index, raw_path) in self.edges.iter().enumerate() {
            let path: Option<Vec<Point>> = raw_path.iter().map(|pair| yx_to_point(pair)).collect();
            let Some(path) = path.filter(|p| p.len() >= 2) else {
                report.dropped_edges += 1;
                continue;
            };
            let (first, last) = (path[0], path[path.len() - 1]);
            if seed_node_id(first) == seed_node_id(last) {
                debug!(index, "closed path dropped");
                report.dropped_edges += 1;
                continue;
            }
            let source = intern(&mut nodes, first);
            let target = intern(&mut nodes, last);
            let mut edge = Edge::new(EdgeId::from(format!("path-{}", index)), source, target);
            if path.len() > 2 {
                edge.path = Some(path);
            }
            edges.push(edge);
        }

        let graph = GraphData::from_parts(nodes.into_values(), edges);
        report.nodes = graph.node_count();
        report.edges = graph.edge_count();

        if report.dropped() > 0 {
            warn!(
                dropped_seeds = report.dropped_seeds,
                dropped_edges = report.dropped_edges,
                "skeleton import dropped malformed entries"
            );
        }
        debug!(nodes = report.nodes, edges = report.edges, "skeleton imported");
        (graph, report)
    }
}

fn intern(nodes: &mut IndexMap<NodeId, Node>, point: Point) -> NodeId {
    let id = seed_node_id(point);
    nodes
        .entry(id.clone())
        .or_insert_with(|| Node { id: id.clone(), x: point.x, y: point.y });
    id
}

/// Parse and convert in one step. Fails only on unreadable JSON or when every
/// entry was malformed.
pub fn import_skeleton_json(json: &str) -> ImportResult<(GraphData, ImportReport)> {
    let result = SkeletonResult::from_json(json)?;
    let (graph, report) = result.to_graph();
    if graph.is_empty() && report.dropped() > 0 {
        return Err(ImportError::Empty { dropped: report.dropped() });
    }
    Ok((graph, report))
}

#[derive(Deserialize)]
struct RawSkeleton {
    #[serde(default)]
    seeds: Vec<Value>,
    #[serde(default)]
    edges: Vec<Value>,
}

fn lenient_pair(value: &Value) -> Vec<f64> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

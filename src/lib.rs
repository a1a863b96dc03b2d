//! # Slint Trace Editor Library
//!
//! Interactive editing of skeletal traces drawn over layered raster images.
//! A trace is a node/edge graph in image coordinates; the user pans and zooms
//! the image while adding, connecting and deleting nodes and edges.
//!
//! ## Features
//!
//! - **Zoom-stable geometry** - Graph coordinates live in image space and
//!   never drift as the view changes
//! - **Chain editing** - One click per vertex lays down a connected polyline;
//!   clicking an existing node merges the chain into it
//! - **Self-cleaning topology** - Deleting an edge prunes nodes left without
//!   edges
//! - **Host-driven** - Input arrives as plain events, the edit mode is owned by
//!   the host, and rendering is a read-only [`Scene`] projection
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_trace_editor::{EditMode, EditorConfig, TraceEditorController};
//!
//! let ctrl = TraceEditorController::new(EditorConfig::default());
//! ctrl.set_mode(EditMode::Edit);
//! window.on_pointer_down(ctrl.pointer_down_callback());
//! window.on_scrolled(ctrl.scroll_callback());
//! ```
//!
//! ## Modules
//!
//! - [`viewport`] - [`ViewTransform`] and screen/image coordinate mapping
//! - [`graph`] - [`GraphData`] store with edge validation and pruning
//! - [`selection`] - Selection, chain anchor and context menu state
//! - [`hit_test`] - Zoom-invariant node and edge picking
//! - [`controller`] - [`EditorState`] reducer and [`TraceEditorController`]
//! - [`import`] - Conversion of computed skeletons into graphs
//! - [`layers`] - Raster [`LayerStack`]
//! - [`scene`] - Render projection and Slint model sync
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod config;
pub mod controller;
pub mod error;
pub mod graph;
pub mod import;
pub mod input;
pub mod layers;
pub mod path;
pub mod scene;
pub mod selection;
pub mod viewport;

pub use config::EditorConfig;
pub use controller::{Changes, EditorState, TraceEditorController};
pub use error::{ConfigError, ImportError, ImportResult};
pub use graph::{Edge, EdgeId, GraphData, Node, NodeId, Removed, ValidationError, ValidationResult};
pub use hit_test::{find_edge_at, find_node_at, hit_test, Hit};
pub use import::{import_skeleton_json, seed_node_id, ImportReport, SkeletonResult};
pub use input::{classify_gesture, EditMode, EditorKey, GestureKind, InputEvent, Modifiers, PointerButton};
pub use layers::{LayerStack, RasterLayer};
pub use path::{distance_to_polyline, generate_line_path, generate_polyline_path};
pub use scene::{Scene, SceneEdge, SceneLayer, SceneModels, SceneNode, ScenePalette};
pub use selection::{ChainState, ContextMenu, Selection, SelectionState};
pub use viewport::{Point, ViewTransform, MAX_SCALE, MIN_SCALE};

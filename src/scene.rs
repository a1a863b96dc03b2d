//! Render projection of the editor state.
//!
//! A [`Scene`] is computed from the state on demand and never written back.
//! Node and edge geometry is in screen space relative to the canvas
//! container, ready to be bound to Slint `Path` commands and positioned
//! elements.
//!
//! # Example
//!
//! ```ignore
//! use slint::{ModelRc, VecModel};
//! use slint_trace_editor::{SceneModels, ScenePalette};
//!
//! let nodes = Rc::new(VecModel::<NodeVisual>::default());
//! let edges = Rc::new(VecModel::<EdgeVisual>::default());
//!
//! let mut models = SceneModels::new(ScenePalette::default());
//! models.bind_nodes(nodes.clone(), |node, palette| NodeVisual {
//!     id: node.id.as_str().into(),
//!     x: node.x,
//!     y: node.y,
//!     radius: node.radius,
//!     color: palette.node_color(node),
//! });
//! models.bind_edges(edges.clone(), |edge, palette| EdgeVisual {
//!     path_commands: edge.path_commands.as_str().into(),
//!     width: edge.width,
//!     color: palette.edge_color(edge),
//! });
//! window.set_nodes(ModelRc::from(nodes));
//! window.set_edges(ModelRc::from(edges));
//!
//! models.sync(&ctrl.scene());
//! ```

use crate::config::EditorConfig;
use crate::controller::EditorState;
use crate::graph::{EdgeId, NodeId};
use crate::input::EditMode;
use crate::path::generate_polyline_path;
use crate::selection::ContextMenu;
use crate::viewport::{Point, ViewTransform};
use slint::{Color, Image, Model, SharedString, VecModel};
use std::rc::Rc;

/// A node as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub selected: bool,
    /// The current chain anchor.
    pub is_anchor: bool,
}

/// An edge as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    pub id: EdgeId,
    /// SVG-style path commands in screen space.
    pub path_commands: String,
    pub width: f32,
    pub selected: bool,
}

/// A raster layer as drawn: positioned and scaled by the view transform.
#[derive(Debug, Clone)]
pub struct SceneLayer {
    pub name: String,
    pub image: Image,
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub view: ViewTransform,
    /// Visible layers, bottom first.
    pub layers: Vec<SceneLayer>,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    /// Preview path from the chain anchor to the pointer.
    pub ghost: Option<String>,
    pub context_menu: Option<ContextMenu>,
}

impl Scene {
    /// Project `state` into screen space.
    pub fn project(state: &EditorState, mode: EditMode, config: &EditorConfig) -> Scene {
        let view = *state.view();
        let graph = state.graph();
        let selection = state.selection();
        let anchor = selection.live_anchor(graph);
        let to_screen = |p: Point| view.to_screen_coords(p, Point::ZERO);

        let layers = state
            .layers()
            .visible_layers()
            .map(|layer| {
                let (w, h) = layer.size();
                SceneLayer {
                    name: layer.name.clone(),
                    image: layer.image.clone(),
                    opacity: layer.opacity,
                    x: view.x,
                    y: view.y,
                    width: w * view.scale,
                    height: h * view.scale,
                }
            })
            .collect();

        let nodes = graph
            .nodes()
            .map(|node| {
                let p = to_screen(node.position());
                SceneNode {
                    id: node.id.clone(),
                    x: p.x,
                    y: p.y,
                    radius: config.node_radius,
                    selected: selection.selection.is_node_selected(&node.id),
                    is_anchor: anchor == Some(&node.id),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .filter_map(|edge| {
                let polyline = graph.edge_polyline(edge)?;
                Some(SceneEdge {
                    id: edge.id.clone(),
                    path_commands: generate_polyline_path(polyline.into_iter().map(|p| {
                        let s = to_screen(p);
                        (s.x, s.y)
                    })),
                    width: config.edge_width,
                    selected: selection.selection.is_edge_selected(&edge.id),
                })
            })
            .collect();

        let ghost = match (mode, anchor.and_then(|id| graph.node(id)), selection.ghost) {
            (EditMode::Edit, Some(anchor), Some(pointer)) if config.ghost_edges => {
                let a = to_screen(anchor.position());
                let b = to_screen(pointer);
                Some(generate_polyline_path([(a.x, a.y), (b.x, b.y)]))
            }
            _ => None,
        };

        Scene {
            view,
            layers,
            nodes,
            edges,
            ghost,
            context_menu: selection.context_menu.clone(),
        }
    }

    pub fn anchor(&self) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.is_anchor)
    }
}

/// Colors for the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePalette {
    pub node: Color,
    pub anchor: Color,
    pub selected: Color,
    pub edge: Color,
    pub ghost: Color,
}

impl Default for ScenePalette {
    fn default() -> Self {
        Self {
            node: Color::from_rgb_u8(100, 180, 255),
            anchor: Color::from_rgb_u8(255, 200, 60),
            selected: Color::from_rgb_u8(255, 80, 80),
            edge: Color::from_rgb_u8(80, 220, 120),
            ghost: Color::from_argb_u8(160, 200, 200, 200),
        }
    }
}

impl ScenePalette {
    pub fn node_color(&self, node: &SceneNode) -> Color {
        if node.selected {
            self.selected
        } else if node.is_anchor {
            self.anchor
        } else {
            self.node
        }
    }

    pub fn edge_color(&self, edge: &SceneEdge) -> Color {
        if edge.selected {
            self.selected
        } else {
            self.edge
        }
    }
}

trait ModelSyncer<T> {
    fn sync(&self, items: &[T], palette: &ScenePalette);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<T, P, F> ModelSyncer<T> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&T, &ScenePalette) -> P,
{
    fn sync(&self, items: &[T], palette: &ScenePalette) {
        for (i, item) in items.iter().enumerate() {
            let row = (self.constructor)(item, palette);
            if i < self.model.row_count() {
                self.model.set_row_data(i, row);
            } else {
                self.model.push(row);
            }
        }
        while self.model.row_count() > items.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

type GhostSetter = Box<dyn Fn(SharedString, Color)>;

/// Keeps Slint `VecModel`s in step with successive scenes.
///
/// Row types are declared in `.slint` markup, so callers supply a constructor
/// per model. Rows are updated in place; only the tail is pushed or removed.
#[derive(Default)]
pub struct SceneModels {
    palette: ScenePalette,
    nodes: Option<Box<dyn ModelSyncer<SceneNode>>>,
    edges: Option<Box<dyn ModelSyncer<SceneEdge>>>,
    layers: Option<Box<dyn ModelSyncer<SceneLayer>>>,
    ghost: Option<GhostSetter>,
}

impl SceneModels {
    pub fn new(palette: ScenePalette) -> Self {
        Self { palette, ..Self::default() }
    }

    pub fn palette(&self) -> &ScenePalette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: ScenePalette) {
        self.palette = palette;
    }

    pub fn bind_nodes<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&SceneNode, &ScenePalette) -> P + 'static,
    {
        self.nodes = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    pub fn bind_edges<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&SceneEdge, &ScenePalette) -> P + 'static,
    {
        self.edges = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    pub fn bind_layers<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&SceneLayer, &ScenePalette) -> P + 'static,
    {
        self.layers = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Called on every sync with the ghost path commands (empty when there is
    /// no preview) and its color.
    pub fn bind_ghost(&mut self, setter: impl Fn(SharedString, Color) + 'static) {
        self.ghost = Some(Box::new(setter));
    }

    pub fn sync(&self, scene: &Scene) {
        if let Some(nodes) = &self.nodes {
            nodes.sync(&scene.nodes, &self.palette);
        }
        if let Some(edges) = &self.edges {
            edges.sync(&scene.edges, &self.palette);
        }
        if let Some(layers) = &self.layers {
            layers.sync(&scene.layers, &self.palette);
        }
        if let Some(ghost) = &self.ghost {
            let path = scene.ghost.as_deref().unwrap_or_default();
            ghost(SharedString::from(path), self.palette.ghost);
        }
    }
}

//! Screen-space description of a graph, ready for a renderer.
//!
//! [`build_scene`] is pure: it reads the graph and view and returns plain data,
//! so drawing code never needs access to editor state.

use crate::geometry::Vec2;
use crate::viewport::ViewTransform;
use influence_core::{EdgePresentation, InfluenceGraph, NodeKey, NodePresentation};
use serde::{Deserialize, Serialize};

/// Screen-space constants the scene is built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderMetrics {
    /// Node glyph radius in screen pixels, independent of zoom.
    pub node_radius: f64,
    pub grid_step: f64,
    /// The grid is omitted when its on-screen spacing drops below this.
    pub grid_min_screen_step: f64,
    pub viewport: Vec2,
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self {
            node_radius: 12.0,
            grid_step: 24.0,
            grid_min_screen_step: 12.0,
            viewport: Vec2::new(1000.0, 680.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn of(weight: f64) -> Self {
        if weight >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub key: NodeKey,
    pub label: String,
    pub center: Vec2,
    pub radius: f64,
    pub presentation: NodePresentation,
    pub selected: bool,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEdge {
    pub src: NodeKey,
    pub dst: NodeKey,
    pub weight: f64,
    pub polarity: Polarity,
    pub presentation: EdgePresentation,
    /// Clipped start, one node radius away from the source centre.
    pub start: Vec2,
    /// Clipped end where the arrowhead tip goes.
    pub end: Vec2,
    pub midpoint: Vec2,
    /// Anchor for the weight badge, 70% of the way towards the target.
    pub weight_anchor: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuideLine {
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GridLines {
    /// Screen x of each vertical line.
    pub vertical: Vec<f64>,
    /// Screen y of each horizontal line.
    pub horizontal: Vec<f64>,
}

impl GridLines {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub grid: GridLines,
    pub edges: Vec<SceneEdge>,
    pub nodes: Vec<SceneNode>,
    pub guide: Option<GuideLine>,
}

/// Per-frame interaction state that affects drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOverlay<'a> {
    pub selection: Option<&'a str>,
    pub hover: Option<&'a str>,
    /// Source node and current pointer (screen) while an edge is being drawn.
    pub guide: Option<(&'a str, Vec2)>,
}

pub fn build_scene(
    graph: &InfluenceGraph,
    view: &ViewTransform,
    metrics: &RenderMetrics,
    overlay: SceneOverlay<'_>,
) -> Scene {
    let radius = metrics.node_radius;

    let edges = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let (a, b) = graph.endpoints(edge)?;
            let start = view.world_to_screen(Vec2::new(a.x, a.y));
            let end = view.world_to_screen(Vec2::new(b.x, b.y));
            let (start, end) = clip_segment(start, end, radius);
            Some(SceneEdge {
                src: edge.src.clone(),
                dst: edge.dst.clone(),
                weight: edge.weight,
                polarity: Polarity::of(edge.weight),
                presentation: edge.presentation.clone(),
                start,
                end,
                midpoint: start.lerp(end, 0.5),
                weight_anchor: start.lerp(end, 0.7),
            })
        })
        .collect();

    let nodes = graph
        .nodes()
        .map(|(key, node)| SceneNode {
            key: key.clone(),
            label: node.label.clone(),
            center: view.world_to_screen(Vec2::new(node.x, node.y)),
            radius,
            presentation: node.presentation.clone(),
            selected: overlay.selection == Some(key.as_str()),
            hovered: overlay.hover == Some(key.as_str()),
        })
        .collect();

    let guide = overlay.guide.and_then(|(source, pointer)| {
        let node = graph.node(source)?;
        Some(GuideLine {
            from: view.world_to_screen(Vec2::new(node.x, node.y)),
            to: pointer,
        })
    });

    Scene {
        grid: grid_lines(view, metrics),
        edges,
        nodes,
        guide,
    }
}

/// Shorten a screen segment by `radius` at both ends. Coincident endpoints are
/// returned unchanged.
pub fn clip_segment(start: Vec2, end: Vec2, radius: f64) -> (Vec2, Vec2) {
    let delta = end - start;
    let length = delta.length();
    if length == 0.0 {
        return (start, end);
    }
    let unit = delta * (1.0 / length);
    (start + unit * radius, end - unit * radius)
}

/// Screen positions of grid lines covering the viewport.
pub fn grid_lines(view: &ViewTransform, metrics: &RenderMetrics) -> GridLines {
    let step = metrics.grid_step * view.scale();
    if !step.is_finite() || step < metrics.grid_min_screen_step || step <= 0.0 {
        return GridLines::default();
    }
    let offset = view.offset();
    GridLines {
        vertical: axis_lines(offset.x.rem_euclid(step), metrics.viewport.x, step),
        horizontal: axis_lines(offset.y.rem_euclid(step), metrics.viewport.y, step),
    }
}

fn axis_lines(first: f64, extent: f64, step: f64) -> Vec<f64> {
    let count = ((extent - first) / step).floor().max(-1.0) as i64 + 1;
    (0..count.max(0)).map(|i| first + i as f64 * step).collect()
}

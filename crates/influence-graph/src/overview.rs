//! Minimap coordinate mapping.
//!
//! The overview fits the world bounds of the graph into a fixed minimap box
//! with a uniform scale, using the same `world * scale + offset` shape as the
//! main [`ViewTransform`].

use crate::geometry::{Rect, Vec2};
use crate::viewport::ViewTransform;
use influence_core::InfluenceGraph;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapMetrics {
    pub width: f64,
    pub height: f64,
    /// Inset in minimap pixels between the box edge and the fitted world.
    pub margin: f64,
    /// Half extent of the world square shown when the graph is empty.
    pub empty_half_extent: f64,
    /// World-space padding added around the node bounds.
    pub content_padding: f64,
}

impl Default for MinimapMetrics {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 140.0,
            margin: 8.0,
            empty_half_extent: 500.0,
            content_padding: 48.0,
        }
    }
}

/// Bounding box of all node positions, or `None` for an empty graph.
pub fn content_bounds(graph: &InfluenceGraph) -> Option<Rect> {
    Rect::bounding(graph.nodes().map(|(_, n)| Vec2::new(n.x, n.y)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverviewMapper {
    world: Rect,
    scale: f64,
    offset: Vec2,
}

impl OverviewMapper {
    pub fn new(graph: &InfluenceGraph, metrics: &MinimapMetrics) -> Self {
        let world = match content_bounds(graph) {
            Some(bounds) => bounds.expand(metrics.content_padding),
            None => Rect::from_center_half_extent(Vec2::ZERO, metrics.empty_half_extent),
        };
        Self::for_world(world, metrics)
    }

    /// Fit an explicit world rectangle into the minimap box.
    pub fn for_world(world: Rect, metrics: &MinimapMetrics) -> Self {
        let inner_w = (metrics.width - 2.0 * metrics.margin).max(1.0);
        let inner_h = (metrics.height - 2.0 * metrics.margin).max(1.0);
        let world_w = world.width().max(f64::EPSILON);
        let world_h = world.height().max(f64::EPSILON);
        let scale = (inner_w / world_w).min(inner_h / world_h);

        // Centre the fitted world inside the box on the slack axis.
        let fitted = Vec2::new(world_w * scale, world_h * scale);
        let origin = Vec2::new(
            metrics.margin + (inner_w - fitted.x) * 0.5,
            metrics.margin + (inner_h - fitted.y) * 0.5,
        );
        Self {
            world,
            scale,
            offset: origin - world.min * scale,
        }
    }

    pub fn world_bounds(&self) -> Rect {
        self.world
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn world_to_minimap(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    pub fn minimap_to_world(&self, minimap: Vec2) -> Vec2 {
        Vec2::new(
            (minimap.x - self.offset.x) / self.scale,
            (minimap.y - self.offset.y) / self.scale,
        )
    }

    /// Minimap rectangle covering what the main view currently shows.
    pub fn visible_region(&self, view: &ViewTransform, viewport: Vec2) -> Rect {
        let world = view.visible_world_rect(viewport);
        Rect::from_min_max(
            self.world_to_minimap(world.min),
            self.world_to_minimap(world.max),
        )
    }

    /// Re-centre `view` on the world point under a minimap click, keeping the
    /// visible region inside the world bounds. Returns the target world point.
    pub fn navigate(&self, minimap_point: Vec2, view: &mut ViewTransform, viewport: Vec2) -> Vec2 {
        let target = self.minimap_to_world(minimap_point);
        view.center_on(target, viewport, Some(self.world));
        target
    }
}

//! Geometry shared by picking, rendering and the overview map.

pub mod geometry;
pub mod hit_tester;
pub mod overview;
pub mod scene;
pub mod viewport;

pub use geometry::{Rect, Vec2, point_segment_distance, snap_point, snap_to_grid};
pub use hit_tester::{HitResult, HitTester};
pub use overview::{MinimapMetrics, OverviewMapper, content_bounds};
pub use scene::{
    GridLines, GuideLine, Polarity, RenderMetrics, Scene, SceneEdge, SceneNode, SceneOverlay,
    build_scene, clip_segment, grid_lines,
};
pub use viewport::{ScaleLimits, ViewTransform};

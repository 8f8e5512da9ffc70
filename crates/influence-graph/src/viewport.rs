//! World/screen transform: `screen = world * scale + offset`.

use crate::geometry::{Rect, Vec2};
use influence_core::ViewSnapshot;
use serde::{Deserialize, Serialize};

/// Allowed zoom range. Every scale the transform takes on is clamped to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self { min: 0.2, max: 5.0 }
    }
}

impl ScaleLimits {
    pub fn new(min: f64, max: f64) -> Self {
        // Guard against swapped or degenerate bounds from a hand-edited settings file.
        let min = if min.is_finite() && min > 0.0 { min } else { 0.2 };
        let max = if max.is_finite() && max >= min { max } else { min };
        Self { min, max }
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    offset: Vec2,
    limits: ScaleLimits,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(ScaleLimits::default())
    }
}

impl ViewTransform {
    /// Identity transform with the given zoom range.
    pub fn new(limits: ScaleLimits) -> Self {
        Self {
            scale: limits.clamp(1.0),
            offset: Vec2::ZERO,
            limits,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Set scale (clamped) and offset directly.
    pub fn set(&mut self, scale: f64, offset: Vec2) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = self.limits.clamp(scale);
        }
        if offset.is_finite() {
            self.offset = offset;
        }
    }

    /// Zoom by `factor` keeping the world point under `anchor` fixed on screen.
    ///
    /// Returns `false` when the clamped scale does not change.
    pub fn zoom_at(&mut self, factor: f64, anchor: Vec2) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let new_scale = self.limits.clamp(self.scale * factor);
        if new_scale == self.scale {
            return false;
        }
        let world = self.screen_to_world(anchor);
        self.scale = new_scale;
        self.offset = anchor - world * new_scale;
        tracing::trace!("Zoomed to {:.3} at ({}, {})", new_scale, anchor.x, anchor.y);
        true
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.offset += delta;
        }
    }

    pub fn reset(&mut self) {
        self.scale = self.limits.clamp(1.0);
        self.offset = Vec2::ZERO;
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == Vec2::ZERO
    }

    /// World-space rectangle currently visible in a viewport of `viewport` pixels.
    pub fn visible_world_rect(&self, viewport: Vec2) -> Rect {
        Rect::from_min_max(
            self.screen_to_world(Vec2::ZERO),
            self.screen_to_world(viewport),
        )
    }

    /// Fit `bounds` into the viewport with `padding` screen pixels on each side.
    pub fn fit_bounds(&mut self, bounds: Rect, viewport: Vec2, padding: f64) {
        let available = Vec2::new(
            (viewport.x - 2.0 * padding).max(1.0),
            (viewport.y - 2.0 * padding).max(1.0),
        );
        let width = bounds.width().max(f64::EPSILON);
        let height = bounds.height().max(f64::EPSILON);
        let scale = self
            .limits
            .clamp((available.x / width).min(available.y / height));
        self.scale = scale;
        self.offset = viewport * 0.5 - bounds.center() * scale;
    }

    /// Move the view so `target` sits at the viewport centre.
    ///
    /// With `within`, the visible region is kept inside those world bounds; on an
    /// axis where the region is larger than the bounds the bounds are centred.
    pub fn center_on(&mut self, target: Vec2, viewport: Vec2, within: Option<Rect>) {
        let half = viewport * (0.5 / self.scale);
        let mut center = target;
        if let Some(bounds) = within {
            center.x = clamp_axis(target.x, bounds.min.x, bounds.max.x, half.x);
            center.y = clamp_axis(target.y, bounds.min.y, bounds.max.y, half.y);
        }
        self.offset = viewport * 0.5 - center * self.scale;
    }

    pub fn to_snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            scale: self.scale,
            offset: self.offset.into(),
        }
    }

    /// Adopt a stored view. The scale is clamped to this transform's limits.
    pub fn apply_snapshot(&mut self, snapshot: &ViewSnapshot) {
        self.set(snapshot.scale, Vec2::from(snapshot.offset));
    }
}

fn clamp_axis(value: f64, min: f64, max: f64, half_visible: f64) -> f64 {
    if max - min <= 2.0 * half_visible {
        (min + max) * 0.5
    } else {
        value.clamp(min + half_visible, max - half_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_zoom_at_scenario() {
        let mut view = ViewTransform::default();
        let anchor = Vec2::new(100.0, 100.0);
        let before = view.screen_to_world(anchor);

        assert!(view.zoom_at(2.0, anchor));

        assert_eq!(view.scale(), 2.0);
        assert_close(view.screen_to_world(anchor), before);
        assert_eq!(view.offset(), Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn test_zoom_is_clamped_and_anchored_to_clamped_scale() {
        let mut view = ViewTransform::default();
        let anchor = Vec2::new(320.0, 40.0);
        let before = view.screen_to_world(anchor);

        assert!(view.zoom_at(100.0, anchor));
        assert_eq!(view.scale(), 5.0);
        assert_close(view.world_to_screen(before), anchor);

        assert!(!view.zoom_at(2.0, anchor));
        assert!(view.zoom_at(1e-6, anchor));
        assert_eq!(view.scale(), 0.2);
        assert_close(view.world_to_screen(before), anchor);
    }

    #[test]
    fn test_zoom_rejects_invalid_factor() {
        let mut view = ViewTransform::default();
        assert!(!view.zoom_at(0.0, Vec2::ZERO));
        assert!(!view.zoom_at(-2.0, Vec2::ZERO));
        assert!(!view.zoom_at(f64::NAN, Vec2::ZERO));
        assert!(view.is_identity());
    }

    #[test]
    fn test_pan_and_reset() {
        let mut view = ViewTransform::default();
        view.pan_by(Vec2::new(15.0, -5.0));
        view.pan_by(Vec2::new(5.0, 5.0));
        assert_eq!(view.offset(), Vec2::new(20.0, 0.0));
        assert_eq!(view.world_to_screen(Vec2::new(1.0, 1.0)), Vec2::new(21.0, 1.0));
        view.reset();
        assert!(view.is_identity());
    }

    #[test]
    fn test_fit_bounds_centres_content() {
        let mut view = ViewTransform::default();
        let bounds = Rect::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(200.0, 100.0));
        let viewport = Vec2::new(1000.0, 680.0);
        view.fit_bounds(bounds, viewport, 50.0);
        // 900 / 200 = 4.5, 580 / 100 = 5.8
        assert_eq!(view.scale(), 4.5);
        assert_close(view.world_to_screen(bounds.center()), viewport * 0.5);
    }

    #[test]
    fn test_center_on_clamps_to_bounds() {
        let mut view = ViewTransform::default();
        let viewport = Vec2::new(200.0, 100.0);
        let bounds = Rect::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 80.0));

        view.center_on(Vec2::new(990.0, 10.0), viewport, Some(bounds));
        // x is pulled back so the right edge lines up; y is narrower than the view.
        assert_close(view.screen_to_world(viewport * 0.5), Vec2::new(900.0, 40.0));

        view.center_on(Vec2::new(500.0, 10.0), viewport, None);
        assert_close(view.screen_to_world(viewport * 0.5), Vec2::new(500.0, 10.0));
    }

    #[test]
    fn test_snapshot_clamps_out_of_range_scale() {
        let mut view = ViewTransform::default();
        view.apply_snapshot(&ViewSnapshot {
            scale: 12.0,
            offset: [3.0, 4.0],
        });
        assert_eq!(view.scale(), 5.0);
        assert_eq!(view.to_snapshot().offset, [3.0, 4.0]);
    }
}

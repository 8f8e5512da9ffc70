use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D point or vector. Used for both world and screen coordinates; which
/// space a value lives in is determined by where it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extent(center: Vec2, half_extent: f64) -> Self {
        Self {
            min: Vec2::new(center.x - half_extent, center.y - half_extent),
            max: Vec2::new(center.x + half_extent, center.y + half_extent),
        }
    }

    /// Smallest rectangle containing every point, or `None` for an empty iterator.
    pub fn bounding(points: impl IntoIterator<Item = Vec2>) -> Option<Rect> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut rect = Rect::from_min_max(first, first);
        for p in points {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Return a new rectangle expanded by `amount` on all sides
    pub fn expand(&self, amount: f64) -> Rect {
        Rect {
            min: Vec2::new(self.min.x - amount, self.min.y - amount),
            max: Vec2::new(self.max.x + amount, self.max.y + amount),
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
///
/// The projection parameter is clamped to `[0, 1]`; a degenerate segment
/// reduces to the distance to `a`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// `round(value / step) * step`. A non-positive step leaves the value unchanged.
pub fn snap_to_grid(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return value;
    }
    (value / step).round() * step
}

pub fn snap_point(point: Vec2, step: f64) -> Vec2 {
    Vec2::new(snap_to_grid(point.x, step), snap_to_grid(point.y, step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_segment_distance_projection() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert_eq!(point_segment_distance(Vec2::new(50.0, 3.0), a, b), 3.0);
        // Beyond the end the distance is measured to the endpoint.
        assert_eq!(point_segment_distance(Vec2::new(103.0, 4.0), a, b), 5.0);
        assert_eq!(point_segment_distance(Vec2::new(-3.0, -4.0), a, b), 5.0);
    }

    #[test]
    fn test_point_segment_distance_degenerate() {
        let a = Vec2::new(10.0, 10.0);
        assert_eq!(point_segment_distance(Vec2::new(13.0, 14.0), a, a), 5.0);
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(37.0, 24.0), 48.0);
        assert_eq!(snap_to_grid(35.0, 24.0), 24.0);
        assert_eq!(snap_to_grid(-13.0, 24.0), -24.0);
        assert_eq!(snap_to_grid(7.3, 0.0), 7.3);
        assert_eq!(snap_point(Vec2::new(11.0, 13.0), 24.0), Vec2::new(0.0, 24.0));
    }

    #[test]
    fn test_rect_bounding() {
        assert!(Rect::bounding(std::iter::empty()).is_none());
        let rect = Rect::bounding([
            Vec2::new(10.0, -5.0),
            Vec2::new(-2.0, 7.0),
            Vec2::new(4.0, 1.0),
        ])
        .unwrap();
        assert_eq!(rect.min, Vec2::new(-2.0, -5.0));
        assert_eq!(rect.max, Vec2::new(10.0, 7.0));
        assert_eq!(rect.center(), Vec2::new(4.0, 1.0));
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(!rect.expand(1.0).contains(Vec2::new(12.0, 0.0)));
    }
}

//! Orthographic projection of cell space onto the drawing plane
//!
//! The view looks from `(1, 1, 1)` toward the origin with `y` up, matching
//! the default camera of the interactive viewer.

use crate::scene::Point3;

/// A point on the drawing plane (SVG coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned extent on the drawing plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Square box around a circle
    pub fn around(center: Point, radius: f64) -> BoundingBox {
        BoundingBox::new(
            center.x - radius,
            center.y - radius,
            2.0 * radius,
            2.0 * radius,
        )
    }
}

/// Orthographic camera
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    right: Point3,
    up: Point3,
    toward_viewer: Point3,
    scale: f64,
}

impl Projection {
    /// Isometric view scaled to `scale` pixels per length unit
    pub fn isometric(scale: f64) -> Self {
        let s2 = 2f64.sqrt();
        let s3 = 3f64.sqrt();
        let s6 = 6f64.sqrt();
        Self {
            right: Point3::new(1.0 / s2, 0.0, -1.0 / s2),
            up: Point3::new(-1.0 / s6, 2.0 / s6, -1.0 / s6),
            toward_viewer: Point3::new(1.0 / s3, 1.0 / s3, 1.0 / s3),
            scale,
        }
    }

    /// Position on the drawing plane
    pub fn project(&self, p: &Point3) -> Point {
        Point::new(
            p.dot(&self.right) * self.scale,
            -p.dot(&self.up) * self.scale,
        )
    }

    /// Distance toward the viewer; larger values are drawn later
    pub fn depth(&self, p: &Point3) -> f64 {
        p.dot(&self.toward_viewer)
    }

    /// Length on the drawing plane for a length in cell units
    pub fn length(&self, l: f64) -> f64 {
        l * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_origin_projects_to_origin() {
        let proj = Projection::isometric(100.0);
        assert_eq!(proj.project(&Point3::new(0.0, 0.0, 0.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_y_axis_points_up() {
        let proj = Projection::isometric(1.0);
        let p = proj.project(&Point3::new(0.0, 1.0, 0.0));
        assert!(close(p.x, 0.0));
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_view_diagonal_collapses_to_a_point() {
        let proj = Projection::isometric(10.0);
        let p = proj.project(&Point3::new(1.0, 1.0, 1.0));
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 0.0));
        assert!(proj.depth(&Point3::new(1.0, 1.0, 1.0)) > proj.depth(&Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::around(Point::new(20.0, 5.0), 5.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, 0.0, 25.0, 10.0));
    }
}

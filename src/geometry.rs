//! Pure geometry for landmark-driven overlay placement.
//!
//! Everything in this module operates on *normalized* image coordinates:
//! positions are relative to the frame size, with `(0, 0)` at the top-left
//! corner, `(1, 1)` at the bottom-right, and Y growing downwards. Conversion
//! to pixel coordinates happens at the very end via [`Point::to_pixels`].
//!
//! All functions are total over finite inputs and perform no I/O. Non-finite
//! coordinates are not sanitized here; they propagate into the resulting
//! [`Transform`], whose consumers must refuse to place it.

use nalgebra::Vector2;

use crate::resolution::Resolution;

/// A 2D point in normalized image coordinates.
///
/// Values outside `[0, 1]` describe positions off the visible frame and are
/// legal everywhere in this module; landmarks can sit at or beyond the frame
/// edges, and overlays may be placed off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Mirrors the point horizontally around the frame center.
    ///
    /// The video feed is presented as a selfie view, so every X coordinate
    /// has to be flipped before pixel conversion.
    #[inline]
    pub fn mirror_x(self) -> Self {
        Self::new(1.0 - self.x, self.y)
    }

    /// Converts the point to pixel coordinates of the given surface.
    ///
    /// Pure scaling by width and height. Out-of-range input maps to
    /// off-screen pixel positions instead of being clamped.
    pub fn to_pixels(self, resolution: Resolution) -> (f32, f32) {
        (
            self.x * resolution.width() as f32,
            self.y * resolution.height() as f32,
        )
    }
}

/// Euclidean distance between two points, in normalized units.
pub fn distance(a: Point, b: Point) -> f32 {
    Vector2::new(b.x - a.x, b.y - a.y).norm()
}

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// A placement transform derived from a pair of landmarks.
///
/// The position is the midpoint of the pair, `scale` is the pair's Euclidean
/// distance (dimensionless, normalized units), and `rotation` is the signed
/// angle of the vector from the first to the second point, in radians in
/// `(−π, π]`. A purely horizontal right-pointing vector has rotation `0`; a
/// purely vertical downward one has `π/2`, since Y grows downwards.
///
/// Transforms are derived values: they are recomputed from landmarks every
/// frame and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    x: f32,
    y: f32,
    scale: f32,
    rotation: f32,
}

impl Transform {
    /// Computes the placement transform for the landmark pair `a`, `b`.
    ///
    /// Passing the same point twice is allowed (single-landmark placements do
    /// this) and yields a zero `scale`, which marks the transform as
    /// [degenerate](Self::is_degenerate).
    pub fn between(a: Point, b: Point) -> Self {
        let rel = Vector2::new(b.x - a.x, b.y - a.y);
        let mid = midpoint(a, b);
        Self {
            x: mid.x,
            y: mid.y,
            scale: rel.norm(),
            // atan2 keeps the quadrant: pointing right is 0, pointing down
            // (Y grows downwards) is π/2, pointing left is exactly π.
            rotation: rel.y.atan2(rel.x),
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// The transform's position as a [`Point`].
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Signed rotation in radians, in `(−π, π]`.
    #[inline]
    pub fn rotation_radians(&self) -> f32 {
        self.rotation
    }

    /// Signed rotation in degrees.
    #[inline]
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.to_degrees()
    }

    /// Returns whether this transform must not be used for placement.
    ///
    /// True for zero-distance landmark pairs and for transforms whose scale
    /// is not finite. Degenerate transforms are a "do not render" signal, not
    /// an error.
    pub fn is_degenerate(&self) -> bool {
        !(self.scale > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;

    #[test]
    fn horizontal_pair() {
        let t = Transform::between(Point::new(0.2, 0.5), Point::new(0.8, 0.5));
        assert_relative_eq!(t.x(), 0.5);
        assert_relative_eq!(t.y(), 0.5);
        assert_relative_eq!(t.scale(), 0.6);
        assert_relative_eq!(t.rotation_radians(), 0.0);
    }

    #[test]
    fn vertical_pair_points_down() {
        let t = Transform::between(Point::new(0.5, 0.2), Point::new(0.5, 0.8));
        assert_relative_eq!(t.rotation_radians(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn diagonal_pair() {
        let t = Transform::between(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert_relative_eq!(t.rotation_radians(), FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn rotation_quadrants() {
        let left = Transform::between(Point::new(1.0, 0.5), Point::new(0.0, 0.5));
        assert_relative_eq!(left.rotation_degrees(), 180.0, epsilon = 1e-4);

        let down = Transform::between(Point::new(0.5, 0.0), Point::new(0.5, 1.0));
        assert_relative_eq!(down.rotation_degrees(), 90.0, epsilon = 1e-4);

        let up = Transform::between(Point::new(0.5, 1.0), Point::new(0.5, 0.0));
        assert_relative_eq!(up.rotation_radians(), -FRAC_PI_2, epsilon = 1e-6);
        assert!(up.rotation_radians() > -PI && up.rotation_radians() <= PI);
    }

    #[test]
    fn identical_points_are_degenerate() {
        let p = Point::new(0.3, 0.7);
        let t = Transform::between(p, p);
        assert_eq!(t.scale(), 0.0);
        assert!(t.is_degenerate());
        assert_relative_eq!(t.rotation_radians(), 0.0);
        assert_relative_eq!(t.x(), p.x());
        assert_relative_eq!(t.y(), p.y());
    }

    #[test]
    fn nan_scale_is_degenerate() {
        let t = Transform::between(Point::new(f32::NAN, 0.0), Point::new(1.0, 1.0));
        assert!(t.is_degenerate());
    }

    #[test]
    fn pixel_conversion() {
        let res = Resolution::RES_1080P;
        assert_eq!(Point::new(0.5, 0.5).to_pixels(res), (960.0, 540.0));
        assert_eq!(Point::new(0.0, 0.0).to_pixels(res), (0.0, 0.0));

        let res = Resolution::new(100, 100);
        assert_eq!(Point::new(1.0, 1.0).to_pixels(res), (100.0, 100.0));
        // Off-screen positions are intentional, not clamped.
        assert_eq!(Point::new(-0.5, 1.5).to_pixels(res), (-50.0, 150.0));
    }

    #[test]
    fn mirroring() {
        assert_relative_eq!(Point::new(0.2, 0.4).mirror_x().x(), 0.8);
        assert_relative_eq!(Point::new(0.2, 0.4).mirror_x().y(), 0.4);
        assert_relative_eq!(Point::new(-0.25, 0.0).mirror_x().x(), 1.25);
    }

    #[test]
    fn transform_matches_distance_and_midpoint() {
        for _ in 0..1000 {
            let a = Point::new(fastrand::f32() * 2.0 - 0.5, fastrand::f32() * 2.0 - 0.5);
            let b = Point::new(fastrand::f32() * 2.0 - 0.5, fastrand::f32() * 2.0 - 0.5);
            let t = Transform::between(a, b);
            let mid = midpoint(a, b);
            assert_relative_eq!(t.scale(), distance(a, b), epsilon = 1e-6);
            assert_relative_eq!(t.x(), mid.x(), epsilon = 1e-6);
            assert_relative_eq!(t.y(), mid.y(), epsilon = 1e-6);
        }
    }
}

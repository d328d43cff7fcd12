//! Geometry utilities - points, rectangles and rotation math.
//!
//! Angles are degrees at every public boundary and radians internally.
//! Page coordinates grow right (`x`/`left`) and down (`y`/`top`), so a
//! positive rotation turns clockwise on screen.

use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult};

/// A point in page-local pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Corner positions in `[tl, tr, br, bl]` order.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }
}

/// Position, size and rotation of a layer.
///
/// Rotation is applied about the center of the unrotated box, so
/// `top`/`left` always describe the box before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Distance from the page's top edge.
    pub top: f64,
    /// Distance from the page's left edge.
    pub left: f64,
    /// Width in pixels, always > 0.
    pub width: f64,
    /// Height in pixels, always > 0.
    pub height: f64,
    /// Rotation in degrees, normalized to `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        }
    }
}

impl Geometry {
    /// Create an unrotated geometry.
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Set the rotation (normalized).
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_degrees(degrees);
        self
    }

    /// Center of the box; rotation leaves it in place.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Re-position the box so that its center lands on `center`.
    #[must_use]
    pub fn centered_at(mut self, center: Point) -> Self {
        self.left = center.x - self.width / 2.0;
        self.top = center.y - self.height / 2.0;
        self
    }

    /// World positions of the rotated corners in `[tl, tr, br, bl]` order.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let center = self.center();
        let unrotated = Rect::new(self.left, self.top, self.width, self.height).corners();
        unrotated.map(|corner| rotate_point(corner, center, self.rotation))
    }

    /// Check whether a page point falls inside the rotated box.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        let local = rotate_point(point, self.center(), -self.rotation);
        local.x >= self.left
            && local.x <= self.left + self.width
            && local.y >= self.top
            && local.y <= self.top + self.height
    }

    /// Whether every field is finite and both extents are strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate the layer geometry invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] when a field is NaN or
    /// infinite, or when `width`/`height` is not strictly positive.
    pub fn validate(&self) -> EditorResult<()> {
        let fields = [
            ("top", self.top),
            ("left", self.left),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EditorError::InvalidGeometry(format!(
                "{name} is not finite ({value})"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(EditorError::InvalidGeometry(format!(
                "non-positive size {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Non-finite input is returned unchanged so that callers can reject it.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return degrees;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Rotate `point` about `center` by `degrees`.
#[must_use]
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Rotate a vector (a point relative to the origin) by `degrees`.
#[must_use]
pub fn rotate_vector(dx: f64, dy: f64, degrees: f64) -> (f64, f64) {
    let rotated = rotate_point(Point::new(dx, dy), Point::default(), degrees);
    (rotated.x, rotated.y)
}

/// Angle of the ray from `pivot` to `point`, in degrees within `[0, 360)`.
#[must_use]
pub fn angle_between(pivot: Point, point: Point) -> f64 {
    normalize_degrees((point.y - pivot.y).atan2(point.x - pivot.x).to_degrees())
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Smallest axis-aligned rectangle enclosing the rotated corners of every
/// geometry. Returns `None` for an empty input.
pub fn bounding_box<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Option<Rect> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for corner in geometries.into_iter().flat_map(Geometry::corners) {
        let (min_x, min_y, max_x, max_y) =
            bounds.get_or_insert((corner.x, corner.y, corner.x, corner.y));
        *min_x = min_x.min(corner.x);
        *min_y = min_y.min(corner.y);
        *max_x = max_x.max(corner.x);
        *max_y = max_y.max(corner.y);
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-6 && (actual.y - y).abs() < 1e-6,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(0.0)).abs() < EPS);
        assert!((normalize_degrees(360.0)).abs() < EPS);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < EPS);
        assert!((normalize_degrees(725.0) - 5.0).abs() < EPS);
        assert!((normalize_degrees(-1e-20)).abs() < EPS);
        assert!(normalize_degrees(f64::NAN).is_nan());
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let center = Point::new(10.0, 10.0);
        // Clockwise on screen: right of center goes to below center
        assert_point(rotate_point(Point::new(20.0, 10.0), center, 90.0), 10.0, 20.0);
        assert_point(rotate_point(Point::new(20.0, 10.0), center, -90.0), 10.0, 0.0);
    }

    #[test]
    fn test_rotate_point_round_trip() {
        let center = Point::new(3.0, -7.0);
        let point = Point::new(41.5, 12.25);
        let there = rotate_point(point, center, 37.0);
        let back = rotate_point(there, center, -37.0);
        assert_point(back, point.x, point.y);
    }

    #[test]
    fn test_angle_between() {
        let pivot = Point::new(175.0, 175.0);
        assert!((angle_between(pivot, Point::new(275.0, 175.0))).abs() < EPS);
        assert!((angle_between(pivot, Point::new(175.0, 275.0)) - 90.0).abs() < EPS);
        assert!((angle_between(pivot, Point::new(175.0, 75.0)) - 270.0).abs() < EPS);
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_corners_rotated_square() {
        let geometry = Geometry::new(0.0, 0.0, 100.0, 100.0).with_rotation(90.0);
        let [tl, tr, br, bl] = geometry.corners();
        assert_point(tl, 100.0, 0.0);
        assert_point(tr, 100.0, 100.0);
        assert_point(br, 0.0, 100.0);
        assert_point(bl, 0.0, 0.0);
    }

    #[test]
    fn test_contains_point_respects_rotation() {
        let geometry = Geometry::new(0.0, 0.0, 200.0, 20.0).with_rotation(90.0);
        // Center is (100, 10); rotated the bar stands upright
        assert!(geometry.contains_point(Point::new(100.0, 80.0)));
        assert!(!geometry.contains_point(Point::new(180.0, 10.0)));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(bounding_box(&Vec::<Geometry>::new()).is_none());
    }

    #[test]
    fn test_bounding_box_multiple() {
        let a = Geometry::new(10.0, 10.0, 20.0, 20.0);
        let b = Geometry::new(50.0, 40.0, 10.0, 30.0);
        let bounds = bounding_box([&a, &b]).expect("bounds");
        assert!((bounds.left - 10.0).abs() < EPS);
        assert!((bounds.top - 10.0).abs() < EPS);
        assert!((bounds.right() - 50.0).abs() < EPS);
        assert!((bounds.bottom() - 80.0).abs() < EPS);
    }

    #[test]
    fn test_bounding_box_rotated() {
        let geometry = Geometry::new(0.0, 0.0, 100.0, 100.0).with_rotation(45.0);
        let bounds = bounding_box([&geometry]).expect("bounds");
        let diagonal = 100.0 * 2.0_f64.sqrt();
        assert!((bounds.width - diagonal).abs() < 1e-6);
        assert!((bounds.height - diagonal).abs() < 1e-6);
        assert_point(bounds.center(), 50.0, 50.0);
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        assert!(Geometry::new(0.0, 0.0, 0.0, 10.0).validate().is_err());
        assert!(Geometry::new(0.0, 0.0, 10.0, -1.0).validate().is_err());
        assert!(Geometry::new(f64::NAN, 0.0, 10.0, 10.0).validate().is_err());
        assert!(Geometry::new(0.0, 0.0, 10.0, f64::INFINITY).validate().is_err());
        assert!(Geometry::new(0.0, 0.0, 10.0, 10.0).validate().is_ok());
    }
}

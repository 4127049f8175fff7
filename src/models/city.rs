//! Point and city types.

use serde::{Deserialize, Serialize};

/// A position on the plane.
///
/// # Examples
///
/// ```
/// use u_mtsp::models::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    ///
    /// Computed with `hypot`, so only gaps beyond `f64::MAX` overflow.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the point moved `fraction` of the way toward `to`.
    pub fn toward(&self, to: &Point, fraction: f64) -> Point {
        Point {
            x: self.x + (to.x - self.x) * fraction,
            y: self.y + (to.y - self.y) * fraction,
        }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A city to be visited by one of the salesmen.
///
/// City 0 is conventionally the depot for the exact solver.
///
/// # Examples
///
/// ```
/// use u_mtsp::models::City;
///
/// let c = City::new(2, 41.0, 49.0);
/// assert_eq!(c.id(), 2);
/// assert_eq!(c.x(), 41.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    id: usize,
    position: Point,
}

impl City {
    /// Creates a new city.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }

    /// Builds cities `0..points.len()` from a coordinate list.
    pub fn from_coordinates(points: &[(f64, f64)]) -> Vec<City> {
        points
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| City::new(id, x, y))
            .collect()
    }

    /// City index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Position on the plane.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Euclidean distance to another city.
    pub fn distance_to(&self, other: &City) -> f64 {
        self.position.distance_to(&other.position)
    }
}

//! Obstacle shapes and ray intersection.
//!
//! All intersections take a ray origin and a unit direction and return the smallest non-negative
//! parametric distance at which the ray meets the shape boundary.

use super::{error::positive, ConfigError, Position, Vector};
use nalgebra::Matrix2;

/// Below this determinant a ray is considered parallel to a polygon edge.
const PARALLEL_EPSILON: f64 = 1e-9;
/// Below this direction component a ray is considered parallel to a bounding box slab.
const SLAB_EPSILON: f64 = 1e-12;
/// Below this squared length a ray direction is considered degenerate.
const DIRECTION_EPSILON: f64 = 1e-12;

/// Static obstacle. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub enum Obstacle {
    Circle(Circle),
    Polygon(Polygon),
}

impl Obstacle {
    pub fn circle(center: Position, radius: f64) -> Result<Self, ConfigError> {
        Circle::new(center, radius).map(Obstacle::Circle)
    }

    pub fn polygon(vertices: Vec<Position>) -> Result<Self, ConfigError> {
        Polygon::new(vertices).map(Obstacle::Polygon)
    }

    pub fn intersect(&self, origin: Position, direction: Vector) -> Option<f64> {
        match self {
            Obstacle::Circle(circle) => circle.intersect(origin, direction),
            Obstacle::Polygon(polygon) => polygon.intersect(origin, direction),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Obstacle::Circle(circle) => circle.bounding_box(),
            Obstacle::Polygon(polygon) => polygon.bounding_box(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    center: Position,
    radius: f64,
}

impl Circle {
    pub fn new(center: Position, radius: f64) -> Result<Self, ConfigError> {
        if !center.is_finite() {
            return Err(ConfigError::CircleCenter);
        }
        if !positive(radius) {
            return Err(ConfigError::CircleRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Solves `|O + tD - C|² = r²` for `t`.
    pub fn intersect(&self, origin: Position, direction: Vector) -> Option<f64> {
        let oc = origin - self.center;
        let a = direction.norm_squared();
        if a < DIRECTION_EPSILON {
            return None;
        }
        let b = 2.0 * oc.dot(&direction);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = b.powi(2) - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let near = (-b - discriminant.sqrt()) / (2.0 * a);
        // A negative root lies behind the origin, including rays starting inside the circle.
        (near >= 0.0).then_some(near)
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x_min: self.center.x() - self.radius,
            x_max: self.center.x() + self.radius,
            y_min: self.center.y() - self.radius,
            y_max: self.center.y() + self.radius,
        }
    }
}

/// Closed polygon given by its vertices in order. The last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Position>,
    bounding_box: BoundingBox,
}

impl Polygon {
    pub fn new(vertices: Vec<Position>) -> Result<Self, ConfigError> {
        if let Some(idx) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(ConfigError::PolygonVertex(idx));
        }
        let bounding_box = BoundingBox::enclosing(&vertices).ok_or(ConfigError::EmptyPolygon)?;
        Ok(Self {
            vertices,
            bounding_box,
        })
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn edges(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .map(|(p1, p2)| (*p1, *p2))
    }

    pub fn intersect(&self, origin: Position, direction: Vector) -> Option<f64> {
        if !self.bounding_box.hit_by_ray(origin, direction) {
            return None;
        }
        self.intersect_edges(origin, direction)
    }

    /// Nearest edge hit without the bounding box rejection.
    fn intersect_edges(&self, origin: Position, direction: Vector) -> Option<f64> {
        self.edges()
            .filter_map(|(p1, p2)| intersect_segment(origin, direction, p1, p2))
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Solves `O + tD = P1 + u(P2 - P1)` and accepts `t >= 0`, `u ∈ [0, 1]`.
fn intersect_segment(
    origin: Position,
    direction: Vector,
    p1: Position,
    p2: Position,
) -> Option<f64> {
    let edge = p2 - p1;
    let system = Matrix2::from_columns(&[direction, -edge]);
    if system.determinant().abs() < PARALLEL_EPSILON {
        return None;
    }
    let solution = system.try_inverse()? * (p1 - origin);
    let (t, u) = (solution.x, solution.y);
    (t >= 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn enclosing(points: &[Position]) -> Option<Self> {
        let first = points.first()?;
        Some(points.iter().fold(
            BoundingBox {
                x_min: first.x(),
                x_max: first.x(),
                y_min: first.y(),
                y_max: first.y(),
            },
            |b, p| BoundingBox {
                x_min: b.x_min.min(p.x()),
                x_max: b.x_max.max(p.x()),
                y_min: b.y_min.min(p.y()),
                y_max: b.y_max.max(p.y()),
            },
        ))
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.x_min..=self.x_max).contains(&position.x())
            && (self.y_min..=self.y_max).contains(&position.y())
    }

    /// Slab test. Conservative: a `true` result does not guarantee an edge hit.
    pub fn hit_by_ray(&self, origin: Position, direction: Vector) -> bool {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for (o, d, min, max) in [
            (origin.x(), direction.x, self.x_min, self.x_max),
            (origin.y(), direction.y, self.y_min, self.y_max),
        ] {
            if d.abs() > SLAB_EPSILON {
                let t1 = (min - o) / d;
                let t2 = (max - o) / d;
                t_min = t_min.max(t1.min(t2));
                t_max = t_max.min(t1.max(t2));
            } else if o < min || o > max {
                return false;
            }
        }

        t_max >= t_min && t_max >= 0.0
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

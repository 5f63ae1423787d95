//! Environment with obstacles.

use super::{geometry::BoundingBox, Obstacle, Position, Vector};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    obstacles: Vec<Obstacle>,
}

impl Environment {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Smallest box enclosing every obstacle, `None` for an empty environment.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.obstacles
            .iter()
            .map(Obstacle::bounding_box)
            .reduce(|a, b| a.union(&b))
    }

    /// Distance along the ray to the nearest obstacle surface, capped at `max_range`.
    pub fn distance_to_next_obstacle(
        &self,
        position: Position,
        direction: Vector,
        max_range: f64,
    ) -> f64 {
        self.obstacles
            .iter()
            .filter_map(|o| o.intersect(position, direction))
            .fold(max_range, f64::min)
    }
}

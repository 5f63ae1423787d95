//! Basic building blocks.

use std::{
    f64::consts::PI,
    ops::{Add, Neg, Sub},
};

use nalgebra::{Rotation2, Vector2};

/// Free vector in the plane, used for directions, velocities and forces.
pub type Vector = Vector2<f64>;

/// Velocity in m/s.
pub type Velocity = Vector2<f64>;

/// Force acting on the robot. The body has unit mass, so this is also its acceleration.
pub type Force = Vector2<f64>;

/// Point in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn distance(&self, position: Self) -> f64 {
        (*self - position).norm()
    }

    pub fn rotate_vector(&self, angle: Angle) -> Position {
        (angle.rotation() * self.to_vector()).into()
    }

    pub fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector> for Position {
    fn from(value: Vector) -> Self {
        Self::new(value.x, value.y)
    }
}

impl Add<Vector> for Position {
    type Output = Position;

    fn add(self, rhs: Vector) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_deg(degree: f64) -> Self {
        Self(degree * PI / 180.0)
    }

    pub fn to_deg(self) -> f64 {
        (self.0 * (180.0 / PI) + 360.0) % 360.0
    }

    /// Unit vector pointing in the direction of the angle.
    pub fn unit_vector(self) -> Vector {
        Vector::new(self.0.cos(), self.0.sin())
    }

    pub fn rotation(self) -> Rotation2<f64> {
        Rotation2::new(self.0)
    }
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Angle(-self.0)
    }
}

impl From<Angle> for f64 {
    fn from(value: Angle) -> Self {
        value.0
    }
}

/// Position and heading of the robot in the global frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Pose {
    pub position: Position,
    pub heading: Angle,
}

impl Pose {
    pub const fn new(position: Position, heading: Angle) -> Self {
        Self { position, heading }
    }

    /// Transforms a point from the robot frame into the global frame.
    pub fn to_global(&self, local: Position) -> Position {
        self.position + local.rotate_vector(self.heading).to_vector()
    }

    /// Transforms a point from the global frame into the robot frame.
    pub fn to_local(&self, global: Position) -> Position {
        Position::from(global - self.position).rotate_vector(-self.heading)
    }
}

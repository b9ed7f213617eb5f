use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A 2D vector value. Every operation returns a new vector; operands are never mutated.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Creates a new Vector2.
    pub fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Vector2 { x: 0.0, y: 0.0 }
    }

    /// Builds a vector from a length and a direction (radians).
    /// The y component is negated to match screen coordinates, where y grows downward.
    pub fn from_magnitude_direction(magnitude: f64, direction: f64) -> Self {
        Vector2 {
            x: magnitude * direction.cos(),
            y: -magnitude * direction.sin(),
        }
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the unit vector pointing the same way, or `None` for the zero vector.
    pub fn unit(&self) -> Option<Self> {
        let len = self.magnitude();
        if len > 0.0 {
            Some(self.scale(1.0 / len))
        } else {
            None
        }
    }

    /// Direction of the vector in (-pi, pi].
    /// Uses atan2 for quadrant correctness.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Calculates the dot product with another vector.
    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(&self, other: Vector2) -> f64 {
        self.sub(other).magnitude()
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, scalar: f64) -> Self {
        Vector2 { x: self.x * scalar, y: self.y * scalar }
    }

    /// Adds another vector to this vector.
    pub fn add(&self, other: Vector2) -> Self {
        Vector2 { x: self.x + other.x, y: self.y + other.y }
    }

    /// Subtracts another vector from this vector.
    pub fn sub(&self, other: Vector2) -> Self {
        Vector2 { x: self.x - other.x, y: self.y - other.y }
    }

    /// True when both components are finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// Implement standard operators for convenience
impl Add for Vector2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vector2::add(&self, other)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        *self = Vector2::add(self, other);
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vector2::sub(&self, other)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        // Division by zero yields non-finite components, callers check with is_finite()
        Self { x: self.x / scalar, y: self.y / scalar }
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from(v: [f64; 2]) -> Self {
        Vector2::new(v[0], v[1])
    }
}

impl From<Vector2> for (f64, f64) {
    fn from(v: Vector2) -> Self {
        (v.x, v.y)
    }
}

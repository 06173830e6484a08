use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in viewport pixel coordinates. Coordinates may be negative or
/// fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return the origin point.
    pub fn zero() -> Self {
        (0.0, 0.0).into()
    }

    /// Return true when both coordinates are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Shift the point by an offset.
    pub fn shift(&self, x: f64, y: f64) -> Self {
        Self {
            x: self.x + x,
            y: self.y + y,
        }
    }

    /// Distance to another point along both axes, whichever is larger.
    pub fn chebyshev(&self, other: Self) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add() {
        assert_eq!(Point::zero() + (1.0, 1.0).into(), (1.0, 1.0).into());
        assert_eq!(Point::zero() + (1.0, 0.0).into(), (1.0, 0.0).into());
        assert_eq!(Point::new(3.0, 4.0) - Point::new(1.0, 1.0), (2.0, 3.0).into());
    }

    #[test]
    fn chebyshev() {
        assert_eq!(Point::new(0.0, 0.0).chebyshev(Point::new(-3.0, 2.0)), 3.0);
    }
}

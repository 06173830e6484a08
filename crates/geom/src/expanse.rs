use serde::{Deserialize, Serialize};

use super::{Point, Rect};

/// A size without a position. Surfaces are measured as expanses before
/// they are placed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Expanse {
    /// Width in pixels.
    pub w: f64,
    /// Height in pixels.
    pub h: f64,
}

impl Expanse {
    /// Construct an expanse from a width and height.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Width times height.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// A rect of this size at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::default(),
            w: self.w,
            h: self.h,
        }
    }

    /// Does `other` fit inside this size?
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Expanse {
    fn from(rect: Rect) -> Self {
        Self {
            w: rect.w,
            h: rect.h,
        }
    }
}

impl From<(f64, f64)> for Expanse {
    fn from(v: (f64, f64)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() {
        let big = Expanse::new(800.0, 600.0);
        assert!(big.contains(&Expanse::new(80.0, 400.0)));
        assert!(!big.contains(&Expanse::new(80.0, 601.0)));
        assert_eq!(big.area(), 480_000.0);
    }
}

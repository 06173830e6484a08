use serde::{Deserialize, Serialize};

use super::{Expanse, Point};
use crate::error::{Error, Result};

/// A rectangle in viewport pixel coordinates, with a top-left origin and a
/// non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// Construct a rectangle, rejecting negative or non-finite values.
    pub fn try_new(x: f64, y: f64, w: f64, h: f64) -> Result<Self> {
        let r = Self::new(x, y, w, h);
        r.validate()?;
        Ok(r)
    }

    /// Check that all components are finite and the size is non-negative.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.tl.x, self.tl.y, self.w, self.h]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::NonFinite(format!("{self:?}")));
        }
        if self.w < 0.0 || self.h < 0.0 {
            return Err(Error::NegativeSize { w: self.w, h: self.h });
        }
        Ok(())
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect have a zero size?
    pub fn is_zero(&self) -> bool {
        self.w == 0.0 || self.h == 0.0
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.tl.x
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.tl.y
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.tl.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.tl.y + self.h
    }

    /// The four corners, clockwise from the top left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.tl,
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Grow the rectangle by `px` on every side. Negative values shrink it,
    /// never below a zero size.
    pub fn outset(&self, px: f64) -> Self {
        let w = (self.w + 2.0 * px).max(0.0);
        let h = (self.h + 2.0 * px).max(0.0);
        Self::new(self.tl.x - px, self.tl.y - px, w, h)
    }

    /// Shift the rectangle by an offset.
    pub fn shift(&self, x: f64, y: f64) -> Self {
        Self {
            tl: self.tl.shift(x, y),
            ..*self
        }
    }

    /// Does this rectangle contain the point? Right and bottom edges are
    /// exclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose `other`?
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The overlapping area of two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// The area of this rectangle that falls outside `bounds`.
    pub fn area_outside(&self, bounds: &Self) -> f64 {
        let inside = self.intersect(bounds).map_or(0.0, |r| r.expanse().area());
        self.expanse().area() - inside
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(100.0, 500.0, 80.0, 30.0);
        assert_eq!(r.right(), 180.0);
        assert_eq!(r.bottom(), 530.0);
        assert_eq!(r.corners()[2], Point::new(180.0, 530.0));
    }

    #[test]
    fn validate() {
        assert!(Rect::try_new(0.0, 0.0, -1.0, 2.0).is_err());
        assert!(Rect::try_new(0.0, f64::NAN, 1.0, 2.0).is_err());
        assert!(Rect::try_new(-5.0, -5.0, 1.0, 2.0).is_ok());
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            a.intersect(&Rect::new(5.0, 5.0, 10.0, 10.0)),
            Some(Rect::new(5.0, 5.0, 5.0, 5.0))
        );
        assert_eq!(a.intersect(&Rect::new(10.0, 0.0, 5.0, 5.0)), None);
        assert_eq!(a.area_outside(&Rect::new(0.0, 0.0, 5.0, 10.0)), 50.0);
    }

    #[test]
    fn outset() {
        let r = Rect::new(10.0, 10.0, 4.0, 4.0);
        assert_eq!(r.outset(2.0), Rect::new(8.0, 8.0, 8.0, 8.0));
        assert_eq!(r.outset(-3.0).expanse(), Expanse::new(0.0, 0.0));
    }

    proptest! {
        #[test]
        fn intersection_is_contained(
            ax in -500.0f64..500.0, ay in -500.0f64..500.0,
            aw in 0.0f64..400.0, ah in 0.0f64..400.0,
            bx in -500.0f64..500.0, by in -500.0f64..500.0,
            bw in 0.0f64..400.0, bh in 0.0f64..400.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            if let Some(i) = a.intersect(&b) {
                prop_assert!(a.contains_rect(&i));
                prop_assert!(b.contains_rect(&i));
            }
        }
    }
}

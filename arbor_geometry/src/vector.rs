// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-component value type used for positions, scales, and sizes.

use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector with value semantics.
///
/// Arithmetic is elementwise, either against another [`Vector2`] or against a
/// scalar. Division never fails: a zero divisor component yields
/// [`f64::INFINITY`] for that component.
///
/// ```rust
/// use arbor_geometry::Vector2;
///
/// let q = Vector2::new(10.0, 0.0) / Vector2::new(0.0, 5.0);
/// assert_eq!(q, Vector2::new(f64::INFINITY, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// The vector with both components set to one.
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a vector with both components set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v)
    }

    /// Euclidean length.
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction; the zero vector maps to itself.
    pub fn normalize(self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Self::ZERO;
        }
        self / mag
    }

    /// Components as a tuple.
    pub const fn xy(self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Returns true if both components are zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[inline]
fn div_or_inf(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::INFINITY } else { a / b }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<kurbo::Vec2> for Vector2 {
    fn from(v: kurbo::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for kurbo::Vec2 {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<kurbo::Size> for Vector2 {
    fn from(s: kurbo::Size) -> Self {
        Self::new(s.width, s.height)
    }
}

impl From<Vector2> for kurbo::Size {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for kurbo::Point {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y)
    }
}

macro_rules! elementwise {
    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident, $op:expr) => {
        impl $Trait for Vector2 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self::new($op(self.x, rhs.x), $op(self.y, rhs.y))
            }
        }

        impl $Trait<f64> for Vector2 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: f64) -> Self {
                Self::new($op(self.x, rhs), $op(self.y, rhs))
            }
        }

        impl $AssignTrait for Vector2 {
            #[inline]
            fn $assign(&mut self, rhs: Self) {
                *self = $Trait::$method(*self, rhs);
            }
        }

        impl $AssignTrait<f64> for Vector2 {
            #[inline]
            fn $assign(&mut self, rhs: f64) {
                *self = $Trait::$method(*self, rhs);
            }
        }
    };
}

elementwise!(Add, add, AddAssign, add_assign, |a: f64, b: f64| a + b);
elementwise!(Sub, sub, SubAssign, sub_assign, |a: f64, b: f64| a - b);
elementwise!(Mul, mul, MulAssign, mul_assign, |a: f64, b: f64| a * b);
elementwise!(Div, div, DivAssign, div_assign, div_or_inf);

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_yields_infinity() {
        let q = Vector2::new(10.0, 0.0) / Vector2::new(0.0, 5.0);
        assert_eq!(q, Vector2::new(f64::INFINITY, 0.0));

        let s = Vector2::new(-3.0, 4.0) / 0.0;
        assert!(
            s.x.is_infinite() && s.y.is_infinite(),
            "scalar zero divisor maps both components to infinity"
        );
    }

    #[test]
    fn scalar_and_vector_arithmetic() {
        let a = Vector2::new(2.0, 3.0);
        assert_eq!(a + 1.0, Vector2::new(3.0, 4.0));
        assert_eq!(a - Vector2::ONE, Vector2::new(1.0, 2.0));
        assert_eq!(a * Vector2::new(2.0, 0.5), Vector2::new(4.0, 1.5));
        assert_eq!(a / 2.0, Vector2::new(1.0, 1.5));
        assert_eq!(-a, Vector2::new(-2.0, -3.0));

        let mut b = a;
        b *= 2.0;
        b += Vector2::new(1.0, 1.0);
        assert_eq!(b, Vector2::new(5.0, 7.0));
    }

    #[test]
    fn normalize_is_zero_safe() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
        let n = Vector2::new(3.0, 4.0).normalize();
        assert!((n.magnitude() - 1.0).abs() < 1e-12, "unit length expected");
        assert_eq!(Vector2::new(3.0, 4.0).magnitude(), 5.0);
    }
}

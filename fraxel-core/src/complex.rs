use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A complex number represented as two `f64` components.
///
/// A lightweight `Copy` type shared by the Julia preset table and the CPU
/// kernel mirrors. We roll our own instead of pulling in `num` to keep the
/// dependency graph minimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// The argument (angle) of the complex number, via `atan2`.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// `z^n` computed in polar form. The multibrot/multi-Julia recurrence
    /// uses magnitude/angle exponentiation rather than repeated
    /// multiplication.
    #[inline]
    pub fn powi_polar(self, n: i32) -> Self {
        let r = self.norm_sq().powf(n as f64 / 2.0);
        let theta = n as f64 * self.arg();
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    /// Component-wise absolute value, the burning-ship fold applied before
    /// each squaring step.
    #[inline]
    pub fn abs_fold(self) -> Self {
        Self {
            re: self.re.abs(),
            im: self.im.abs(),
        }
    }
}

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn multiplication() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let c = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!(approx_eq(c.re, -5.0));
        assert!(approx_eq(c.im, 10.0));
    }

    #[test]
    fn polar_power_matches_direct_squaring() {
        let z = Complex::new(0.3, -0.8);
        let direct = z * z;
        let polar = z.powi_polar(2);
        assert!(approx_eq(direct.re, polar.re));
        assert!(approx_eq(direct.im, polar.im));
    }

    #[test]
    fn polar_cube() {
        // (1 + i)³ = -2 + 2i
        let z = Complex::new(1.0, 1.0).powi_polar(3);
        assert!((z.re - (-2.0)).abs() < 1e-9);
        assert!((z.im - 2.0).abs() < 1e-9);
    }

    #[test]
    fn abs_fold_reflects_into_first_quadrant() {
        let z = Complex::new(-1.5, -0.25).abs_fold();
        assert!(approx_eq(z.re, 1.5));
        assert!(approx_eq(z.im, 0.25));
    }

    #[test]
    fn norm_sq() {
        assert!(approx_eq(Complex::new(3.0, 4.0).norm_sq(), 25.0));
    }

    #[test]
    fn serde_round_trip() {
        let z = Complex::new(-0.7, 0.27015);
        let json = serde_json::to_string(&z).unwrap();
        let back: Complex = serde_json::from_str(&json).unwrap();
        assert_eq!(z, back);
    }
}

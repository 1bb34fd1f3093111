//! CPU mirrors of the generated GPU kernels.
//!
//! Each function performs exactly the arithmetic its WGSL counterpart does,
//! with no interior shortcuts or cycle detection, so the escape and
//! hole-pattern properties of the kernels can be asserted without a GPU.

use crate::complex::Complex;

/// Mandelbrot recurrence `z ← z² + c` from `z₀ = 0`.
///
/// Returns the iteration at which `|z|` exceeded `escape_radius`, or
/// `max_iter` if the orbit never escaped.
pub fn mandelbrot(c: Complex, max_iter: u32, escape_radius: f64) -> u32 {
    let r2 = escape_radius * escape_radius;
    let mut z = Complex::ZERO;
    for n in 0..max_iter {
        if z.norm_sq() > r2 {
            return n;
        }
        z = z * z + c;
    }
    max_iter
}

/// Multibrot recurrence `z ← zⁿ + c` computed in polar form.
pub fn multibrot(c: Complex, exponent: i32, max_iter: u32, escape_radius: f64) -> u32 {
    let r2 = escape_radius * escape_radius;
    let mut z = Complex::ZERO;
    for n in 0..max_iter {
        if z.norm_sq() > r2 {
            return n;
        }
        z = z.powi_polar(exponent) + c;
    }
    max_iter
}

/// Julia recurrence: the pixel supplies `z₀`, the preset supplies `c`.
pub fn julia(z0: Complex, c: Complex, max_iter: u32, escape_radius: f64) -> u32 {
    let r2 = escape_radius * escape_radius;
    let mut z = z0;
    let mut n = 0;
    while z.norm_sq() < r2 && n < max_iter {
        z = z * z + c;
        n += 1;
    }
    n
}

/// Generalized Julia with exponent `n`, polar form.
pub fn multi_julia(z0: Complex, c: Complex, exponent: i32, max_iter: u32, escape_radius: f64) -> u32 {
    let r2 = escape_radius * escape_radius;
    let mut z = z0;
    let mut n = 0;
    while z.norm_sq() < r2 && n < max_iter {
        z = z.powi_polar(exponent) + c;
        n += 1;
    }
    n
}

/// Burning ship: components are folded through `abs` before each squaring.
pub fn burning_ship(c: Complex, max_iter: u32, escape_radius: f64) -> u32 {
    let r2 = escape_radius * escape_radius;
    let mut z = Complex::ZERO;
    for n in 0..max_iter {
        if z.norm_sq() > r2 {
            return n;
        }
        let a = z.abs_fold();
        z = a * a + c;
    }
    max_iter
}

/// Convergence tolerance for the Newton iteration, squared.
const NEWTON_TOL_SQ: f64 = 1e-12;

/// The three cube roots of unity, targets of the Newton iteration.
pub const NEWTON_ROOTS: [Complex; 3] = [
    Complex { re: 1.0, im: 0.0 },
    Complex { re: -0.5, im: 0.866_025_403_784_438_6 },
    Complex { re: -0.5, im: -0.866_025_403_784_438_6 },
];

/// Newton's method on `f(z) = z³ − 1`.
///
/// Returns the index of the root the orbit converged to, or `-1` if it
/// failed to converge within `max_iter` steps (including hitting the
/// critical point `z = 0` where the derivative vanishes).
pub fn newton_root(z0: Complex, max_iter: u32) -> i32 {
    let mut z = z0;
    for _ in 0..max_iter {
        let z2 = z * z;
        let z3 = z2 * z;
        let f = z3 - Complex::new(1.0, 0.0);
        let df = Complex::new(3.0 * z2.re, 3.0 * z2.im);
        let denom = df.norm_sq();
        if denom == 0.0 {
            return -1;
        }
        // z ← z − f/f′, with the division expanded.
        z = z - Complex::new(
            (f.re * df.re + f.im * df.im) / denom,
            (f.im * df.re - f.re * df.im) / denom,
        );
        for (i, root) in NEWTON_ROOTS.iter().enumerate() {
            if (z - *root).norm_sq() < NEWTON_TOL_SQ {
                return i as i32;
            }
        }
    }
    -1
}

/// Sierpinski carpet hole test: `depth` rounds of `coord mod 3 == (1,1)`
/// with the coordinate divided by 3 between rounds.
pub fn carpet_is_hole(x: i64, y: i64, depth: u32) -> bool {
    let (mut x, mut y) = (x, y);
    for _ in 0..depth {
        if x % 3 == 1 && y % 3 == 1 {
            return true;
        }
        x /= 3;
        y /= 3;
    }
    false
}

// src/givens.rs

//! Plane rotations used by the band reduction and the QR sweep.

/// Entries below this magnitude are treated as already annihilated.
pub const NEGLIGIBLE: f64 = 1e-12;

/// A 2×2 rotation `[c -s; s c]` acting on a pair of rows (or columns).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GivensRotation {
    pub c: f64,
    pub s: f64,
}

impl GivensRotation {
    /// Rotation that maps `(a, b)` onto `(hypot(a, b), 0)` under [`rotate`].
    ///
    /// Returns `None` when `b` is negligible or the pair has zero norm; callers
    /// skip the rotation in that case.
    ///
    /// [`rotate`]: GivensRotation::rotate
    pub fn zeroing(a: f64, b: f64) -> Option<Self> {
        if b.abs() < NEGLIGIBLE {
            return None;
        }
        let norm = a.hypot(b);
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        Some(GivensRotation {
            c: a / norm,
            s: -b / norm,
        })
    }

    /// Applies the rotation to one pair of entries.
    #[inline]
    pub fn rotate(&self, x: f64, y: f64) -> (f64, f64) {
        (self.c * x - self.s * y, self.s * x + self.c * y)
    }
}

/// Rotation `(c, s, r)` with `c*f + s*g = r` and `-s*f + c*g = 0`.
///
/// Unlike [`GivensRotation::zeroing`] this never skips: a zero `g` yields the
/// identity, so the QR chase always advances.
pub fn chase_rotation(f: f64, g: f64) -> (f64, f64, f64) {
    if g == 0.0 {
        (1.0, 0.0, f)
    } else if f == 0.0 {
        (0.0, 1.0, g)
    } else {
        let r = f.hypot(g);
        (f / r, g / r, r)
    }
}

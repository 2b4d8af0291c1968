use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::complex::Complex;

/// A double-float (`df64`) value: an `f64` carried as two `f32` halves.
///
/// Represents `hi + lo` with `|lo| ≤ ulp(hi)/2`. The pair exists only to
/// cross into stages that have no 64-bit floats (GPU fragment programs);
/// it is always built fresh from an `f64` via [`split`](Self::split) and is
/// never used for arithmetic on the host side.
///
/// Reference: Thall, "Extended-Precision Floating-Point Numbers for GPU
/// Computation" (2006).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DoubleFloat {
    pub hi: f32,
    pub lo: f32,
}

/// Veltkamp splitter for an `f64` → 24-bit high part: `2^29 + 1`.
const SPLITTER: f64 = ((1u64 << 29) + 1) as f64;

impl DoubleFloat {
    pub const ZERO: Self = Self { hi: 0.0, lo: 0.0 };

    /// Error-free split of `value` into a high `f32` and the `f32`-rounded
    /// residual.
    ///
    /// The high half keeps the top 24 significand bits, so it converts to
    /// `f32` exactly; only the residual is rounded. NaN and infinities pass
    /// through with ordinary IEEE semantics.
    #[inline]
    pub fn split(value: f64) -> Self {
        let t = value * SPLITTER;
        let hi = (t - (t - value)) as f32;
        let lo = (value - hi as f64) as f32;
        Self { hi, lo }
    }

    /// Recombine the halves in `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.hi as f64 + self.lo as f64
    }
}

impl From<f64> for DoubleFloat {
    #[inline]
    fn from(value: f64) -> Self {
        Self::split(value)
    }
}

impl fmt::Display for DoubleFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+.8e} + {:+.8e})", self.hi, self.lo)
    }
}

/// A complex value as two [`DoubleFloat`]s (`df64_2` on the shader side).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DoubleFloat2 {
    pub re: DoubleFloat,
    pub im: DoubleFloat,
}

impl DoubleFloat2 {
    pub const ZERO: Self = Self {
        re: DoubleFloat::ZERO,
        im: DoubleFloat::ZERO,
    };

    #[inline]
    pub fn split(c: Complex) -> Self {
        Self {
            re: DoubleFloat::split(c.re),
            im: DoubleFloat::split(c.im),
        }
    }

    #[inline]
    pub fn to_complex(self) -> Complex {
        Complex::new(self.re.to_f64(), self.im.to_f64())
    }
}

impl From<Complex> for DoubleFloat2 {
    #[inline]
    fn from(c: Complex) -> Self {
        Self::split(c)
    }
}

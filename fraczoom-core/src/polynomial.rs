use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::complex::Complex;
use crate::error::CoreError;

/// A dense polynomial with complex coefficients.
///
/// `coefficients[i]` multiplies `xⁱ`, so index 0 is the constant term.
/// Trailing zero coefficients are allowed and never affect equality, which
/// means the algebra below never has to normalise its results.
#[derive(Debug, Clone)]
pub struct Polynomial {
    coefficients: Vec<Complex>,
}

impl Polynomial {
    /// All-zero polynomial with room for `degree + 1` coefficients.
    pub fn zero(degree: usize) -> Self {
        Self {
            coefficients: vec![Complex::ZERO; degree + 1],
        }
    }

    /// Real coefficients in ascending power order. An empty slice is the
    /// zero constant.
    pub fn from_coefficients(reals: &[f64]) -> Self {
        if reals.is_empty() {
            return Self::zero(0);
        }
        Self {
            coefficients: reals.iter().map(|&re| Complex::real(re)).collect(),
        }
    }

    /// The monic polynomial `(x - r₀)(x - r₁)…` with the given roots.
    ///
    /// Returns [`CoreError::EmptyRoots`] rather than a degenerate polynomial
    /// when `roots` is empty.
    pub fn from_roots(roots: &[Complex]) -> crate::Result<Self> {
        let (first, rest) = roots.split_first().ok_or(CoreError::EmptyRoots)?;
        Ok(Self::from_nonempty_roots(*first, rest))
    }

    /// Infallible form of [`from_roots`](Self::from_roots) for callers that
    /// hold at least one root by construction.
    pub fn from_nonempty_roots(first: Complex, rest: &[Complex]) -> Self {
        rest.iter()
            .fold(Self::linear_factor(first), |acc, &root| {
                &acc * &Self::linear_factor(root)
            })
    }

    /// `x - root`.
    fn linear_factor(root: Complex) -> Self {
        Self {
            coefficients: vec![-root, Complex::ONE],
        }
    }

    /// Index of the highest stored coefficient (stored zeros included).
    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn coefficients(&self) -> &[Complex] {
        &self.coefficients
    }

    /// Coefficient of `xⁱ`; zero past the stored length.
    #[inline]
    pub fn coefficient(&self, i: usize) -> Complex {
        self.coefficients.get(i).copied().unwrap_or(Complex::ZERO)
    }

    /// `d/dx`: coefficient `c - 1` of the result is `c · coefficient[c]`.
    pub fn derivative(&self) -> Self {
        if self.coefficients.len() == 1 {
            return Self::zero(0);
        }
        Self {
            coefficients: self
                .coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(c, &value)| value * c as f64)
                .collect(),
        }
    }

    /// Evaluate at `z` using Horner's scheme.
    pub fn evaluate(&self, z: Complex) -> Complex {
        self.coefficients
            .iter()
            .rev()
            .fold(Complex::ZERO, |acc, &coeff| acc * z + coeff)
    }

    fn zip_with(&self, rhs: &Self, op: impl Fn(Complex, Complex) -> Complex) -> Self {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        Self {
            coefficients: (0..len)
                .map(|i| op(self.coefficient(i), rhs.coefficient(i)))
                .collect(),
        }
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Polynomial {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Self) -> Polynomial {
        self.zip_with(rhs, |a, b| a - b)
    }
}

/// Convolution of the coefficient vectors.
impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Polynomial {
        let mut result = Polynomial::zero(self.degree() + rhs.degree());
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in rhs.coefficients.iter().enumerate() {
                result.coefficients[i + j] += a * b;
            }
        }
        result
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Polynomial {
        &self + &rhs
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Self) -> Polynomial {
        &self - &rhs
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Polynomial {
        &self * &rhs
    }
}

/// Exact comparison: shared coefficients must be equal and any extra
/// coefficients on the longer side must be exactly zero.
impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        let len = self.coefficients.len().max(other.coefficients.len());
        (0..len).all(|i| self.coefficient(i) == other.coefficient(i))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (power, coeff) in self.coefficients.iter().enumerate().rev() {
            if coeff.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match power {
                0 => write!(f, "({coeff})")?,
                1 => write!(f, "({coeff})x")?,
                _ => write!(f, "({coeff})x^{power}")?,
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(reals: &[f64]) -> Polynomial {
        Polynomial::from_coefficients(reals)
    }

    fn roots(reals: &[f64]) -> Vec<Complex> {
        reals.iter().map(|&r| Complex::real(r)).collect()
    }

    #[test]
    fn product_of_linear_factors() {
        // (x + 1)(x + 2)(x + 3) = x³ + 6x² + 11x + 6
        let product = poly(&[1.0, 1.0]) * poly(&[2.0, 1.0]) * poly(&[3.0, 1.0]);
        assert_eq!(product, poly(&[6.0, 11.0, 6.0, 1.0]));
        assert_eq!(product.degree(), 3);
    }

    #[test]
    fn derivative_of_cubic() {
        let cubic = poly(&[6.0, 11.0, 6.0, 1.0]);
        assert_eq!(cubic.derivative(), poly(&[11.0, 12.0, 3.0]));
        assert_eq!(cubic.derivative().degree(), 2);
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        assert_eq!(poly(&[5.0]).derivative(), poly(&[0.0]));
    }

    #[test]
    fn from_real_roots() {
        let expected = poly(&[6.0, 11.0, 6.0, 1.0]);
        assert_eq!(
            Polynomial::from_roots(&roots(&[-1.0, -2.0, -3.0])).unwrap(),
            expected
        );
        // (x + 2)x = x² + 2x
        assert_eq!(
            Polynomial::from_roots(&roots(&[-2.0, 0.0])).unwrap(),
            poly(&[0.0, 2.0, 1.0])
        );
    }

    #[test]
    fn from_complex_conjugate_roots() {
        // (x - i)(x + i) = x² + 1
        let p = Polynomial::from_roots(&[Complex::new(0.0, 1.0), Complex::new(0.0, -1.0)])
            .unwrap();
        assert_eq!(p, poly(&[1.0, 0.0, 1.0]));
    }

    #[test]
    fn from_single_root_is_linear() {
        let p = Polynomial::from_roots(&[Complex::new(2.0, -1.0)]).unwrap();
        assert_eq!(p.degree(), 1);
        assert_eq!(p.coefficient(0), Complex::new(-2.0, 1.0));
        assert_eq!(p.coefficient(1), Complex::ONE);
    }

    #[test]
    fn empty_roots_is_an_error() {
        assert_eq!(Polynomial::from_roots(&[]).unwrap_err(), CoreError::EmptyRoots);
    }

    #[test]
    fn repeated_roots_are_well_defined() {
        // (x - 1)³ = x³ - 3x² + 3x - 1
        let p = Polynomial::from_roots(&roots(&[1.0, 1.0, 1.0])).unwrap();
        assert_eq!(p, poly(&[-1.0, 3.0, -3.0, 1.0]));
        assert_eq!(p.derivative().evaluate(Complex::ONE), Complex::ZERO);
    }

    #[test]
    fn roots_evaluate_to_zero() {
        let rs = [Complex::new(1.0, 0.0), Complex::new(2.0, 5.0), Complex::new(3.0, 0.0)];
        let p = Polynomial::from_roots(&rs).unwrap();
        for r in rs {
            assert_eq!(p.evaluate(r), Complex::ZERO, "p({r}) should vanish");
        }
    }

    #[test]
    fn add_and_sub_take_longer_length() {
        let a = poly(&[1.0, 2.0]);
        let b = poly(&[0.0, 1.0, 4.0]);
        let sum = &a + &b;
        assert_eq!(sum.degree(), 2);
        assert_eq!(sum, poly(&[1.0, 3.0, 4.0]));
        assert_eq!(&sum - &b, a);
    }

    #[test]
    fn subtracting_self_is_zero_of_same_length() {
        let a = poly(&[3.0, -1.0, 2.0]);
        let diff = &a - &a;
        assert_eq!(diff.degree(), 2);
        assert_eq!(diff, Polynomial::zero(0));
    }

    #[test]
    fn equality_ignores_trailing_zeros() {
        assert_eq!(poly(&[1.0, 2.0]), poly(&[1.0, 2.0, 0.0, 0.0]));
        assert_eq!(poly(&[1.0, 2.0, 0.0]), poly(&[1.0, 2.0]));
        assert_ne!(poly(&[1.0, 2.0]), poly(&[1.0, 2.0, 0.0, 1.0]));
    }

    #[test]
    fn equality_is_exact() {
        assert_ne!(poly(&[1.0]), poly(&[1.0 + f64::EPSILON]));
    }

    #[test]
    fn empty_coefficients_are_zero_constant() {
        let empty = poly(&[]);
        assert_eq!(empty, Polynomial::zero(0));
        assert_eq!(empty.degree(), 0);
        assert_eq!(empty.derivative(), Polynomial::zero(0));

        let product = &empty * &poly(&[1.0, 1.0]);
        assert_eq!(product.degree(), 1);
        assert_eq!(product, Polynomial::zero(0));
        assert_eq!(&empty + &poly(&[2.0, 3.0]), poly(&[2.0, 3.0]));
    }

    #[test]
    fn coefficient_past_end_is_zero() {
        let p = poly(&[1.0, 2.0]);
        assert_eq!(p.coefficient(7), Complex::ZERO);
    }

    #[test]
    fn display_skips_zero_terms() {
        assert_eq!(poly(&[1.0, 0.0, 1.0]).to_string(), "(1 + 0i)x^2 + (1 + 0i)");
        assert_eq!(Polynomial::zero(2).to_string(), "0");
    }
}

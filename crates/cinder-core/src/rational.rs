use std::fmt;

use crate::error::CinderError;

/// An exact fraction kept in lowest terms with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    num: i64,
    den: i64,
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    pub fn new(num: i64, den: i64) -> Result<Self, CinderError> {
        Self::from_wide(num as i128, den as i128)
    }

    pub fn from_integer(n: i64) -> Self {
        Rational { num: n, den: 1 }
    }

    /// Reduce a wide intermediate result, failing if it no longer fits in `i64`.
    fn from_wide(num: i128, den: i128) -> Result<Self, CinderError> {
        if den == 0 {
            return Err(CinderError::math("rational division by zero"));
        }
        let g = gcd(num, den).max(1);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(num), Ok(den)) => Ok(Rational { num, den }),
            _ => Err(CinderError::math("rational overflow")),
        }
    }

    /// Convert a finite double by scaling by ten until it is integral.
    pub fn from_f64(value: f64) -> Result<Self, CinderError> {
        if !value.is_finite() {
            return Err(CinderError::math(format!(
                "cannot convert {value} to an exact rational"
            )));
        }
        let mut scaled = value;
        let mut den: i64 = 1;
        while scaled.fract() != 0.0 {
            if den >= 1_000_000_000_000_000 {
                return Err(CinderError::math(format!(
                    "cannot convert {value} to an exact rational"
                )));
            }
            scaled *= 10.0;
            den *= 10;
        }
        if scaled.abs() >= i64::MAX as f64 {
            return Err(CinderError::math("rational overflow"));
        }
        Rational::new(scaled as i64, den)
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    pub fn add(&self, other: &Rational) -> Result<Rational, CinderError> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * d + c * b, b * d)
    }

    pub fn sub(&self, other: &Rational) -> Result<Rational, CinderError> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * d - c * b, b * d)
    }

    pub fn mul(&self, other: &Rational) -> Result<Rational, CinderError> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * c, b * d)
    }

    pub fn div(&self, other: &Rational) -> Result<Rational, CinderError> {
        if other.is_zero() {
            return Err(CinderError::math("rational division by zero"));
        }
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * d, b * c)
    }

    pub fn neg(&self) -> Result<Rational, CinderError> {
        let num = self
            .num
            .checked_neg()
            .ok_or_else(|| CinderError::math("rational overflow"))?;
        Ok(Rational { num, den: self.den })
    }

    pub fn abs(&self) -> Result<Rational, CinderError> {
        let num = self
            .num
            .checked_abs()
            .ok_or_else(|| CinderError::math("rational overflow"))?;
        Ok(Rational { num, den: self.den })
    }

    fn wide(&self, other: &Rational) -> (i128, i128, i128, i128) {
        (
            self.num as i128,
            self.den as i128,
            other.num as i128,
            other.den as i128,
        )
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reduces_and_normalizes_sign() {
        let r = Rational::new(6, -8).unwrap();
        assert_eq!(r.numerator(), -3);
        assert_eq!(r.denominator(), 4);
        assert_eq!(r.to_string(), "-3/4");
    }

    #[test]
    fn test_zero_denominator_is_math_error() {
        let err = Rational::new(1, 0).unwrap_err();
        assert!(matches!(err, CinderError::Math(_)));
    }

    #[test]
    fn test_arithmetic() {
        let half = Rational::new(1, 2).unwrap();
        let third = Rational::new(1, 3).unwrap();
        assert_eq!(half.add(&third).unwrap(), Rational::new(5, 6).unwrap());
        assert_eq!(half.sub(&third).unwrap(), Rational::new(1, 6).unwrap());
        assert_eq!(half.mul(&third).unwrap(), Rational::new(1, 6).unwrap());
        assert_eq!(half.div(&third).unwrap(), Rational::new(3, 2).unwrap());
    }

    #[test]
    fn test_divide_by_zero_rational() {
        let half = Rational::new(1, 2).unwrap();
        let zero = Rational::from_integer(0);
        assert!(matches!(half.div(&zero), Err(CinderError::Math(_))));
    }

    #[test]
    fn test_integral_result_prints_without_slash() {
        let r = Rational::new(4, 2).unwrap();
        assert!(r.is_integer());
        assert_eq!(r.to_string(), "2");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Rational::from_f64(0.25).unwrap(), Rational::new(1, 4).unwrap());
        assert_eq!(Rational::from_f64(-1.5).unwrap(), Rational::new(-3, 2).unwrap());
        assert!(Rational::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_overflow_reported() {
        let big = Rational::from_integer(i64::MAX);
        assert!(matches!(big.mul(&big), Err(CinderError::Math(_))));
    }

    #[test]
    fn test_negating_minimum_overflows() {
        let min = Rational::from_integer(i64::MIN);
        assert!(matches!(min.neg(), Err(CinderError::Math(_))));
        assert!(matches!(min.abs(), Err(CinderError::Math(_))));
        let r = Rational::new(-3, 4).unwrap();
        assert_eq!(r.neg().unwrap(), Rational::new(3, 4).unwrap());
        assert_eq!(r.abs().unwrap(), Rational::new(3, 4).unwrap());
    }
}

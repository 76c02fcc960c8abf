//! Active scalar type.
//!
//! [`Active`] carries a value and, when it depends on a wrapped input, the
//! index of the tape node that produced it. Arithmetic records one node per
//! operation; values without a tape reference are passive constants and
//! never touch the tape.

use std::cmp::Ordering;
use std::fmt;
use std::num::FpCategory;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use num_traits::{Float, Num, NumCast, One, ToPrimitive, Zero};

use crate::tape::Tape;

/// Location of a recorded value.
#[derive(Clone, Copy)]
pub(crate) struct Slot<'t> {
    pub(crate) tape: &'t Tape,
    pub(crate) index: usize,
    pub(crate) epoch: u64,
}

/// Scalar tracked by a [`Tape`] for reverse-mode differentiation.
///
/// Implements [`num_traits::Float`], so generic numerical code written
/// against `T: Float` records its operations without modification.
/// Comparisons look at values only.
///
/// # Examples
///
/// ```
/// use num_traits::Float;
/// use pricer_tape::{Active, Tape};
///
/// let tape = Tape::new();
/// let rec = tape.begin_recording().unwrap();
///
/// let s = rec.wrap(100.0);
/// let k = Active::constant(90.0);
/// let payoff = (s - k).max(Active::constant(0.0));
///
/// rec.seed_gradient(payoff, 1.0);
/// rec.propagate_adjoints();
/// assert_eq!(payoff.value(), 10.0);
/// assert_eq!(rec.read_gradient(s), 1.0);
/// ```
#[derive(Clone, Copy)]
pub struct Active<'t> {
    value: f64,
    slot: Option<Slot<'t>>,
}

impl<'t> Active<'t> {
    /// Creates a passive constant.
    #[inline]
    pub const fn constant(value: f64) -> Self {
        Self { value, slot: None }
    }

    #[inline]
    pub(crate) fn recorded(value: f64, slot: Slot<'t>) -> Self {
        Self {
            value,
            slot: Some(slot),
        }
    }

    /// Returns the primal value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns true if this value depends on a wrapped input.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    #[inline]
    pub(crate) fn slot(&self) -> Option<Slot<'t>> {
        self.slot
    }

    /// Result of a one-argument function with local derivative `d`.
    #[inline]
    fn unary(self, value: f64, d: f64) -> Self {
        match self.slot {
            Some(slot) => slot.tape.push_unary(slot, d, value),
            None => Self::constant(value),
        }
    }

    /// Result of a two-argument function with local derivatives `dl`, `dr`.
    #[inline]
    fn binary(self, rhs: Self, value: f64, dl: f64, dr: f64) -> Self {
        match (self.slot, rhs.slot) {
            (None, None) => Self::constant(value),
            (Some(l), None) => l.tape.push_unary(l, dl, value),
            (None, Some(r)) => r.tape.push_unary(r, dr, value),
            (Some(l), Some(r)) => l.tape.push_binary(l, r, dl, dr, value),
        }
    }
}

impl fmt::Debug for Active<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Active");
        s.field("value", &self.value);
        if let Some(slot) = self.slot {
            s.field("index", &slot.index);
        }
        s.finish()
    }
}

impl fmt::Display for Active<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl Default for Active<'_> {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl PartialEq for Active<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Active<'_> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

// ========================================
// Arithmetic
// ========================================

impl<'t> Add for Active<'t> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.binary(rhs, self.value + rhs.value, 1.0, 1.0)
    }
}

impl<'t> Sub for Active<'t> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.binary(rhs, self.value - rhs.value, 1.0, -1.0)
    }
}

impl<'t> Mul for Active<'t> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.binary(rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl<'t> Div for Active<'t> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = 1.0 / rhs.value;
        let value = self.value * inv;
        self.binary(rhs, value, inv, -value * inv)
    }
}

impl<'t> Rem for Active<'t> {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self {
        let value = self.value % rhs.value;
        self.binary(rhs, value, 1.0, -(self.value / rhs.value).trunc())
    }
}

impl<'t> Neg for Active<'t> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.unary(-self.value, -1.0)
    }
}

// ========================================
// num-traits plumbing
// ========================================

impl Zero for Active<'_> {
    #[inline]
    fn zero() -> Self {
        Self::constant(0.0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl One for Active<'_> {
    #[inline]
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Num for Active<'_> {
    type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;

    fn from_str_radix(s: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        <f64 as Num>::from_str_radix(s, radix).map(Self::constant)
    }
}

impl ToPrimitive for Active<'_> {
    #[inline]
    fn to_i64(&self) -> Option<i64> {
        self.value.to_i64()
    }

    #[inline]
    fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    #[inline]
    fn to_f64(&self) -> Option<f64> {
        Some(self.value)
    }
}

impl NumCast for Active<'_> {
    #[inline]
    fn from<N: ToPrimitive>(n: N) -> Option<Self> {
        n.to_f64().map(Self::constant)
    }
}

// ========================================
// Float
// ========================================

/// Forwards a function with no useful derivative; the result is passive.
macro_rules! passive_fn {
    ($($name:ident),* $(,)?) => {
        $(
            #[inline]
            fn $name(self) -> Self {
                Self::constant(self.value.$name())
            }
        )*
    };
}

/// Forwards a predicate on the primal value.
macro_rules! value_predicate {
    ($($name:ident),* $(,)?) => {
        $(
            #[inline]
            fn $name(self) -> bool {
                self.value.$name()
            }
        )*
    };
}

impl<'t> Float for Active<'t> {
    #[inline]
    fn nan() -> Self {
        Self::constant(f64::NAN)
    }

    #[inline]
    fn infinity() -> Self {
        Self::constant(f64::INFINITY)
    }

    #[inline]
    fn neg_infinity() -> Self {
        Self::constant(f64::NEG_INFINITY)
    }

    #[inline]
    fn neg_zero() -> Self {
        Self::constant(-0.0)
    }

    #[inline]
    fn min_value() -> Self {
        Self::constant(f64::MIN)
    }

    #[inline]
    fn min_positive_value() -> Self {
        Self::constant(f64::MIN_POSITIVE)
    }

    #[inline]
    fn max_value() -> Self {
        Self::constant(f64::MAX)
    }

    #[inline]
    fn epsilon() -> Self {
        Self::constant(f64::EPSILON)
    }

    value_predicate!(
        is_nan,
        is_infinite,
        is_finite,
        is_normal,
        is_sign_positive,
        is_sign_negative,
    );

    #[inline]
    fn classify(self) -> FpCategory {
        self.value.classify()
    }

    passive_fn!(floor, ceil, round, trunc, signum);

    #[inline]
    fn fract(self) -> Self {
        self.unary(self.value.fract(), 1.0)
    }

    #[inline]
    fn abs(self) -> Self {
        let d = if self.value > 0.0 {
            1.0
        } else if self.value < 0.0 {
            -1.0
        } else {
            0.0
        };
        self.unary(self.value.abs(), d)
    }

    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }

    #[inline]
    fn recip(self) -> Self {
        let r = self.value.recip();
        self.unary(r, -r * r)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        let d = if n == 0 {
            0.0
        } else {
            <f64 as From<i32>>::from(n) * self.value.powi(n - 1)
        };
        self.unary(self.value.powi(n), d)
    }

    fn powf(self, n: Self) -> Self {
        let value = self.value.powf(n.value);
        let dbase = if n.value == 0.0 {
            0.0
        } else {
            n.value * self.value.powf(n.value - 1.0)
        };
        let dexp = if self.value > 0.0 {
            value * self.value.ln()
        } else {
            0.0
        };
        self.binary(n, value, dbase, dexp)
    }

    #[inline]
    fn sqrt(self) -> Self {
        let v = self.value.sqrt();
        self.unary(v, 0.5 / v)
    }

    #[inline]
    fn exp(self) -> Self {
        let v = self.value.exp();
        self.unary(v, v)
    }

    #[inline]
    fn exp2(self) -> Self {
        let v = self.value.exp2();
        self.unary(v, v * std::f64::consts::LN_2)
    }

    #[inline]
    fn ln(self) -> Self {
        self.unary(self.value.ln(), 1.0 / self.value)
    }

    fn log(self, base: Self) -> Self {
        let ln_x = self.value.ln();
        let ln_b = base.value.ln();
        self.binary(
            base,
            ln_x / ln_b,
            1.0 / (self.value * ln_b),
            -ln_x / (base.value * ln_b * ln_b),
        )
    }

    #[inline]
    fn log2(self) -> Self {
        self.unary(
            self.value.log2(),
            1.0 / (self.value * std::f64::consts::LN_2),
        )
    }

    #[inline]
    fn log10(self) -> Self {
        self.unary(
            self.value.log10(),
            1.0 / (self.value * std::f64::consts::LN_10),
        )
    }

    #[inline]
    fn to_degrees(self) -> Self {
        self.unary(self.value.to_degrees(), 180.0 / std::f64::consts::PI)
    }

    #[inline]
    fn to_radians(self) -> Self {
        self.unary(self.value.to_radians(), std::f64::consts::PI / 180.0)
    }

    /// Returns whichever operand is larger; the derivative follows it.
    #[inline]
    fn max(self, other: Self) -> Self {
        if other.value.is_nan() || self.value >= other.value {
            self
        } else {
            other
        }
    }

    /// Returns whichever operand is smaller; the derivative follows it.
    #[inline]
    fn min(self, other: Self) -> Self {
        if other.value.is_nan() || self.value <= other.value {
            self
        } else {
            other
        }
    }

    #[inline]
    fn abs_sub(self, other: Self) -> Self {
        if self.value > other.value {
            self - other
        } else {
            Self::constant(0.0)
        }
    }

    #[inline]
    fn cbrt(self) -> Self {
        let v = self.value.cbrt();
        self.unary(v, 1.0 / (3.0 * v * v))
    }

    fn hypot(self, other: Self) -> Self {
        let h = self.value.hypot(other.value);
        if h == 0.0 {
            return self.binary(other, h, 0.0, 0.0);
        }
        self.binary(other, h, self.value / h, other.value / h)
    }

    #[inline]
    fn sin(self) -> Self {
        self.unary(self.value.sin(), self.value.cos())
    }

    #[inline]
    fn cos(self) -> Self {
        self.unary(self.value.cos(), -self.value.sin())
    }

    #[inline]
    fn tan(self) -> Self {
        let t = self.value.tan();
        self.unary(t, 1.0 + t * t)
    }

    #[inline]
    fn asin(self) -> Self {
        self.unary(
            self.value.asin(),
            1.0 / (1.0 - self.value * self.value).sqrt(),
        )
    }

    #[inline]
    fn acos(self) -> Self {
        self.unary(
            self.value.acos(),
            -1.0 / (1.0 - self.value * self.value).sqrt(),
        )
    }

    #[inline]
    fn atan(self) -> Self {
        self.unary(self.value.atan(), 1.0 / (1.0 + self.value * self.value))
    }

    /// Four-quadrant arctangent of `self / other`.
    fn atan2(self, other: Self) -> Self {
        let r2 = self.value * self.value + other.value * other.value;
        let (dy, dx) = if r2 == 0.0 {
            (0.0, 0.0)
        } else {
            (other.value / r2, -self.value / r2)
        };
        self.binary(other, self.value.atan2(other.value), dy, dx)
    }

    #[inline]
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    #[inline]
    fn exp_m1(self) -> Self {
        self.unary(self.value.exp_m1(), self.value.exp())
    }

    #[inline]
    fn ln_1p(self) -> Self {
        self.unary(self.value.ln_1p(), 1.0 / (1.0 + self.value))
    }

    #[inline]
    fn sinh(self) -> Self {
        self.unary(self.value.sinh(), self.value.cosh())
    }

    #[inline]
    fn cosh(self) -> Self {
        self.unary(self.value.cosh(), self.value.sinh())
    }

    #[inline]
    fn tanh(self) -> Self {
        let t = self.value.tanh();
        self.unary(t, 1.0 - t * t)
    }

    #[inline]
    fn asinh(self) -> Self {
        self.unary(
            self.value.asinh(),
            1.0 / (self.value * self.value + 1.0).sqrt(),
        )
    }

    #[inline]
    fn acosh(self) -> Self {
        self.unary(
            self.value.acosh(),
            1.0 / (self.value * self.value - 1.0).sqrt(),
        )
    }

    #[inline]
    fn atanh(self) -> Self {
        self.unary(self.value.atanh(), 1.0 / (1.0 - self.value * self.value))
    }

    #[inline]
    fn integer_decode(self) -> (u64, i16, i8) {
        Float::integer_decode(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Derivative of `f` at `x` read back from a fresh recording.
    fn derivative(x: f64, f: impl for<'a> Fn(Active<'a>) -> Active<'a>) -> (f64, f64) {
        let tape = Tape::new();
        let rec = tape.begin_recording().unwrap();
        let a = rec.wrap(x);
        let y = f(a);
        rec.seed_gradient(y, 1.0);
        rec.propagate_adjoints();
        (y.value(), rec.read_gradient(a))
    }

    #[test]
    fn test_arithmetic_gradients() {
        let tape = Tape::new();
        let rec = tape.begin_recording().unwrap();
        let x = rec.wrap(3.0);
        let y = rec.wrap(4.0);

        let f = (x + y) * (x - y) / y;
        rec.seed_gradient(f, 1.0);
        rec.propagate_adjoints();

        // f = (x^2 - y^2) / y
        assert_relative_eq!(f.value(), -7.0 / 4.0, epsilon = 1e-14);
        assert_relative_eq!(rec.read_gradient(x), 2.0 * 3.0 / 4.0, epsilon = 1e-14);
        assert_relative_eq!(
            rec.read_gradient(y),
            -2.0 - (9.0 - 16.0) / 16.0,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_reused_variable_accumulates() {
        let (v, d) = derivative(1.5, |x| x * x * x);
        assert_relative_eq!(v, 3.375);
        assert_relative_eq!(d, 3.0 * 1.5 * 1.5);
    }

    #[test]
    fn test_neg_and_rem() {
        let (_, d) = derivative(2.0, |x| -x);
        assert_eq!(d, -1.0);

        let (v, d) = derivative(7.5, |x| x % Active::constant(2.0));
        assert_eq!(v, 1.5);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_elementary_functions() {
        let x = 0.7;
        let cases: Vec<(&str, f64, f64)> = vec![
            ("exp", derivative(x, |a| a.exp()).1, x.exp()),
            ("ln", derivative(x, |a| a.ln()).1, 1.0 / x),
            ("sqrt", derivative(x, |a| a.sqrt()).1, 0.5 / x.sqrt()),
            ("powi", derivative(x, |a| a.powi(3)).1, 3.0 * x * x),
            ("recip", derivative(x, |a| a.recip()).1, -1.0 / (x * x)),
            ("sin", derivative(x, |a| a.sin()).1, x.cos()),
            ("cos", derivative(x, |a| a.cos()).1, -x.sin()),
            ("tan", derivative(x, |a| a.tan()).1, 1.0 / (x.cos() * x.cos())),
            ("atan", derivative(x, |a| a.atan()).1, 1.0 / (1.0 + x * x)),
            ("tanh", derivative(x, |a| a.tanh()).1, 1.0 - x.tanh().powi(2)),
            ("cbrt", derivative(x, |a| a.cbrt()).1, x.powf(-2.0 / 3.0) / 3.0),
            ("log10", derivative(x, |a| a.log10()).1, 1.0 / (x * 10f64.ln())),
        ];

        for (name, got, expected) in cases {
            assert_relative_eq!(got, expected, epsilon = 1e-12, max_relative = 1e-12);
            assert!(got.is_finite(), "{} gradient should be finite", name);
        }
    }

    #[test]
    fn test_powi_integer_exponents() {
        for (n, expected) in [(3, 3.0 * 0.25), (-2, -2.0 / 0.125), (1, 1.0), (0, 0.0)] {
            let (v, d) = derivative(0.5, |a| a.powi(n));
            assert_eq!(v, 0.5f64.powi(n));
            assert_relative_eq!(d, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_powf_both_arguments() {
        let tape = Tape::new();
        let rec = tape.begin_recording().unwrap();
        let x = rec.wrap(2.0);
        let n = rec.wrap(3.0);
        let f = x.powf(n);
        rec.seed_gradient(f, 1.0);
        rec.propagate_adjoints();

        assert_relative_eq!(f.value(), 8.0);
        assert_relative_eq!(rec.read_gradient(x), 12.0, epsilon = 1e-12);
        assert_relative_eq!(rec.read_gradient(n), 8.0 * 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_max_routes_derivative() {
        // In the money: derivative flows through the left operand
        let (v, d) = derivative(110.0, |s| (s - Active::constant(100.0)).max(Active::zero()));
        assert_eq!(v, 10.0);
        assert_eq!(d, 1.0);

        // Out of the money: the passive zero is selected
        let (v, d) = derivative(90.0, |s| (s - Active::constant(100.0)).max(Active::zero()));
        assert_eq!(v, 0.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_min_routes_derivative() {
        let (v, d) = derivative(3.0, |x| x.min(Active::constant(5.0)) * Active::constant(2.0));
        assert_eq!(v, 6.0);
        assert_eq!(d, 2.0);
    }

    #[test]
    fn test_rounding_functions_are_passive() {
        let (v, d) = derivative(2.6, |x| x.floor() + x.round());
        assert_eq!(v, 5.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_num_cast_is_passive() {
        let c: Active<'_> = NumCast::from(0.5_f64).unwrap();
        assert!(!c.is_active());
        assert_eq!(c.value(), 0.5);

        let i: Active<'_> = NumCast::from(252_i32).unwrap();
        assert_eq!(i.value(), 252.0);
    }

    #[test]
    fn test_comparisons_use_values() {
        let tape = Tape::new();
        let rec = tape.begin_recording().unwrap();
        let x = rec.wrap(1.0);
        let c = Active::constant(1.0);
        assert_eq!(x, c);
        assert!(x <= c && x >= c);
        assert!(Active::constant(0.5) < x);
    }

    #[test]
    fn test_from_str_radix() {
        let v = <Active<'_> as Num>::from_str_radix("2.5", 10).unwrap();
        assert_eq!(v.value(), 2.5);
        assert!(!v.is_active());
    }

    #[test]
    fn test_display_and_debug() {
        let c = Active::constant(1.25);
        assert_eq!(format!("{}", c), "1.25");
        assert_eq!(format!("{:?}", c), "Active { value: 1.25 }");
    }
}

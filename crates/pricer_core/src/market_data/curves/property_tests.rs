//! Property-based tests for term-structure curves.

use super::{Curve1D, LinearInterpolation};
use crate::types::InterpolationError;
use proptest::prelude::*;

/// Strictly increasing knots starting at zero, with arbitrary ordinates.
fn curve_table() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.01f64..1.0, -1.0f64..1.0), 1..20).prop_map(|points| {
        let mut t = 0.0;
        let mut xs = Vec::with_capacity(points.len());
        let mut ys = Vec::with_capacity(points.len());
        for (i, (step, y)) in points.into_iter().enumerate() {
            if i > 0 {
                t += step;
            }
            xs.push(t);
            ys.push(y);
        }
        (xs, ys)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_boundaries_reproduce_ordinates((xs, ys) in curve_table()) {
        let curve = LinearInterpolation::new(&xs, &ys).unwrap();
        let last = xs.len() - 1;

        prop_assert_eq!(curve.evaluate(xs[0]).unwrap(), ys[0]);
        prop_assert_eq!(curve.evaluate(xs[last]).unwrap(), ys[last]);
    }

    #[test]
    fn test_interior_knots_follow_segment_formula((xs, ys) in curve_table()) {
        prop_assume!(xs.len() >= 3);
        let curve = LinearInterpolation::new(&xs, &ys).unwrap();

        for i in 1..xs.len() - 1 {
            let y = curve.evaluate(xs[i]).unwrap();
            prop_assert_eq!(y, ys[i - 1] + 1.0 * (ys[i] - ys[i - 1]));
            prop_assert!((y - ys[i]).abs() < 1e-12, "knot {}: {} vs {}", i, y, ys[i]);
        }
    }

    #[test]
    fn test_segments_are_affine(
        (xs, ys) in curve_table(),
        fraction in 0.0f64..1.0,
    ) {
        prop_assume!(xs.len() >= 2);
        let curve = LinearInterpolation::new(&xs, &ys).unwrap();

        for i in 1..xs.len() {
            let x = (xs[i - 1] + fraction * (xs[i] - xs[i - 1])).min(xs[i]);
            let expected = ys[i - 1] + (x - xs[i - 1]) / (xs[i] - xs[i - 1]) * (ys[i] - ys[i - 1]);
            let y = curve.evaluate(x).unwrap();

            prop_assert!((y - expected).abs() < 1e-10, "x = {}, y = {}, expected = {}", x, y, expected);
            prop_assert!(y >= ys[i - 1].min(ys[i]) - 1e-12);
            prop_assert!(y <= ys[i - 1].max(ys[i]) + 1e-12);
        }
    }

    #[test]
    fn test_continuous_across_knots((xs, ys) in curve_table()) {
        prop_assume!(xs.len() >= 3);
        let curve = LinearInterpolation::new(&xs, &ys).unwrap();
        let h = 1e-9;

        for i in 1..xs.len() - 1 {
            let left = curve.evaluate(xs[i] - h).unwrap();
            let right = curve.evaluate(xs[i] + h).unwrap();
            prop_assert!((left - right).abs() < 1e-6);
        }
    }

    #[test]
    fn test_outside_domain_always_fails(
        (xs, ys) in curve_table(),
        offset in 1e-9f64..10.0,
    ) {
        let curve = LinearInterpolation::new(&xs, &ys).unwrap();
        let last = xs[xs.len() - 1];

        let below = curve.evaluate(xs[0] - offset);
        let above = curve.evaluate(last + offset);

        prop_assert!(matches!(below, Err(InterpolationError::OutOfBounds { .. })), "below domain");
        prop_assert!(matches!(above, Err(InterpolationError::OutOfBounds { .. })), "above domain");
    }
}

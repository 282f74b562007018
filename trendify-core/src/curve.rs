//! Synthetic trend curve.
//!
//! `-sin(x) + 1` sampled over `[0, length)`, so values stay in `[0, 2]`. The
//! number of cycles grows with `log10(length)` (at least one), keeping short
//! curves readable and long curves from turning into noise.

use std::f64::consts::PI;

/// Generate a trend curve of `length` samples. Deterministic.
pub fn generate_trend_curve(length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }

    let n = length as f64;
    let scale = n.log10().max(1.0);
    (0..length)
        .map(|i| {
            let x = i as f64 / n * scale * 2.0 * PI;
            -x.sin() + 1.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_is_empty() {
        assert!(generate_trend_curve(0).is_empty());
    }

    #[test]
    fn ten_samples_start_at_one() {
        let curve = generate_trend_curve(10);
        assert_eq!(curve.len(), 10);
        assert!((curve[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_curve_covers_one_cycle() {
        // scale is clamped to 1.0 below length 10.
        let curve = generate_trend_curve(4);
        let expected = [1.0, 0.0, 1.0, 2.0];
        for (got, want) in curve.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
    }

    #[test]
    fn values_stay_in_range() {
        for length in [1, 2, 7, 10, 99, 1000, 12_345] {
            for v in generate_trend_curve(length) {
                assert!((0.0..=2.0).contains(&v), "{v} out of range at length {length}");
            }
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(generate_trend_curve(250), generate_trend_curve(250));
    }

    #[test]
    fn longer_curves_oscillate_more() {
        // length 1000 → scale 3 → three full cycles → three local minima.
        let curve = generate_trend_curve(1000);
        let minima = (1..curve.len() - 1)
            .filter(|&i| curve[i - 1] > curve[i] && curve[i] < curve[i + 1])
            .count();
        assert_eq!(minima, 3);
    }
}

//! Random sampling primitives and small numeric reducers.
//!
//! All draws go through the caller-supplied [`Rng`], never an ambient
//! generator, so any sequence of samples is reproducible from a seed.

use rand::Rng;

use crate::error::SimulationError;

/// One draw from the standard normal distribution via the Box-Muller
/// transform. Uses `1 - uniform[0,1)` for the radial draw so the logarithm
/// stays finite.
pub fn standard_normal(rng: &mut (impl Rng + ?Sized)) -> f64 {
    let u: f64 = 1.0 - rng.gen::<f64>();
    let v: f64 = rng.gen::<f64>();
    (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
}

/// `n` independent draws from a normal distribution with the given mean and
/// standard deviation. No clamping; `n = 0` yields an empty vector.
pub fn rnorm(rng: &mut (impl Rng + ?Sized), n: usize, mean: f64, stdev: f64) -> Vec<f64> {
    (0..n)
        .map(|_| standard_normal(rng) * stdev + mean)
        .collect()
}

/// `n` draws from a normal distribution with the given mean and variance,
/// each clamped to `[min, max]`.
///
/// Preconditions are checked before any value is drawn: the mean must lie
/// strictly between `min` and `max`, and the variance must stay below
/// `(mean - min) * (max - mean)`. Outside those bounds the clamping would
/// distort the distribution beyond its intended shape, so the call fails
/// with [`SimulationError::InvalidParameters`] instead.
pub fn rgnormal(
    rng: &mut (impl Rng + ?Sized),
    n: usize,
    mean: f64,
    variance: f64,
    min: f64,
    max: f64,
) -> Result<Vec<f64>, SimulationError> {
    let dmin = mean - min;
    let dmax = max - mean;

    if dmin <= 0.0 || dmax <= 0.0 {
        return Err(SimulationError::InvalidParameters {
            reason: format!("mean must be between min = {} and max = {}", min, max),
        });
    }
    if variance >= dmin * dmax {
        return Err(SimulationError::InvalidParameters {
            reason: format!(
                "variance must be less than (mean - min) * (max - mean) = {}",
                dmin * dmax
            ),
        });
    }

    let stdev = variance.sqrt();
    Ok((0..n)
        .map(|_| (standard_normal(rng) * stdev + mean).clamp(min, max))
        .collect())
}

/// Rescale a sequence to [0,1] using its own min and max.
///
/// A zero-range sequence (all values equal, or fewer than two values) has no
/// normalization and fails with [`SimulationError::DegenerateRange`].
pub fn min_max_norm(values: &[f64]) -> Result<Vec<f64>, SimulationError> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.len() < 2 || max <= min {
        return Err(SimulationError::DegenerateRange { len: values.len() });
    }
    Ok(values.iter().map(|x| (x - min) / (max - min)).collect())
}

/// Left-fold running sum clamped to `cap` at every step where it would
/// exceed it. For the non-negative inputs used here this returns
/// `min(sum, cap)`.
pub fn sum_capped(values: &[f64], cap: f64) -> f64 {
    values.iter().fold(0.0, |acc, &v| {
        let sum = acc + v;
        if sum > cap {
            cap
        } else {
            sum
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rnorm_returns_exactly_n_values() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in [0usize, 1, 3, 100] {
            assert_eq!(rnorm(&mut rng, n, 0.0, 1.0).len(), n);
        }
    }

    #[test]
    fn rnorm_centered_on_mean() {
        let mut rng = StdRng::seed_from_u64(2);
        let samples = rnorm(&mut rng, 20_000, 5.0, 1.0);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 5.0).abs() < 0.05, "sample mean {}", mean);
    }

    #[test]
    fn rgnormal_values_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let samples = rgnormal(&mut rng, 5_000, 0.1, 0.002, 0.0, 0.2).unwrap();
        assert_eq!(samples.len(), 5_000);
        assert!(samples.iter().all(|&v| (0.0..=0.2).contains(&v)));
    }

    #[test]
    fn rgnormal_rejects_mean_outside_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = rgnormal(&mut rng, 3, 0.5, 0.01, 0.6, 1.0).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameters { .. }));
    }

    #[test]
    fn rgnormal_rejects_excessive_variance() {
        let mut rng = StdRng::seed_from_u64(5);
        // (0.1 - 0.0) * (0.2 - 0.1) = 0.01
        let err = rgnormal(&mut rng, 3, 0.1, 0.01, 0.0, 0.2).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameters { .. }));
    }

    #[test]
    fn min_max_norm_spans_unit_interval() {
        let normed = min_max_norm(&[3.0, -1.0, 7.0, 5.0]).unwrap();
        let min = normed.iter().copied().fold(f64::INFINITY, f64::min);
        let max = normed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min.abs() < 1e-12);
        assert!((max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn min_max_norm_rejects_constant_sequence() {
        assert!(matches!(
            min_max_norm(&[2.0, 2.0, 2.0]),
            Err(SimulationError::DegenerateRange { len: 3 })
        ));
    }

    #[test]
    fn min_max_norm_rejects_empty_and_single() {
        assert!(min_max_norm(&[]).is_err());
        assert!(min_max_norm(&[1.0]).is_err());
    }

    #[test]
    fn sum_capped_below_cap_is_plain_sum() {
        assert!((sum_capped(&[0.3, 0.4], 1.0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn sum_capped_pins_at_cap() {
        assert!((sum_capped(&[0.8, 0.5], 1.0) - 1.0).abs() < 1e-12);
        assert!((sum_capped(&[2.0, 3.0, 4.0], 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sum_capped_empty_is_zero() {
        assert_eq!(sum_capped(&[], 1.0), 0.0);
    }

    #[test]
    fn deterministic_with_same_seed() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(rnorm(&mut a, 16, 0.0, 1.0), rnorm(&mut b, 16, 0.0, 1.0));
    }
}

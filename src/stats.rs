/// Arithmetic mean of `samples`, or 0.0 for an empty slice.
///
/// The collector never produces an empty sequence (the plan requires at
/// least one timed run); the empty guard exists so callers never see NaN.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (Bessel-corrected, divisor n−1).
///
/// Defined as exactly 0.0 for sequences with fewer than two samples — a
/// single measurement has no spread, and must not surface as NaN.
pub fn std_dev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let variance =
        samples.iter().map(|s| (s - m).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    variance.sqrt()
}

/// Speedup of the candidate relative to the reference: `reference_mean /
/// candidate_mean` when the candidate mean is positive, exactly 0.0 when it
/// is zero. The zero fallback is a reporting policy, not a rate — callers
/// must never see infinity or a division panic.
pub fn speedup(reference_mean: f64, candidate_mean: f64) -> f64 {
    if candidate_mean > 0.0 {
        reference_mean / candidate_mean
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_known_values() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(mean(&[1.5]), 1.5);
    }

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn std_dev_of_single_sample_is_exactly_zero() {
        assert_eq!(std_dev(&[3.14]), 0.0);
    }

    #[test]
    fn std_dev_of_empty_slice_is_exactly_zero() {
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn std_dev_of_identical_values_is_exactly_zero() {
        assert_eq!(std_dev(&[2.5, 2.5, 2.5, 2.5]), 0.0);
    }

    #[test]
    fn std_dev_uses_bessel_correction() {
        // Sample stdev of [2, 4, 4, 4, 5, 5, 7, 9] with n−1 divisor.
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((std_dev(&samples) - expected).abs() < 1e-12);
    }

    #[test]
    fn std_dev_of_two_samples() {
        // Variance of [1, 3] is ((1-2)² + (3-2)²) / 1 = 2.
        assert!((std_dev(&[1.0, 3.0]) - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn speedup_is_ratio_of_means() {
        assert_eq!(speedup(10.0, 2.0), 5.0);
        assert_eq!(speedup(1.0, 4.0), 0.25);
    }

    #[test]
    fn speedup_with_zero_candidate_mean_is_zero() {
        let s = speedup(10.0, 0.0);
        assert_eq!(s, 0.0);
        assert!(s.is_finite());
    }

    #[test]
    fn zero_fallback_is_finite_never_nan() {
        for (a, b) in [(0.0, 0.0), (5.0, 0.0), (0.0, 5.0)] {
            let s = speedup(a, b);
            assert!(s.is_finite(), "speedup({a}, {b}) = {s}");
        }
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let samples = [2.103, 2.057, 2.151, 2.099, 2.120];
        assert_eq!(mean(&samples).to_bits(), mean(&samples).to_bits());
        assert_eq!(std_dev(&samples).to_bits(), std_dev(&samples).to_bits());
    }
}

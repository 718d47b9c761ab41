//! Reference horizon construction

use nalgebra::DVector;

/// Build the `n` step reference horizon from the future plan's lateral
/// accelerations.
///
/// - A plan at least `n` long is truncated to its first `n` values.
/// - A shorter, non-empty plan is padded by repeating its last value.
/// - An empty plan gives a horizon filled with `target_lataccel`.
pub fn reference_horizon(plan_lataccel: &[f64], target_lataccel: f64, n: usize) -> DVector<f64> {
    match plan_lataccel.last() {
        Some(&last) => DVector::from_fn(n, |k, _| {
            plan_lataccel.get(k).copied().unwrap_or(last)
        }),
        None => DVector::from_element(n, target_lataccel)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_edge_padding() {
        let refs = reference_horizon(&[1.0, 2.0, 3.0], 0.0, 10);

        assert_eq!(
            refs.as_slice(),
            &[1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0]
        );
    }

    #[test]
    fn test_truncation() {
        let plan: Vec<f64> = (0..15).map(|i| i as f64 * 0.1).collect();
        let refs = reference_horizon(&plan, 0.0, 10);

        assert_eq!(refs.as_slice(), &plan[..10]);
    }

    #[test]
    fn test_empty_plan_fills_with_target() {
        let refs = reference_horizon(&[], 1.5, 10);

        assert_eq!(refs.len(), 10);
        assert!(refs.iter().all(|&r| r == 1.5));
    }
}

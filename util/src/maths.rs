//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Number of elements below which `pairwise_sum` adds left to right.
const PAIRWISE_UNROLL: usize = 8;

/// Number of elements above which `pairwise_sum` splits the slice in two.
const PAIRWISE_BLOCK: usize = 128;

/// Sum a slice using blocked pairwise summation.
///
/// Slices shorter than 8 are summed left to right. Up to 128 elements are
/// accumulated in 8 interleaved partial sums which are then combined as a
/// balanced tree, with any remainder added on the end. Longer slices are
/// split at a multiple of 8 near the middle and each half summed
/// recursively. This is the same ordering numpy uses for float reductions,
/// so means agree with it bit for bit.
pub fn pairwise_sum<T>(values: &[T]) -> T
where
    T: Float
{
    let n = values.len();

    if n < PAIRWISE_UNROLL {
        let mut sum = T::zero();
        for v in values {
            sum = sum + *v;
        }
        sum
    }
    else if n <= PAIRWISE_BLOCK {
        let mut r = [T::zero(); PAIRWISE_UNROLL];
        r.copy_from_slice(&values[..PAIRWISE_UNROLL]);

        let blocked = n - n % PAIRWISE_UNROLL;
        let mut i = PAIRWISE_UNROLL;
        while i < blocked {
            for j in 0..PAIRWISE_UNROLL {
                r[j] = r[j] + values[i + j];
            }
            i += PAIRWISE_UNROLL;
        }

        let mut sum = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for v in &values[blocked..] {
            sum = sum + *v;
        }
        sum
    }
    else {
        let mut split = n / 2;
        split -= split % PAIRWISE_UNROLL;
        pairwise_sum(&values[..split]) + pairwise_sum(&values[split..])
    }
}

/// Arithmetic mean of a slice, or `None` if the slice is empty.
///
/// The elements are combined with `pairwise_sum`.
pub fn mean<T>(values: &[T]) -> Option<T>
where
    T: Float
{
    if values.is_empty() {
        return None;
    }

    Some(pairwise_sum(values) / T::from(values.len())?)
}

/// Root mean square of a slice, or `None` if the slice is empty.
pub fn rms<T>(values: &[T]) -> Option<T>
where
    T: Float
{
    if values.is_empty() {
        return None;
    }

    let mut sum = T::zero();
    for v in values {
        sum = sum + v.powi(2);
    }

    Some((sum / T::from(values.len())?).sqrt())
}

/// Largest absolute first difference of a sequence, or zero if the sequence
/// has fewer than two elements.
pub fn max_abs_diff<T>(values: &[T]) -> T
where
    T: Float
{
    values
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(T::zero(), |acc, d| if d > acc { d } else { acc })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5.0, &-2.0, &2.0), 2.0);
        assert_eq!(clamp(&-5.0, &-2.0, &2.0), -2.0);
        assert_eq!(clamp(&0.5, &-2.0, &2.0), 0.5);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean::<f64>(&[]), None);
        assert!((mean(&[0.2f64; 5]).unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(mean(&[1.0f64, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_pairwise_sum_ordering() {
        // 2^53 + 1 rounds back to 2^53, so the order of additions shows up in
        // the result
        const BIG: f64 = 9007199254740992.0;

        // Short slices add left to right
        assert_eq!(pairwise_sum(&[BIG, 1.0, 1.0, -BIG]), 0.0);

        // Eight or more are combined as (a0 + a1) + (a2 + a3) + ...
        let values = [BIG, 1.0, 1.0, -BIG, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(pairwise_sum(&values), 1.0);
        assert_eq!(mean(&values), Some(0.125));

        // Remainder past the last block of 8 is added on the end
        let mut values = values.to_vec();
        values.extend_from_slice(&[0.5, 0.25]);
        assert_eq!(pairwise_sum(&values), 1.75);
    }

    #[test]
    fn test_pairwise_sum_long() {
        assert_eq!(pairwise_sum(&[0.0f64; 0]), 0.0);
        assert_eq!(pairwise_sum(&vec![0.5f64; 1000]), 500.0);

        let values: Vec<f64> = (0..300).map(|i| i as f64).collect();
        assert_eq!(pairwise_sum(&values), 44850.0);
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms::<f64>(&[]), None);
        assert_eq!(rms(&[3.0f64, -3.0]), Some(3.0));
    }

    #[test]
    fn test_max_abs_diff() {
        assert_eq!(max_abs_diff::<f64>(&[1.0]), 0.0);
        assert_eq!(max_abs_diff(&[0.0f64, 1.0, -1.5, -1.0]), 2.5);
    }
}

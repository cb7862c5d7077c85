//! Fuzzy comparison of fractional keyspace shares
//!
//! Exact equality of keyspace percentages is meaningless: a stream of 3
//! partitions divides 100% into shares that cannot all be identical, and
//! floating error must not turn "equal thirds" into an inequality. Both
//! operands are rounded to a fixed decimal scale and treated as equal when
//! they differ by less than one order of magnitude above that scale.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Default fractional-digit scale for share comparisons.
pub const DEFAULT_COMPARISON_SCALE: u32 = 10;

/// Compare two keyspace shares at the default scale.
pub fn keyspace_compare(a: f64, b: f64) -> Ordering {
    keyspace_compare_at_scale(a, b, DEFAULT_COMPARISON_SCALE)
}

/// Compare two keyspace shares, rounded half-down to `scale` fractional
/// digits. Differences under `10^-(scale-1)`, one order of magnitude looser
/// than the rounding itself, compare equal, absorbing the rounding noise of
/// dividing keyspace width by partition count while still detecting genuinely
/// unequal allocations.
///
/// Pure and deterministic; symmetric (`compare(a, b) == compare(b, a).reverse()`).
pub fn keyspace_compare_at_scale(a: f64, b: f64, scale: u32) -> Ordering {
    let (first, second) = match (Decimal::from_f64(a), Decimal::from_f64(b)) {
        (Some(first), Some(second)) => (first, second),
        // non-finite inputs fall back to the raw float ordering
        _ => return a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    };

    let scale = scale.max(1);
    let accepted_variation = Decimal::new(1, scale - 1);

    let first = first.round_dp_with_strategy(scale, RoundingStrategy::MidpointTowardZero);
    let second = second.round_dp_with_strategy(scale, RoundingStrategy::MidpointTowardZero);

    let variation = (first - second).abs();
    if variation < accepted_variation {
        Ordering::Equal
    } else {
        first.cmp(&second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflexive() {
        for value in [0.0, 33.333333333333336, 50.0, 99.9999999999] {
            assert_eq!(keyspace_compare(value, value), Ordering::Equal);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [(33.3, 33.4), (50.0, 25.0), (1.0 / 3.0, 2.0 / 3.0)];
        for (a, b) in pairs {
            assert_eq!(keyspace_compare(a, b), keyspace_compare(b, a).reverse());
        }
    }

    #[test]
    fn test_equal_thirds() {
        // three partitions, each exactly one third of the keyspace
        let shares = [100.0 / 3.0, 100.0 * (1.0 / 3.0), 33.333333333333336];
        for a in shares {
            for b in shares {
                assert_eq!(keyspace_compare(a, b), Ordering::Equal);
            }
        }
    }

    #[test]
    fn test_rounding_noise_is_absorbed() {
        let a = 33.3333333333;
        let b = a + 1e-11;
        assert_eq!(keyspace_compare(a, b), Ordering::Equal);
    }

    #[test]
    fn test_sensitivity_with_sign() {
        assert_eq!(keyspace_compare(33.0, 33.4), Ordering::Less);
        assert_eq!(keyspace_compare(33.4, 33.0), Ordering::Greater);
        // just above the accepted variation at the default scale
        assert_eq!(keyspace_compare(0.0, 1e-8), Ordering::Less);
    }

    #[test]
    fn test_coarser_scale_widens_tolerance() {
        // at scale 3 the tolerance is 0.01, so a 0.005 difference is equal
        assert_eq!(keyspace_compare_at_scale(33.330, 33.335, 3), Ordering::Equal);
        assert_eq!(keyspace_compare(33.330, 33.335), Ordering::Less);
    }

    #[test]
    fn test_non_finite_fallback() {
        assert_eq!(keyspace_compare(f64::NAN, 1.0), Ordering::Equal);
        assert_eq!(keyspace_compare(f64::INFINITY, 1.0), Ordering::Greater);
    }
}

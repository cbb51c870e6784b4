//! Conversions between currency units and the API's micro amounts.

/// One currency unit in micros.
pub const MICRO_FACTOR: i64 = 1_000_000;

/// Smallest accepted bid (0.01 in currency units).
pub const MIN_MICRO_BID: i64 = MICRO_FACTOR / 100;

/// Bids must stay strictly below this (100 in currency units).
pub const MAX_MICRO_BID: i64 = 100 * MICRO_FACTOR;

/// Converts a currency amount into micros, rounding to whole cents first.
///
/// `euro_to_micro(1.1111) == 1_110_000`, `euro_to_micro(0.003) == 0`.
pub fn euro_to_micro(euro: f64) -> i64 {
    let cents = (euro * 100.0).round() as i64;
    cents * (MICRO_FACTOR / 100)
}

/// Converts micros back into a currency amount rounded to two decimals.
pub fn micro_to_euro(micro: i64) -> f64 {
    (micro as f64 / (MICRO_FACTOR / 100) as f64).round() / 100.0
}

/// Whether a micro bid lies in the accepted `[0.01, 100)` range.
pub fn is_good_micro_bid(bid: i64) -> bool {
    (MIN_MICRO_BID..MAX_MICRO_BID).contains(&bid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micro_to_euro() {
        assert_eq!(micro_to_euro(23_000_000), 23.0);
        assert_eq!(micro_to_euro(1_111_111), 1.11);
        assert_eq!(micro_to_euro(100), 0.0);
    }

    #[test]
    fn test_euro_to_micro() {
        assert_eq!(euro_to_micro(1.11), 1_110_000);
        assert_eq!(euro_to_micro(1.1111), 1_110_000);
        assert_eq!(euro_to_micro(0.003), 0);
        assert_eq!(euro_to_micro(200.0), 200 * MICRO_FACTOR);
    }

    #[test]
    fn test_bid_range() {
        assert!(is_good_micro_bid(10_000));
        assert!(is_good_micro_bid(99_990_000));
        assert!(!is_good_micro_bid(9_999));
        assert!(!is_good_micro_bid(100 * MICRO_FACTOR));
        assert!(!is_good_micro_bid(0));
    }
}

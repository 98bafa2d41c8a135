//! Base-k digit expansion of rule numbers.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{AutomatonError, AutomatonResult};

/// Largest radix whose digits fit in a byte.
pub const MAX_RADIX: u32 = 256;

/// Returns the base-`k` digits of `value`, most significant first.
///
/// No zero padding is applied, so `0` yields an empty vector. Use
/// [`pad_left`] to bring the result to a fixed width. `k` must be in
/// `2..=`[`MAX_RADIX`].
pub fn digits_base_k(value: &BigUint, k: u32) -> AutomatonResult<Vec<u8>> {
    if !(2..=MAX_RADIX).contains(&k) {
        return Err(AutomatonError::InvalidRadix { k });
    }
    Ok(radix_digits(value, k))
}

/// [`digits_base_k`] for a radix already known to be in range.
pub(crate) fn radix_digits(value: &BigUint, k: u32) -> Vec<u8> {
    debug_assert!((2..=MAX_RADIX).contains(&k));
    if value.is_zero() {
        return Vec::new();
    }
    value.to_radix_be(k)
}

/// Whether `value` has at most `count` base-`k` digits, i.e. `value < k^count`.
pub(crate) fn fits_in_digits(value: &BigUint, k: u32, count: usize) -> bool {
    // k >= 2, so anything below 2^count fits without expanding
    if value.bits() <= count as u64 {
        return true;
    }
    radix_digits(value, k).len() <= count
}

/// Left-pads `digits` with zeros up to `width`.
///
/// Sequences already at least `width` long are returned unchanged.
pub fn pad_left(digits: Vec<u8>, width: usize) -> Vec<u8> {
    if digits.len() >= width {
        return digits;
    }
    let mut padded = vec![0; width - digits.len()];
    padded.extend(digits);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_has_no_digits() {
        assert!(digits_base_k(&BigUint::zero(), 2).unwrap().is_empty());
        assert!(digits_base_k(&BigUint::zero(), 7).unwrap().is_empty());
    }

    #[test]
    fn test_binary_digits() {
        assert_eq!(digits_base_k(&BigUint::from(30u32), 2).unwrap(), vec![1, 1, 1, 1, 0]);
        assert_eq!(digits_base_k(&BigUint::from(1u32), 2).unwrap(), vec![1]);
    }

    #[test]
    fn test_ternary_digits() {
        // 5 = 1*3 + 2
        assert_eq!(digits_base_k(&BigUint::from(5u32), 3).unwrap(), vec![1, 2]);
        // 26 = 2*9 + 2*3 + 2
        assert_eq!(digits_base_k(&BigUint::from(26u32), 3).unwrap(), vec![2, 2, 2]);
    }

    #[test]
    fn test_large_value() {
        // 2^100 has a single leading one followed by 100 zeros
        let value = BigUint::from(1u32) << 100usize;
        let digits = digits_base_k(&value, 2).unwrap();
        assert_eq!(digits.len(), 101);
        assert_eq!(digits[0], 1);
        assert!(digits[1..].iter().all(|&d| d == 0));
    }

    #[test]
    fn test_pad_left() {
        assert_eq!(pad_left(vec![1, 0], 4), vec![0, 0, 1, 0]);
        assert_eq!(pad_left(vec![], 3), vec![0, 0, 0]);
        assert_eq!(pad_left(vec![1, 2, 3], 2), vec![1, 2, 3]);
    }

    #[test]
    fn test_radix_out_of_range_is_an_error() {
        for k in [0, 1, 257, 1000] {
            assert!(matches!(
                digits_base_k(&BigUint::from(3u32), k),
                Err(AutomatonError::InvalidRadix { k: got }) if got == k
            ));
        }
        assert_eq!(digits_base_k(&BigUint::from(255u32), 256).unwrap(), vec![255]);
    }

    #[test]
    fn test_fits_in_digits() {
        // 26 = 222 in base 3, 27 = 1000
        assert!(fits_in_digits(&BigUint::from(26u32), 3, 3));
        assert!(!fits_in_digits(&BigUint::from(27u32), 3, 3));
        assert!(fits_in_digits(&BigUint::zero(), 3, 0));
        // 255 = 0b11111111 fits eight binary digits, 256 does not
        assert!(fits_in_digits(&BigUint::from(255u32), 2, 8));
        assert!(!fits_in_digits(&BigUint::from(256u32), 2, 8));
    }
}

//! Equal-share allocation
//!
//! Used when participants opt into uniform weights. The split is a pure
//! function of the participant count, so the same ordered list always gets
//! the same shares.

use crate::lifecycle::validation::REQUIRED_SHARE_TOTAL;

/// Split 100 points across `count` participants.
///
/// Every participant gets `100 / count`; the `100 % count` leftover points go
/// one each to the first participants in list order, so shares differ by at
/// most one point.
///
/// This deliberately does not hand the whole remainder to the first
/// participant ("base + remainder"). That reading breaks the max-min <= 1
/// guarantee as soon as the remainder exceeds one: for seven participants it
/// would give `[16, 14, 14, 14, 14, 14, 14]` where this gives
/// `[15, 15, 14, 14, 14, 14, 14]`.
///
/// # Example
///
/// ```
/// use ballot_domain::tally::allocate_equal_shares;
///
/// assert_eq!(allocate_equal_shares(3), vec![34, 33, 33]);
/// assert_eq!(allocate_equal_shares(4), vec![25, 25, 25, 25]);
/// ```
pub fn allocate_equal_shares(count: usize) -> Vec<u8> {
    if count == 0 {
        return Vec::new();
    }

    let total = REQUIRED_SHARE_TOTAL as usize;
    let base = total / count;
    let remainder = total % count;

    (0..count)
        .map(|index| {
            let share = if index < remainder { base + 1 } else { base };
            share as u8
        })
        .collect()
}

//! Uniform in-place shuffle of a sub-range.

use rand::Rng;

use super::ShuffleError;

/// Fisher-Yates shuffle of `items[start..end]`, ignoring weights.
///
/// Elements outside the range are never moved. Fails fast on an empty or
/// out-of-bounds range rather than clamping it.
pub fn shuffle_segment<T, R: Rng>(
    items: &mut [T],
    start: usize,
    end: usize,
    rng: &mut R,
) -> Result<(), ShuffleError> {
    if end > items.len() || start >= end {
        return Err(ShuffleError::InvalidRange {
            start,
            end,
            len: items.len(),
        });
    }

    for i in start..end {
        let j = rng.gen_range(i..end);
        items.swap(i, j);
    }
    Ok(())
}

// Histogram bucketing

use std::cmp::Ordering;

/// Summarize `values` into a histogram with breakpoints `lows`.
///
/// Side effect: `values` is sorted ascending. `lows` must be ascending and
/// every element must be comparable (no NaN).
///
/// Returns one `(low, count)` per breakpoint, where `count` is the number
/// of values in `[low, breakpoint)`, followed by `(last breakpoint, count
/// of values >= last breakpoint)`. The first `low` is the smallest value,
/// or `T::default()` when `values` is empty.
///
/// The tail entry is the real number of remaining values, so the counts
/// always sum to `values.len()`. It is not `len - 1`.
pub fn buckets<T>(values: &mut [T], lows: &[T]) -> Vec<(T, usize)>
where
    T: PartialOrd + Copy + Default,
{
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut result = Vec::with_capacity(lows.len() + 1);
    let mut low = values.first().copied().unwrap_or_default();
    let mut i = 0;

    for &next in lows {
        let start = i;
        while i < values.len() && values[i] < next {
            i += 1;
        }
        result.push((low, i - start));
        low = next;
    }
    result.push((low, values.len() - i));
    result
}

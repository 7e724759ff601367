//! Small numeric conversion helpers

/// Convert a `usize` into an `f64` (precision loss only for values > 2^52).
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

/// Returns evenly spaced samples over the closed interval `[start, stop]`.
///
/// For `num == 1` only `start` is returned, for `num == 0` the result is empty.
#[must_use]
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / usize_to_f64(num - 1);
            (0..num)
                .map(|i| if i == num - 1 { stop } else { step.mul_add(usize_to_f64(i), start) })
                .collect()
        }
    }
}

//! Linear interpolation over evenly spaced series
//!
//! Positions in the input slice are treated as equally spaced steps (for
//! the forecasting pipeline one step is one calendar day), so interpolating
//! by slot index is interpolating by elapsed time.

use crate::{MathError, Result};

/// Straight-line value at `x` on the segment through `(x0, y0)` and `(x1, y1)`.
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> Result<f64> {
    let span = x1 - x0;
    if span.abs() < f64::EPSILON {
        return Err(MathError::InvalidInput(
            "Interpolation endpoints must be distinct".to_string(),
        ));
    }

    Ok(y0 + (y1 - y0) * (x - x0) / span)
}

/// Fill interior gaps of an evenly spaced series in place.
///
/// Every `None` that has a known value on both sides is replaced by the
/// straight-line value between its nearest known neighbours. Leading and
/// trailing gaps are left untouched; nothing is extrapolated.
///
/// Returns the number of slots that were filled.
pub fn fill_interior_gaps(values: &mut [Option<f64>]) -> usize {
    let mut filled = 0;
    let mut last_known: Option<usize> = None;

    for idx in 0..values.len() {
        let Some(right) = values[idx] else {
            continue;
        };

        if let Some(left_idx) = last_known {
            if idx - left_idx > 1 {
                // values[left_idx] is always Some: it was the last known slot
                let left = values[left_idx].unwrap_or(right);
                for pos in left_idx + 1..idx {
                    // endpoints are distinct, so lerp cannot fail here
                    values[pos] =
                        lerp(left_idx as f64, left, idx as f64, right, pos as f64).ok();
                    filled += usize::from(values[pos].is_some());
                }
            }
        }

        last_known = Some(idx);
    }

    filled
}

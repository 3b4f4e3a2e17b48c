//! Squeeze/unsqueeze. Squeeze removes size-1 axes (all of them,
//! or only the named ones); unsqueeze inserts a size-1 axis at a position.

use super::{normalize_axes, Shape};
use crate::error::{Result, ShapeError};

/// Removes size-1 axes. With `axes = None`, every size-1 axis is dropped.
/// With `axes = Some(..)`, each named axis must have size 1 or the call
/// fails -- squeezing a non-unit axis is a programmer error, not a silent
/// no-op.
pub fn squeeze(shape: &[usize], axes: Option<&[i64]>) -> Result<Shape> {
    let rank = shape.len();

    match axes {
        None => Ok(shape.iter().copied().filter(|&dim| dim != 1).collect()),
        Some(axes) => {
            let normalized = normalize_axes(axes, rank)?;
            for &axis in &normalized {
                if shape[axis] != 1 {
                    return Err(ShapeError::SqueezeNonUnit {
                            axis,
                            size: shape[axis],
                    });
                }
            }
            let drop: std::collections::HashSet<usize> = normalized.into_iter().collect();
            Ok(shape
                .iter()
                .enumerate()
                .filter(|(axis, _)| !drop.contains(axis))
                .map(|(_, &dim)| dim)
                .collect())
        }
    }
}

/// Inserts a size-1 axis at `axis` (positive or negative; negative counts
/// from the end of the *output* shape, i.e. `rank + 1` possible positions).
pub fn unsqueeze(shape: &[usize], axis: i64) -> Result<Shape> {
    let out_rank = shape.len() + 1;
    let normalized = super::normalize_axis(axis, out_rank)?;

    let mut out = shape.to_vec();
    out.insert(normalized, 1);
    Ok(out)
}

//! Expand: a broadcast-style *view*. Target rank must be >= the
//! input rank; extra leading dims are added. Per aligned position, the
//! target dim must equal the input dim, or the input dim must be 1 (then it
//! is virtually repeated), or the target dim is `-1` (keep the input dim).

use super::Shape;
use crate::error::{Result, ShapeError};

pub fn expand(shape: &[usize], target: &[i64]) -> Result<Shape> {
    if target.len() < shape.len() {
        return Err(ShapeError::PatternRankMismatch {
                expected: shape.len(),
                actual: target.len(),
        });
    }

    let pad = target.len() - shape.len();
    let mut out = Vec::with_capacity(target.len());

    for (i, &target_dim) in target.iter().enumerate() {
        if i < pad {
            // New leading dim: -1 is not meaningful here since there is no
            // corresponding input dim to keep; treat it as "1" the way an
            // absent axis would broadcast, unless a concrete size is given.
            out.push(if target_dim < 0 { 1 } else { target_dim as usize });
            continue;
        }

        let axis = i - pad;
        let input_dim = shape[axis];

        let resolved = if target_dim == -1 {
            input_dim
        } else if target_dim as usize == input_dim {
            input_dim
        } else if input_dim == 1 {
            target_dim as usize
        } else {
            return Err(ShapeError::ExpandNonSingleton {
                    axis,
                    from: input_dim,
                    to: target_dim.max(0) as usize,
            });
        };
        out.push(resolved);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_singleton_axis() {
        assert_eq!(expand(&[1, 3], &[4, 3]).unwrap(), vec![4, 3]);
    }

    #[test]
    fn expand_adds_leading_dims() {
        assert_eq!(expand(&[3], &[2, 3]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn expand_keeps_input_dim_with_minus_one() {
        assert_eq!(expand(&[1, 3], &[-1, 3]).unwrap(), vec![1, 3]);
    }

    #[test]
    fn expand_non_singleton_mismatch_fails() {
        assert!(expand(&[3, 3], &[4, 3]).is_err());
    }

    #[test]
    fn expand_with_fewer_target_dims_fails() {
        assert!(expand(&[2, 3], &[3]).is_err());
    }
}

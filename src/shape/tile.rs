//! Tile: a copy-style repeat. Output dim = input dim x reps;
//! extra leading reps introduce new leading dims (unlike `expand`, which is
//! a view, `tile` always materializes -- see `ops::copy`).

use super::Shape;
use crate::error::{Result, ShapeError};

pub fn tile(shape: &[usize], reps: &[usize]) -> Result<Shape> {
    let pad = reps.len().saturating_sub(shape.len());
    let shape_pad = shape.len().saturating_sub(reps.len());

    if shape_pad > 0 {
        return Err(ShapeError::PatternRankMismatch {
                expected: reps.len(),
                actual: shape.len(),
        });
    }

    let mut out = Vec::with_capacity(reps.len());
    for (i, &rep) in reps.iter().enumerate() {
        if i < pad {
            out.push(rep);
        } else {
            let input_dim = shape[i - pad];
            out.push(input_dim * rep);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_repeats_each_dim() {
        assert_eq!(tile(&[2, 3], &[1, 2]).unwrap(), vec![2, 6]);
        assert_eq!(tile(&[2, 3], &[3, 1]).unwrap(), vec![6, 3]);
    }

    #[test]
    fn tile_adds_leading_dims() {
        assert_eq!(tile(&[3], &[2, 1]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn tile_with_fewer_reps_than_rank_fails() {
        assert!(tile(&[2, 3], &[2]).is_err());
    }
}

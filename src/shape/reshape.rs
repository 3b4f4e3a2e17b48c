//! Reshape/view shape validity: `Π from == Π to`, with one `-1`
//! permitted in the target and inferred when the quotient is integral.

use super::{numel, Shape};
use crate::error::{Result, ShapeError};

/// Resolves a reshape target that may contain at most one `-1` placeholder,
/// normalizing it to a concrete value before storing.
///
/// `target` uses `i64` so `-1` is representable; every other entry must be
/// non-negative.
pub fn reshape(from: &[usize], target: &[i64]) -> Result<Shape> {
    let from_size = numel(from);

    let mut minus_one_at: Option<usize> = None;
    let mut known_product: usize = 1;
    for (i, &d) in target.iter().enumerate() {
        if d == -1 {
            if minus_one_at.is_some() {
                // More than one -1 is not a valid inference target; surface
                // it as a reshape mismatch rather than adding a new
                // classifier for a single-use case.
                return Err(ShapeError::ShapeReshape {
                        from_size,
                        to_size: 0,
                        bad_dim: Some(i),
                });
            }
            minus_one_at = Some(i);
        } else if d < 0 {
            return Err(ShapeError::ShapeReshape {
                    from_size,
                    to_size: 0,
                    bad_dim: Some(i),
            });
        } else {
            known_product *= d as usize;
        }
    }

    let mut resolved: Shape = target
    .iter()
    .map(|&d| if d == -1 { 0 } else { d as usize })
    .collect();

    if let Some(idx) = minus_one_at {
        if known_product == 0 || from_size % known_product != 0 {
            return Err(ShapeError::ShapeReshape {
                    from_size,
                    to_size: known_product,
                    bad_dim: Some(idx),
            });
        }
        resolved[idx] = from_size / known_product;
    }

    let to_size = numel(&resolved);
    if to_size != from_size {
        return Err(ShapeError::ShapeReshape {
                from_size,
                to_size,
                bad_dim: None,
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_reshape_inference_seed_scenario() {
        assert_eq!(reshape(&[2, 3, 4], &[-1, 6]).unwrap(), vec![4, 6]);
        assert!(reshape(&[2, 3, 4], &[5, -1]).is_err());
    }

    #[test]
    fn exact_match_without_inference() {
        assert_eq!(reshape(&[2, 3], &[3, 2]).unwrap(), vec![3, 2]);
    }

    #[test]
    fn mismatched_total_size_fails() {
        assert!(reshape(&[2, 3], &[4, 2]).is_err());
    }

    #[test]
    fn reshape_round_trip_is_idempotent() {
        let from = vec![2, 3, 4];
        let to: Vec<i64> = vec![4, 3, 2];
        let reshaped = reshape(&from, &to).unwrap();
        let back: Vec<i64> = from.iter().map(|&d| d as i64).collect();
        let round_tripped = reshape(&reshaped, &back).unwrap();
        assert_eq!(round_tripped, from);
    }

    #[test]
    fn single_minus_one_on_scalar_source_fails_when_not_divisible() {
        assert!(reshape(&[7], &[-1, 2]).is_err());
    }
}

//! Reduction output shape. Normalizes axes, rejects duplicates
//! and out-of-range values, and either zeroes reduced axes to size 1
//! (`keep_dims`) or drops them entirely.

use super::{normalize_axes, Shape};
use crate::error::Result;

/// Computes the output shape after reducing `shape` over `axes`.
/// `axes = None` reduces every axis (spec: "all-ones if keep_dims" or a bare
/// scalar shape `[]` otherwise).
pub fn reduction_shape(shape: &[usize], axes: Option<&[i64]>, keep_dims: bool) -> Result<Shape> {
    let rank = shape.len();

    let normalized: Vec<usize> = match axes {
        Some(axes) => normalize_axes(axes, rank)?,
        None => (0..rank).collect(),
    };

    if keep_dims {
        let mut out = shape.to_vec();
        for &axis in &normalized {
            out[axis] = 1;
        }
        Ok(out)
    } else {
        let reduced: std::collections::HashSet<usize> = normalized.into_iter().collect();
        Ok(shape
            .iter()
            .enumerate()
            .filter(|(axis, _)| !reduced.contains(axis))
            .map(|(_, &dim)| dim)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_reduction_seed_scenario() {
        assert_eq!(
            reduction_shape(&[2, 3, 4], Some(&[0, 2]), true).unwrap(),
            vec![1, 3, 1]
        );
    }

    #[test]
    fn reduce_without_keep_dims_drops_axes() {
        assert_eq!(reduction_shape(&[2, 3, 4], Some(&[0, 2]), false).unwrap(), vec![3]);
    }

    #[test]
    fn reduce_all_axes_with_none() {
        assert_eq!(reduction_shape(&[2, 3, 4], None, false).unwrap(), Vec::<usize>::new());
        assert_eq!(reduction_shape(&[2, 3, 4], None, true).unwrap(), vec![1, 1, 1]);
    }

    #[test]
    fn negative_axes_are_normalized() {
        assert_eq!(
            reduction_shape(&[2, 3, 4], Some(&[-1]), false).unwrap(),
            vec![2, 3]
        );
    }

    #[test]
    fn duplicate_axes_fail() {
        assert!(reduction_shape(&[2, 3, 4], Some(&[0, -3]), false).is_err());
    }

    #[test]
    fn out_of_range_axis_fails() {
        assert!(reduction_shape(&[2, 3, 4], Some(&[5]), false).is_err());
    }

    #[test]
    fn reduce_all_matches_reduce_explicit_axes() {
        let all_axes: Vec<i64> = (0..3).collect();
        let via_none = reduction_shape(&[2, 3, 4], None, false).unwrap();
        let via_explicit = reduction_shape(&[2, 3, 4], Some(&all_axes), false).unwrap();
        assert_eq!(via_none, via_explicit);
    }
}

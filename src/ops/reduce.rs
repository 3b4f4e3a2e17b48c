//! Reduction ops: `{sum, mean, max, min, prod}` over one or more
//! axes, with `keep_dims`. Every reducer preserves the input dtype except
//! `mean`, which always returns `to_float(input.dtype)`, since the average
//! of integers is not generally an integer.

use super::materialized_output;
use crate::dtype::DType;
use crate::error::Result;
use crate::shape::reduction_shape;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Mean,
    Max,
    Min,
    Prod,
}

impl ReduceOp {
    fn output_dtype(self, input: DType) -> DType {
        match self {
            ReduceOp::Mean => input.to_float(),
            _ => input,
        }
    }
}

pub fn apply(
    op: ReduceOp,
    input: &TensorStorage,
    axes: Option<&[i64]>,
    keep_dims: bool,
) -> Result<StorageTransformation> {
    let shape = reduction_shape(&input.shape, axes, keep_dims)?;
    let dtype = op.output_dtype(input.dtype);

    let f_contiguous = input.layout.f_contiguous;

    Ok(materialized_output(
            OpTag::Reduce,
            dtype,
            shape,
            f_contiguous,
            vec![input.clone()],
            OpAttrs::Reduce {
                axes: axes.map(|a| a.to_vec()),
                keep_dims,
            },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_reduce_seed_scenario() {
        let input = TensorStorage::fresh(DType::Float32, vec![2, 3, 4]);
        let result = apply(ReduceOp::Sum, &input, Some(&[0, 2]), true).unwrap();
        assert_eq!(result.output.shape, vec![1, 3, 1]);
        assert_eq!(result.output.dtype, DType::Float32);
    }

    #[test]
    fn mean_always_returns_floating_dtype() {
        let input = TensorStorage::fresh(DType::Int32, vec![4]);
        let result = apply(ReduceOp::Mean, &input, None, false).unwrap();
        assert_eq!(result.output.dtype, DType::Float64);
        assert_eq!(result.output.shape, Vec::<usize>::new());
    }

    #[test]
    fn sum_preserves_integer_dtype() {
        let input = TensorStorage::fresh(DType::Int16, vec![4]);
        let result = apply(ReduceOp::Sum, &input, None, false).unwrap();
        assert_eq!(result.output.dtype, DType::Int16);
    }

    #[test]
    fn reduce_output_is_not_a_view() {
        let input = TensorStorage::fresh(DType::Float32, vec![4, 5]);
        let result = apply(ReduceOp::Max, &input, Some(&[1]), false).unwrap();
        assert!(!result.output.layout.is_view);
        assert!(result.output.layout.c_contiguous.is_true());
    }

    #[test]
    fn reduce_rejects_out_of_range_axis() {
        let input = TensorStorage::fresh(DType::Float32, vec![4, 5]);
        assert!(apply(ReduceOp::Min, &input, Some(&[5]), false).is_err());
    }

    #[test]
    fn reduce_over_all_axes_with_keep_dims() {
        let input = TensorStorage::fresh(DType::Float64, vec![2, 3]);
        let result = apply(ReduceOp::Prod, &input, None, true).unwrap();
        assert_eq!(result.output.shape, vec![1, 1]);
    }
}

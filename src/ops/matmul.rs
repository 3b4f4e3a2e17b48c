//! Matmul: the batch-broadcasting layer is symmetric and always
//! produces canonical C-order strides for the output.

use super::materialized_output;
use crate::dtype::promote;
use crate::error::Result;
use crate::shape::matmul_shape;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

pub fn apply(lhs: &TensorStorage, rhs: &TensorStorage) -> Result<StorageTransformation> {
    let shape = matmul_shape(&lhs.shape, &rhs.shape)?;
    let dtype = promote(lhs.dtype, rhs.dtype);

    Ok(materialized_output(
            OpTag::Matmul,
            dtype,
            shape,
            crate::layout::TriBool::False,
            vec![lhs.clone(), rhs.clone()],
            OpAttrs::None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::layout::c_strides;

    #[test]
    fn s2_matmul_seed_scenario() {
        let lhs = TensorStorage::fresh(DType::Float32, vec![5, 2, 3]);
        let rhs = TensorStorage::fresh(DType::Float64, vec![5, 3, 4]);
        let result = apply(&lhs, &rhs).unwrap();
        assert_eq!(result.output.shape, vec![5, 2, 4]);
        assert_eq!(result.output.strides, c_strides(&[5, 2, 4]));
        assert_eq!(result.output.dtype, DType::Float64);
    }

    #[test]
    fn matmul_output_is_c_contiguous_and_not_a_view() {
        let lhs = TensorStorage::fresh(DType::Float32, vec![2, 3]);
        let rhs = TensorStorage::fresh(DType::Float32, vec![3, 4]);
        let result = apply(&lhs, &rhs).unwrap();
        assert!(result.output.layout.c_contiguous.is_true());
        assert!(!result.output.layout.is_view);
    }

    #[test]
    fn matmul_inner_mismatch_fails() {
        let lhs = TensorStorage::fresh(DType::Float32, vec![2, 3]);
        let rhs = TensorStorage::fresh(DType::Float32, vec![4, 5]);
        assert!(apply(&lhs, &rhs).is_err());
    }
}

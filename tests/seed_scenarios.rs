//! Integration coverage for the ten end-to-end scenarios this engine is
//! expected to satisfy: broadcasting, matmul, reduction,
//! reshape inference, slicing, the three einops operations, the
//! non-contiguous-reshape guard, and symbolic resolution. Each unit module
//! already tests its own piece in isolation; this file checks the same
//! scenarios through the crate's public surface the way a downstream
//! execution backend would call it.

use shapewright::prelude::*;
use std::collections::BTreeMap;

#[test]
fn s1_broadcasting() {
    assert_eq!(broadcast(&[2, 1, 2], &[2, 1]).unwrap(), vec![2, 2, 2]);
}

#[test]
fn s2_matmul() {
    let lhs = TensorStorage::fresh(DType::Float32, vec![5, 2, 3]);
    let rhs = TensorStorage::fresh(DType::Float64, vec![5, 3, 4]);
    let result = ops::matmul::apply(&lhs, &rhs).unwrap().output;
    assert_eq!(result.shape, vec![5, 2, 4]);
    assert_eq!(result.strides, c_strides(&[5, 2, 4]));
    assert_eq!(result.dtype, DType::Float64);
}

#[test]
fn s3_reduction() {
    assert_eq!(
        reduction_shape(&[2, 3, 4], Some(&[0, 2]), true).unwrap(),
        vec![1, 3, 1]
    );
}

#[test]
fn s4_reshape_inference() {
    assert_eq!(reshape(&[2, 3, 4], &[-1, 6]).unwrap(), vec![4, 6]);
    assert!(matches!(
        reshape(&[2, 3, 4], &[5, -1]),
        Err(ShapeError::ShapeReshape { .. })
    ));
}

#[test]
fn s5_slice() {
    let indices = [
        SliceIndex::Range(SliceSpec {
            start: Some(0),
            stop: Some(5),
            step: Some(2),
        }),
        SliceIndex::Index(5),
        SliceIndex::Full,
    ];
    assert_eq!(slice(&[10, 20, 30], &indices).unwrap(), vec![3, 30]);
}

#[test]
fn s6_einops_rearrange() {
    let input = TensorStorage::fresh(DType::Float32, vec![32, 49, 8]);
    let hints = BTreeMap::from([("h".to_string(), 7)]);
    let result = einops::rearrange(&input, "b (h w) c -> b h w c", &hints).unwrap();
    assert_eq!(result.output.shape, vec![32, 7, 7, 8]);
}

#[test]
fn s7_einops_reduce() {
    let input = TensorStorage::fresh(DType::Float32, vec![32, 224, 224, 3]);
    let result = einops::reduce(
        &input,
        "b h w c -> b c",
        ops::reduce::ReduceOp::Mean,
        &BTreeMap::new(),
    )
    .unwrap();
    assert_eq!(result.output.shape, vec![32, 3]);
    assert_eq!(result.output.dtype, DType::Float32);
}

#[test]
fn s8_einops_repeat() {
    let input = TensorStorage::fresh(DType::Int32, vec![2, 2]);
    let hints = BTreeMap::from([("c".to_string(), 3)]);
    let result = einops::repeat(&input, "h w -> h w c", &hints).unwrap();
    assert_eq!(result.output.shape, vec![2, 2, 3]);
}

#[test]
fn s9_non_contiguous_reshape_fails() {
    let input = TensorStorage::fresh(DType::Float32, vec![3, 4]);
    let transposed = ops::view::transpose(&input).unwrap().output;
    let result = ops::view::reshape(&transposed, &[12]);
    assert!(matches!(result, Err(ShapeError::LayoutNonContiguous { .. })));
}

#[test]
fn s10_symbolic_resolution() {
    let mut env = Environment::new();
    env.define("n", Some(32));
    env.define("m", None);
    env.add_constraint(Constraint::eq(
        SymbolicDim::Named("n".to_string()),
        SymbolicDim::Named("m".to_string()),
    ));

    let shape = vec![
        SymbolicDim::Named("n".to_string()),
        SymbolicDim::Named("m".to_string()),
    ];
    let resolved = env.resolve(&shape, ResolveMode::Strict).unwrap();
    assert_eq!(resolved, vec![32, 32]);
}

#[test]
fn rearrange_round_trip_permutation_matches_law_6() {
    // rearrange(rearrange(x, "p -> q"), "q -> p") returns a storage with
    // shape equal to x.shape whenever p and q differ only by a permutation.
    let input = TensorStorage::fresh(DType::Float32, vec![2, 3, 4]);
    let forward = einops::rearrange(&input, "a b c -> c a b", &BTreeMap::new())
        .unwrap()
        .output;
    let back = einops::rearrange(&forward, "c a b -> a b c", &BTreeMap::new())
        .unwrap()
        .output;
    assert_eq!(back.shape, input.shape);
}

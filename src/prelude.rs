//! Convenience re-export of the public surface most call sites need, all
//! gathered in one place.

pub use crate::dtype::{promote, DType};
pub use crate::error::{PatternError, PatternResult, Result, ShapeError, Span};
pub use crate::layout::{c_strides, f_strides, flags_for, LayoutFlags, TriBool};
pub use crate::shape::{
    broadcast, expand, matmul_shape, normalize_axis, normalize_axes, numel, permute, rank,
    reduction_shape, reshape, slice, squeeze, tile, transpose, unsqueeze, validate_shape, Shape,
    SliceIndex, SliceSpec, MAX_TENSOR_RANK, MAX_TENSOR_SIZE,
};
pub use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

pub use crate::ops;

pub use crate::einops;
pub use crate::einops::EinopsAst;

pub use crate::static_rank::TypedShape;
pub use crate::symbolic::{Constraint, ConstraintKind, Environment, ResolveMode, SymbolicDim};

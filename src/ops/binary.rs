//! Binary ops: `{add, sub, mul, div, mod, pow, min, max, eq, ne,
//! lt, le, gt, ge, logical_and, logical_or}`. Output shape is
//! `broadcast(A, B)`; output dtype is `promote(A, B)` except comparisons and
//! logicals (always `bool`) and `div`, whose policy is documented below.

use super::materialized_output;
use crate::dtype::{promote, DType};
use crate::error::Result;
use crate::shape::broadcast;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Min,
    Max,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    fn is_comparison_or_logical(self) -> bool {
        use BinaryOp::*;
        matches!(self, Eq | Ne | Lt | Le | Gt | Ge | LogicalAnd | LogicalOr)
    }

    /// Resolves the output dtype for this op given the promoted dtype of
    /// its operands.
    ///
    /// `div` follows the documented division policy (see DESIGN.md):
    /// true division, returning `to_float(promote(a, b))` even when both
    /// operands are integral. This is a deliberate, recorded choice -- the
    /// alternative (same-integer-type division) is explicitly rejected by
    /// default.
    fn output_dtype(self, promoted: DType) -> DType {
        if self.is_comparison_or_logical() {
            DType::Bool
        } else if self == BinaryOp::Div {
            promoted.to_float()
        } else {
            promoted
        }
    }
}

pub fn apply(op: BinaryOp, lhs: &TensorStorage, rhs: &TensorStorage) -> Result<StorageTransformation> {
    let shape = broadcast(&lhs.shape, &rhs.shape)?;
    let promoted = promote(lhs.dtype, rhs.dtype);
    let dtype = op.output_dtype(promoted);

    Ok(materialized_output(
            OpTag::Binary,
            dtype,
            shape,
            crate::layout::TriBool::False,
            vec![lhs.clone(), rhs.clone()],
            OpAttrs::None,
    ))
}

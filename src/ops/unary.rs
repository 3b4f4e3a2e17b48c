//! Unary elementwise ops: `{neg, abs, sign, sin, cos, tan, asin,
//! acos, atan, exp, log, sqrt, square, floor, ceil, round, logical_not}`.
//! All preserve shape and strides; dtype rules differ per op.

use super::view_output;
use crate::dtype::DType;
use crate::error::Result;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Abs,
    Sign,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Log,
    Sqrt,
    Square,
    Floor,
    Ceil,
    Round,
    LogicalNot,
}

impl UnaryOp {
    /// `true` for the transcendental functions that always return a real
    /// value via `to_float` regardless of the input dtype.
    fn uses_to_float(self) -> bool {
        use UnaryOp::*;
        matches!(
            self,
            Sin | Cos | Tan | Asin | Acos | Atan | Exp | Log | Sqrt
        )
    }

    fn output_dtype(self, input: DType) -> DType {
        match self {
            UnaryOp::LogicalNot => DType::Bool,
            op if op.uses_to_float() => input.to_float(),
            // neg, abs, sign, square, floor, ceil, round preserve dtype.
            _ => input,
        }
    }
}

/// Unary ops never fail: they are defined over any shape and any dtype
/// (promotion/to_float functions are total). `apply` therefore
/// returns the transformation directly, not a `Result`, but is kept under
/// the same `Result`-returning shape as every other op for call-site
/// uniformity and because the op catalog description is a boundary that the
/// rest of the crate always treats as fallible.
pub fn apply(op: UnaryOp, input: &TensorStorage) -> Result<StorageTransformation> {
    let dtype = op.output_dtype(input.dtype);

    // Elementwise ops preserve shape and strides exactly; they produce a new
    // value (not a view: spec table says `is_view = false` for unary).
    let layout = crate::layout::LayoutFlags {
        c_contiguous: input.layout.c_contiguous,
        f_contiguous: input.layout.f_contiguous,
        is_view: false,
        writeable: true,
        aligned: true,
    };

    Ok(view_output(
            OpTag::Unary,
            dtype,
            input.shape.clone(),
            input.strides.clone(),
            layout,
            input.offset,
            vec![input.clone()],
            OpAttrs::None,
    ))
}

//! `ops` is the operation catalog: one entry per supported
//! operation, each exposing `validate`, `output` and `describe` in spirit --
//! concretely, each op module exposes a single `apply`-style function that
//! validates its inputs, computes the output `TensorStorage`, and returns
//! the tagged `StorageTransformation` in one call, since in this engine the
//! three steps always run together (a caller never wants the output shape
//! without the validation that produced it).

pub mod binary;
pub mod copy;
pub mod matmul;
pub mod reduce;
pub mod unary;
pub mod view;

use crate::dtype::DType;
use crate::layout::{c_strides, LayoutFlags, TriBool};
use crate::shape::numel;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

/// Builds the `StorageTransformation` for an op that always produces fresh,
/// C-contiguous, non-view output (binary, matmul, tile, reduce, einops
/// reduce/repeat -- see the layout propagation table). `f_contiguous` is
/// taken from the caller since the table gives each of these ops a
/// different answer: `false` for binary/matmul/tile, but "true iff the
/// input was" for reduction -- never a blanket `Unknown`.
fn materialized_output(
    op: OpTag,
    dtype: DType,
    shape: Vec<usize>,
    f_contiguous: TriBool,
    inputs: Vec<TensorStorage>,
    attrs: OpAttrs,
) -> StorageTransformation {
    crate::trace_debug!(?op, ?shape, ?dtype, "materialized op output");
    let strides = c_strides(&shape);
    let size = numel(&shape);
    let output = TensorStorage {
        dtype,
        shape,
        strides,
        size,
        layout: LayoutFlags {
            c_contiguous: TriBool::True,
            f_contiguous,
            is_view: false,
            writeable: true,
            aligned: true,
        },
        offset: 0,
    };
    StorageTransformation {
        op,
        output,
        inputs,
        attrs,
    }
}

/// Builds the `StorageTransformation` for a view-class op: shares the
/// input's dtype, is always `is_view = true`, and inherits `writeable`/
/// `aligned` from the (first) input, per the layout propagation table.
fn view_output(
    op: OpTag,
    dtype: DType,
    shape: Vec<usize>,
    strides: Vec<usize>,
    layout: LayoutFlags,
    offset: usize,
    inputs: Vec<TensorStorage>,
    attrs: OpAttrs,
) -> StorageTransformation {
    crate::trace_debug!(?op, ?shape, is_view = layout.is_view, "view op output");
    let size = numel(&shape);
    let output = TensorStorage {
        dtype,
        shape,
        strides,
        size,
        layout,
        offset,
    };
    StorageTransformation {
        op,
        output,
        inputs,
        attrs,
    }
}

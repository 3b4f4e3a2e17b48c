//! `einops` is the pattern-rewriting front-end: a three-stage
//! pipeline -- scanner -> parser -> AST -> resolver -- shared by `rearrange`,
//! `reduce` and `repeat`. Each entry point differs only in which bindings
//! are allowed to be dropped or introduced; `resolve` holds that shared
//! machinery.

pub mod ast;
mod parser;
mod resolve;
mod scanner;

pub use ast::EinopsAst;

use crate::dtype::DType;
use crate::error::{PatternError, PatternResult, ShapeError};
use crate::layout::{c_strides, LayoutFlags, TriBool};
use crate::ops::reduce::ReduceOp;
use crate::shape::numel;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};
use resolve::{reject_dropped_axes, resolve_input, resolve_output, UnboundPolicy};
use std::collections::BTreeMap;

fn wrap(pattern: &str, error: ShapeError) -> PatternError {
    PatternError {
        error,
        pattern: pattern.to_string(),
        span: None,
    }
}

/// `rearrange(pattern)`: pure reindexing. No axis may be summed away; no new
/// axis may be introduced. Produces a view per the layout propagation table
/// (row "einops rearrange"): `c_contiguous = false`,
/// `f_contiguous = false`, `is_view = true`, `writeable`/`aligned` inherited.
///
/// The emitted strides are the canonical C-order strides of the *output*
/// shape. Deriving the exact per-element view strides for an arbitrary
/// split/merge/transpose composition is a separate stride-algebra problem
/// this engine does not attempt; `is_view` and the `false`/`false`
/// contiguity flags still communicate "do not assume contiguous storage" to
/// a backend, which is the contract the layout table promises.
pub fn rearrange(
    input: &TensorStorage,
    pattern: &str,
    axes_hint: &BTreeMap<String, usize>,
) -> PatternResult<StorageTransformation> {
    crate::trace_debug!(pattern, input_shape = ?input.shape, "einops rearrange: scan+parse");
    let ast = parser::parse(pattern)?;

    let resolution =
    resolve_input(&ast.input, &input.shape, axes_hint).map_err(|e| wrap(pattern, e))?;
    reject_dropped_axes(&ast, &resolution.bindings).map_err(|e| wrap(pattern, e))?;
    let output_shape = resolve_output(
        &ast.output,
        &resolution.bindings,
        &resolution.ellipsis_dims,
        UnboundPolicy::Reject,
    )
    .map_err(|e| wrap(pattern, e))?;
    crate::trace_debug!(pattern, output_shape = ?output_shape, "einops rearrange: resolved");

    let transformation = view_transformation(
        OpTag::Rearrange,
        input,
        output_shape,
        pattern,
        ast,
        resolution.bindings,
    );
    Ok(transformation)
}

/// `reduce(pattern, op)`: every output identifier must also appear on the
/// input, but any input identifier missing from the output is reduced over.
/// Always materializes (row "einops reduce/repeat").
pub fn reduce(
    input: &TensorStorage,
    pattern: &str,
    op: ReduceOp,
    axes_hint: &BTreeMap<String, usize>,
) -> PatternResult<StorageTransformation> {
    let _ = op; // the reduction op affects dtype (to_float for mean), handled below
    crate::trace_debug!(pattern, ?op, input_shape = ?input.shape, "einops reduce: scan+parse");
    let ast = parser::parse(pattern)?;

    let resolution =
    resolve_input(&ast.input, &input.shape, axes_hint).map_err(|e| wrap(pattern, e))?;
    let output_shape = resolve_output(
        &ast.output,
        &resolution.bindings,
        &resolution.ellipsis_dims,
        UnboundPolicy::Reject,
    )
    .map_err(|e| wrap(pattern, e))?;

    let dtype = match op {
        ReduceOp::Mean => input.dtype.to_float(),
        _ => input.dtype,
    };

    let transformation = materialized_transformation(
        OpTag::Reduce2,
        input,
        dtype,
        output_shape,
        pattern,
        ast,
        resolution.bindings,
    );
    Ok(transformation)
}

/// `repeat(pattern)`: new identifiers may appear on the output provided they
/// have a size in `axes_hint`; no identifier may be dropped (that would be a
/// reduction, which `repeat` does not perform). Always materializes.
pub fn repeat(
    input: &TensorStorage,
    pattern: &str,
    axes_hint: &BTreeMap<String, usize>,
) -> PatternResult<StorageTransformation> {
    crate::trace_debug!(pattern, input_shape = ?input.shape, "einops repeat: scan+parse");
    let ast = parser::parse(pattern)?;

    let resolution =
    resolve_input(&ast.input, &input.shape, axes_hint).map_err(|e| wrap(pattern, e))?;
    reject_dropped_axes(&ast, &resolution.bindings).map_err(|e| wrap(pattern, e))?;
    let output_shape = resolve_output(
        &ast.output,
        &resolution.bindings,
        &resolution.ellipsis_dims,
        UnboundPolicy::RequireAxesHint(axes_hint),
    )
    .map_err(|e| wrap(pattern, e))?;

    let transformation = materialized_transformation(
        OpTag::Repeat,
        input,
        input.dtype,
        output_shape,
        pattern,
        ast,
        resolution.bindings,
    );
    Ok(transformation)
}

fn view_transformation(
    op: OpTag,
    input: &TensorStorage,
    output_shape: Vec<usize>,
    pattern: &str,
    ast: EinopsAst,
    bindings: BTreeMap<String, usize>,
) -> StorageTransformation {
    let strides = c_strides(&output_shape);
    let size = numel(&output_shape);
    let output = TensorStorage {
        dtype: input.dtype,
        shape: output_shape,
        strides,
        size,
        layout: LayoutFlags {
            c_contiguous: TriBool::False,
            f_contiguous: TriBool::False,
            is_view: true,
            writeable: input.layout.writeable,
            aligned: input.layout.aligned,
        },
        offset: input.offset,
    };
    StorageTransformation {
        op,
        output,
        inputs: vec![input.clone()],
        attrs: OpAttrs::Einops {
            pattern: pattern.to_string(),
            ast,
            bindings,
        },
    }
}

fn materialized_transformation(
    op: OpTag,
    input: &TensorStorage,
    dtype: DType,
    output_shape: Vec<usize>,
    pattern: &str,
    ast: EinopsAst,
    bindings: BTreeMap<String, usize>,
) -> StorageTransformation {
    let strides = c_strides(&output_shape);
    let size = numel(&output_shape);
    let output = TensorStorage {
        dtype,
        shape: output_shape,
        strides,
        size,
        layout: LayoutFlags {
            c_contiguous: TriBool::True,
            f_contiguous: TriBool::False,
            is_view: false,
            writeable: true,
            aligned: true,
        },
        offset: 0,
    };
    StorageTransformation {
        op,
        output,
        inputs: vec![input.clone()],
        attrs: OpAttrs::Einops {
            pattern: pattern.to_string(),
            ast,
            bindings,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn s6_einops_rearrange_seed_scenario() {
        let input = TensorStorage::fresh(DType::Float32, vec![32, 49, 8]);
        let hints = BTreeMap::from([("h".to_string(), 7)]);
        let result = rearrange(&input, "b (h w) c -> b h w c", &hints).unwrap();
        assert_eq!(result.output.shape, vec![32, 7, 7, 8]);
        assert!(result.output.layout.is_view);
    }

    #[test]
    fn s7_einops_reduce_seed_scenario() {
        let input = TensorStorage::fresh(DType::Float32, vec![32, 224, 224, 3]);
        let result = reduce(&input, "b h w c -> b c", ReduceOp::Mean, &BTreeMap::new()).unwrap();
        assert_eq!(result.output.shape, vec![32, 3]);
        assert_eq!(result.output.dtype, DType::Float32);
        assert!(!result.output.layout.is_view);
    }

    #[test]
    fn s8_einops_repeat_seed_scenario() {
        let input = TensorStorage::fresh(DType::Int32, vec![2, 2]);
        let hints = BTreeMap::from([("c".to_string(), 3)]);
        let result = repeat(&input, "h w -> h w c", &hints).unwrap();
        assert_eq!(result.output.shape, vec![2, 2, 3]);
        assert!(!result.output.layout.is_view);
    }

    #[test]
    fn repeat_without_axes_hint_for_new_axis_fails() {
        let input = TensorStorage::fresh(DType::Int32, vec![2, 2]);
        let err = repeat(&input, "h w -> h w c", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err.error, ShapeError::NewAxisRequiresSize { .. }));
    }

    #[test]
    fn rearrange_cannot_drop_an_axis() {
        let input = TensorStorage::fresh(DType::Float32, vec![2, 3]);
        let err = rearrange(&input, "a b -> a", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err.error, ShapeError::RearrangeCannotDropAxis { .. }));
    }

    #[test]
    fn rearrange_unknown_output_axis_fails() {
        let input = TensorStorage::fresh(DType::Float32, vec![2, 3]);
        let err = rearrange(&input, "a b -> a b c", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err.error, ShapeError::UnknownAxisInOutput { .. }));
    }

    #[test]
    fn rearrange_pure_permutation_round_trips() {
        let input = TensorStorage::fresh(DType::Float32, vec![2, 3]);
        let swapped = rearrange(&input, "p q -> q p", &BTreeMap::new()).unwrap().output;
        let back = rearrange(&swapped, "q p -> p q", &BTreeMap::new()).unwrap().output;
        assert_eq!(back.shape, input.shape);
    }
}

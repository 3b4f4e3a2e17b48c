//! View-class ops: reshape, flatten, view-with-inference, squeeze,
//! unsqueeze, transpose, permute, slice. All carry their parameters in the
//! `StorageTransformation` so execution never re-parses, and all produce
//! `is_view = true` output per the layout propagation table.

use super::view_output;
use crate::error::{Result, ShapeError};
use crate::layout::{c_strides, f_strides, LayoutFlags, TriBool};
use crate::shape::{self, slice::ResolvedAxis, SliceIndex};
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

/// `reshape`/`view`: the single most-tested layout contract is
/// that reshaping a non-contiguous input must fail with
/// `LayoutNonContiguous`, never silently reinterpret the strides.
pub fn reshape(input: &TensorStorage, target: &[i64]) -> Result<StorageTransformation> {
    let new_shape = shape::reshape(&input.shape, target)?;

    let (strides, c, f) = if input.layout.c_contiguous.is_true() {
        (c_strides(&new_shape), TriBool::True, TriBool::Unknown)
    } else if input.layout.f_contiguous.is_true() {
        (f_strides(&new_shape), TriBool::Unknown, TriBool::True)
    } else {
        return Err(ShapeError::LayoutNonContiguous { op: "reshape" });
    };

    let layout = LayoutFlags {
        c_contiguous: c,
        f_contiguous: f,
        is_view: true,
        writeable: input.layout.writeable,
        aligned: input.layout.aligned,
    };

    Ok(view_output(
            OpTag::Reshape,
            input.dtype,
            new_shape,
            strides,
            layout,
            input.offset,
            vec![input.clone()],
            OpAttrs::Reshape {
                target: target.to_vec(),
            },
    ))
}

/// `flatten`: reshape to a single axis of length `numel`. Shares the same
/// contiguity guard as `reshape` since it is reshape with a fixed target.
pub fn flatten(input: &TensorStorage) -> Result<StorageTransformation> {
    let mut transformation = reshape(input, &[-1])?;
    transformation.op = OpTag::Flatten;
    Ok(transformation)
}

/// Default transpose: swaps the last two axes.
pub fn transpose(input: &TensorStorage) -> Result<StorageTransformation> {
    let rank = input.rank();
    if rank < 2 {
        // Nothing to swap; treat as an identity view, consistent with
        // `shape::transpose`'s no-op behavior on rank < 2 shapes.
        let axes: Vec<usize> = (0..rank).collect();
        return permute(input, &axes);
    }
    let mut axes: Vec<usize> = (0..rank).collect();
    axes.swap(rank - 2, rank - 1);
    let mut transformation = permute(input, &axes)?;
    transformation.op = OpTag::Transpose;
    Ok(transformation)
}

/// Explicit permutation: `axes` must be a bijection over `[0, rank)`.
pub fn permute(input: &TensorStorage, axes: &[usize]) -> Result<StorageTransformation> {
    let new_shape = shape::permute(&input.shape, axes)?;
    let new_strides: Vec<usize> = axes.iter().map(|&axis| input.strides[axis]).collect();

    let layout = LayoutFlags {
        c_contiguous: TriBool::False,
        f_contiguous: TriBool::False,
        is_view: true,
        writeable: input.layout.writeable,
        aligned: input.layout.aligned,
    };

    Ok(view_output(
            OpTag::Permute,
            input.dtype,
            new_shape,
            new_strides,
            layout,
            input.offset,
            vec![input.clone()],
            OpAttrs::Permute {
                axes: axes.to_vec(),
            },
    ))
}

/// Slice: per-axis integer index / range / keep-all. Layout flags are
/// carried over from the input unchanged (preserved, may lose contiguity) --
/// deliberately does not require recomputing them here; a backend that
/// needs the precise answer recomputes via `layout::is_c_contiguous` over
/// the emitted strides.
pub fn slice(input: &TensorStorage, indices: &[SliceIndex]) -> Result<StorageTransformation> {
    let resolved = shape::slice::resolve(&input.shape, indices)?;

    let mut new_shape = Vec::new();
    let mut new_strides = Vec::new();
    let mut offset = input.offset;

    for (axis, axis_resolution) in resolved.iter().enumerate() {
        let ResolvedAxis { kept, start, step, len } = *axis_resolution;
        let input_stride = input.strides[axis] as i64;
        offset = (offset as i64 + start * input_stride) as usize;
        if kept {
            new_shape.push(len);
            new_strides.push((input_stride * step).unsigned_abs() as usize);
        }
    }

    let layout = LayoutFlags {
        c_contiguous: input.layout.c_contiguous,
        f_contiguous: input.layout.f_contiguous,
        is_view: true,
        writeable: input.layout.writeable,
        aligned: input.layout.aligned,
    };

    Ok(view_output(
            OpTag::Slice,
            input.dtype,
            new_shape,
            new_strides,
            layout,
            offset,
            vec![input.clone()],
            OpAttrs::Slice {
                indices: indices.to_vec(),
            },
    ))
}

/// Squeeze: removes size-1 axes (all, or only the named ones). Strides of
/// kept axes pass through unchanged.
pub fn squeeze(input: &TensorStorage, axes: Option<&[i64]>) -> Result<StorageTransformation> {
    let new_shape = shape::squeeze(&input.shape, axes)?;

    let kept_axes = kept_axes_after_squeeze(&input.shape, axes)?;
    let new_strides: Vec<usize> = kept_axes.iter().map(|&axis| input.strides[axis]).collect();

    let layout = LayoutFlags {
        c_contiguous: input.layout.c_contiguous,
        f_contiguous: input.layout.f_contiguous,
        is_view: true,
        writeable: input.layout.writeable,
        aligned: input.layout.aligned,
    };

    Ok(view_output(
            OpTag::Squeeze,
            input.dtype,
            new_shape,
            new_strides,
            layout,
            input.offset,
            vec![input.clone()],
            OpAttrs::None,
    ))
}

fn kept_axes_after_squeeze(shape: &[usize], axes: Option<&[i64]>) -> Result<Vec<usize>> {
    match axes {
        None => Ok(shape
            .iter()
            .enumerate()
            .filter(|(_, &dim)| dim != 1)
            .map(|(axis, _)| axis)
            .collect()),
        Some(axes) => {
            let normalized = shape::normalize_axes(axes, shape.len())?;
            for &axis in &normalized {
                if shape[axis] != 1 {
                    return Err(ShapeError::SqueezeNonUnit {
                            axis,
                            size: shape[axis],
                    });
                }
            }
            let drop: std::collections::HashSet<usize> = normalized.into_iter().collect();
            Ok((0..shape.len()).filter(|axis| !drop.contains(axis)).collect())
        }
    }
}

/// Unsqueeze: inserts a size-1 axis at `axis`. The inserted axis's stride
/// does not affect addressing (its extent is 1) so it is chosen to match
/// what the axis would be if the tensor were freshly laid out in C-order,
/// keeping a contiguous input contiguous after the insertion.
pub fn unsqueeze(input: &TensorStorage, axis: i64) -> Result<StorageTransformation> {
    let new_shape = shape::unsqueeze(&input.shape, axis)?;
    let insert_at = shape::normalize_axis(axis, new_shape.len())?;

    let mut new_strides = input.strides.clone();
    let inserted_stride = if insert_at < new_strides.len() {
        new_strides[insert_at]
    } else {
        1
    };
    new_strides.insert(insert_at, inserted_stride);

    let layout = LayoutFlags {
        c_contiguous: input.layout.c_contiguous,
        f_contiguous: input.layout.f_contiguous,
        is_view: true,
        writeable: input.layout.writeable,
        aligned: input.layout.aligned,
    };

    Ok(view_output(
            OpTag::Unsqueeze,
            input.dtype,
            new_shape,
            new_strides,
            layout,
            input.offset,
            vec![input.clone()],
            OpAttrs::None,
    ))
}

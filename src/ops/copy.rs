//! Copy-class ops: `expand` (a broadcast view -- output
//! dims are virtual repeats of size-1 input axes, the buffer itself is not
//! copied) and `tile` (a real repeat -- always materializes, per the
//! layout propagation table, which lists `expand` as a view and `tile` as
//! materialized).

use super::{materialized_output, view_output};
use crate::error::Result;
use crate::layout::LayoutFlags;
use crate::shape;
use crate::storage::{OpAttrs, OpTag, StorageTransformation, TensorStorage};

/// `expand`: a view. The expanded axes get stride `0` (so every virtual
/// repeat reads the same element), and the result is flagged non-contiguous
/// since a zero-stride axis never satisfies the canonical-strides equality
/// (`expand.is_view` is always `true`, even when the
/// target shape equals the input shape).
pub fn expand(input: &TensorStorage, target: &[i64]) -> Result<StorageTransformation> {
    let new_shape = shape::expand(&input.shape, target)?;
    let pad = new_shape.len() - input.shape.len();

    let mut new_strides = Vec::with_capacity(new_shape.len());
    for axis in 0..new_shape.len() {
        if axis < pad {
            new_strides.push(0);
            continue;
        }
        let input_axis = axis - pad;
        if input.shape[input_axis] == 1 && new_shape[axis] != 1 {
            new_strides.push(0);
        } else {
            new_strides.push(input.strides[input_axis]);
        }
    }

    let layout = LayoutFlags {
        c_contiguous: crate::layout::TriBool::False,
        f_contiguous: crate::layout::TriBool::False,
        is_view: true,
        writeable: input.layout.writeable,
        aligned: input.layout.aligned,
    };

    Ok(view_output(
            OpTag::Expand,
            input.dtype,
            new_shape.clone(),
            new_strides,
            layout,
            input.offset,
            vec![input.clone()],
            OpAttrs::Expand {
                target_shape: new_shape,
            },
    ))
}

/// `tile`: materializes a real repeat of the input along every axis.
pub fn tile(input: &TensorStorage, reps: &[usize]) -> Result<StorageTransformation> {
    let new_shape = shape::tile(&input.shape, reps)?;

    Ok(materialized_output(
            OpTag::Tile,
            input.dtype,
            new_shape,
            crate::layout::TriBool::False,
            vec![input.clone()],
            OpAttrs::Tile {
                reps: reps.to_vec(),
            },
    ))
}

//! Broadcasting execution helpers: data-movement-free iterators
//! a backend uses to walk broadcast operands without copying anything.
//! These sit next to the shape algebra rather than inside it because they
//! describe *how to read* already-validated shapes, not how to compute new
//! ones -- `analyze`/`expansions` consume a shape `broadcast` already
//! accepted.

use crate::error::{Result, ShapeError};
use crate::shape::{broadcast_all, numel, Shape};
use rayon::prelude::*;

/// Coarse dispatch hint for a backend deciding which execution path to take
/// (`analyze(shapes) -> Strategy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every operand is a 0-d scalar.
    Scalar,
    /// All operands already share the exact same shape: no broadcasting
    /// needed, a flat `zip` over contiguous buffers suffices.
    Vector,
    /// At least one operand needs a broadcast expansion along some axis.
    General,
}

/// Classifies a set of operand shapes for dispatch.
pub fn analyze(shapes: &[Shape]) -> Result<Strategy> {
    let out_shape = broadcast_all(shapes)?;

    if out_shape.is_empty() || numel(&out_shape) <= 1 {
        if shapes.iter().all(|s| s.is_empty()) {
            return Ok(Strategy::Scalar);
        }
    }

    if shapes.iter().all(|s| s == &out_shape) {
        Ok(Strategy::Vector)
    } else {
        Ok(Strategy::General)
    }
}

/// One input's virtual strides against a given output shape: `0` at any
/// axis the input broadcasts over, the input's real per-axis stride
/// otherwise.
pub fn expansions(input_shape: &[usize], input_strides: &[usize], out_shape: &[usize]) -> Result<Vec<usize>> {
    let rank = out_shape.len();
    if input_shape.len() > rank {
        return Err(ShapeError::PatternRankMismatch {
                expected: rank,
                actual: input_shape.len(),
        });
    }
    let pad = rank - input_shape.len();

    let mut out = Vec::with_capacity(rank);
    for axis in 0..rank {
        if axis < pad {
            out.push(0);
            continue;
        }
        let input_axis = axis - pad;
        let input_dim = input_shape[input_axis];
        if input_dim == out_shape[axis] {
            out.push(input_strides[input_axis]);
        } else if input_dim == 1 {
            out.push(0);
        } else {
            return Err(ShapeError::IncompatibleShapes {
                    lhs: input_shape.to_vec(),
                    rhs: out_shape.to_vec(),
                    axis,
                    lhs_dim: input_dim,
                    rhs_dim: out_shape[axis],
            });
        }
    }
    Ok(out)
}

/// Maps a flat output index to one input's linear (element) index via its
/// virtual strides and the output shape's own C-order strides. Deterministic
/// and side-effect free (contract): calling this twice with the
/// same `out_index` always returns the same input index.
pub fn input_index(out_index: usize, out_shape: &[usize], virtual_strides: &[usize]) -> usize {
    let mut remaining = out_index;
    let mut input_index = 0usize;

    for axis in 0..out_shape.len() {
        let axis_size: usize = out_shape[axis + 1..].iter().product();
        let coord = if axis_size == 0 { 0 } else { remaining / axis_size };
        remaining = if axis_size == 0 { 0 } else { remaining % axis_size };
        input_index += coord * virtual_strides[axis];
    }
    input_index
}

/// Precomputes `input_index` for every position of `out_shape` in one pass,
/// split into fixed-size chunks and walked with `rayon`'s `par_chunks_mut`,
/// the same chunk-and-`par_iter` shape `tensor::core_ops`'s elementwise
/// kernels use for flat buffers. A backend that needs the whole gather
/// table up front -- rather than calling `input_index` one coordinate at a
/// time -- gets the same answer, computed in parallel.
pub fn build_index_table(out_shape: &[usize], virtual_strides: &[usize]) -> Vec<usize> {
    let len = numel(out_shape);
    const CHUNK_SIZE: usize = 4096;

    let mut table = vec![0usize; len];
    table
    .par_chunks_mut(CHUNK_SIZE)
    .enumerate()
    .for_each(|(chunk_idx, chunk)| {
            let base = chunk_idx * CHUNK_SIZE;
            for (offset, slot) in chunk.iter_mut().enumerate() {
                *slot = input_index(base + offset, out_shape, virtual_strides);
            }
    });
    table
}

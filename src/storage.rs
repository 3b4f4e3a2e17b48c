//! `storage` defines the operation-free description of a tensor
//! (`TensorStorage`) and the tagged, self-describing record every operation
//! emits for a downstream executor (`StorageTransformation`): operation
//! descriptors as tagged variants, so a backend can pattern-match once
//! instead of re-deriving each op's shape logic itself.

use crate::dtype::DType;
use crate::layout::LayoutFlags;
use crate::shape::{SliceIndex, Shape};

/// A value-type description of a tensor: no buffer, no identity, just the
/// metadata every operation needs to validate against and every backend
/// needs to allocate/execute against.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorStorage {
    pub dtype: DType,
    pub shape: Shape,
    pub strides: Vec<usize>,
    pub size: usize,
    pub layout: LayoutFlags,
    pub offset: usize,
}

impl TensorStorage {
    /// Builds the canonical, fresh, C-order storage for `(dtype, shape)` --
    /// the constructor exposed to the tensor API.
    pub fn fresh(dtype: DType, shape: Shape) -> Self {
        let strides = crate::layout::c_strides(&shape);
        let size = crate::shape::numel(&shape);
        TensorStorage {
            dtype,
            shape,
            strides,
            size,
            layout: LayoutFlags::fresh(),
            offset: 0,
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// A short, human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "TensorStorage {{ dtype: {}, shape: {:?}, strides: {:?}, size: {}, offset: {} }}",
            self.dtype, self.shape, self.strides, self.size, self.offset
        )
    }
}

/// The op-tag sum type backing `StorageTransformation::op_tag`. Kept as a
/// real enum in addition to its `Display` string form, so a backend can
/// pattern-match exhaustively instead of string-comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Unary,
    Binary,
    Matmul,
    Reshape,
    View,
    Flatten,
    Transpose,
    Permute,
    Slice,
    Squeeze,
    Unsqueeze,
    Expand,
    Tile,
    Reduce,
    Rearrange,
    Reduce2, // einops "reduce", distinct from the `Reduce` op-catalog entry
    Repeat,
}

impl OpTag {
    pub fn as_str(self) -> &'static str {
        use OpTag::*;
        match self {
            Unary => "unary",
            Binary => "binary",
            Matmul => "matmul",
            Reshape => "reshape",
            View => "view",
            Flatten => "flatten",
            Transpose => "transpose",
            Permute => "permute",
            Slice => "slice",
            Squeeze => "squeeze",
            Unsqueeze => "unsqueeze",
            Expand => "expand",
            Tile => "tile",
            Reduce => "reduce",
            Rearrange => "rearrange",
            Reduce2 => "reduce",
            Repeat => "repeat",
        }
    }
}

impl std::fmt::Display for OpTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Op-specific attributes attached to a `StorageTransformation`. Each
/// variant carries exactly what its op needs so a backend never re-parses
/// or recomputes anything the engine already derived.
#[derive(Debug, Clone, PartialEq)]
pub enum OpAttrs {
    None,
    Reduce {
        axes: Option<Vec<i64>>,
        keep_dims: bool,
    },
    Slice {
        indices: Vec<SliceIndex>,
    },
    Permute {
        axes: Vec<usize>,
    },
    Expand {
        target_shape: Shape,
    },
    Tile {
        reps: Vec<usize>,
    },
    Reshape {
        target: Vec<i64>,
    },
    Einops {
        pattern: String,
        ast: crate::einops::EinopsAst,
        bindings: std::collections::BTreeMap<String, usize>,
    },
}

/// A single tagged, lazy operation record: the unit of communication between
/// this engine and the execution backend. `apply` on an operation-catalog
/// entry produces one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageTransformation {
    pub op: OpTag,
    pub output: TensorStorage,
    pub inputs: Vec<TensorStorage>,
    pub attrs: OpAttrs,
}

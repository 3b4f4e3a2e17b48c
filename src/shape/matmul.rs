//! Matmul shape inference, including the 1-D special cases and
//! batch broadcasting for rank >= 2 operands on both sides.

use super::broadcast::broadcast;
use super::Shape;
use crate::error::{Result, ShapeError};

/// Computes the output shape of `matmul(a, b)`. Both `a` and `b` must have
/// rank >= 1; a rank-0 (scalar) operand is a `ShapeError`, not a panic --
/// nothing in this crate's public surface throws (spec §7).
pub fn matmul_shape(a: &[usize], b: &[usize]) -> Result<Shape> {
    if a.is_empty() || b.is_empty() {
        return Err(ShapeError::PatternRankMismatch {
            expected: 1,
            actual: if a.is_empty() { a.len() } else { b.len() },
        });
    }

    match (a.len(), b.len()) {
        (1, 1) => {
            if a[0] != b[0] {
                return Err(ShapeError::ShapeMatmul {
                        inner_a: a[0],
                        inner_b: b[0],
                });
            }
            Ok(vec![])
        }
        (1, n) if n >= 2 => {
            let inner_b = b[n - 2];
            if a[0] != inner_b {
                return Err(ShapeError::ShapeMatmul { inner_a: a[0], inner_b });
            }
            // Drop the axis matched against `a`; batch dims of `b` pass through.
            let mut out: Shape = b[..n - 2].to_vec();
            out.push(b[n - 1]);
            Ok(out)
        }
        (m, 1) if m >= 2 => {
            let inner_a = a[m - 1];
            if inner_a != b[0] {
                return Err(ShapeError::ShapeMatmul { inner_a, inner_b: b[0] });
            }
            let mut out: Shape = a[..m - 2].to_vec();
            out.push(a[m - 2]);
            Ok(out)
        }
        (m, n) => {
            let inner_a = a[m - 1];
            let inner_b = b[n - 2];
            if inner_a != inner_b {
                return Err(ShapeError::ShapeMatmul { inner_a, inner_b });
            }
            let batch_a = &a[..m - 2];
            let batch_b = &b[..n - 2];
            let batch = broadcast(batch_a, batch_b).map_err(|_| ShapeError::ShapeMatmulBatch {
                    batch_a: batch_a.to_vec(),
                    batch_b: batch_b.to_vec(),
            })?;

            let mut out = batch;
            out.push(a[m - 2]);
            out.push(b[n - 1]);
            Ok(out)
        }
    }
}

//! Slicing. Per axis: an integer index removes the axis; a
//! `{start?, stop?, step?}` spec produces a new length under the half-open
//! convention; a "keep all" marker passes the axis through unchanged.

use super::Shape;
use crate::error::{Result, ShapeError};

/// A range spec for one axis, using the half-open `[start, stop)` convention
/// with Python-style defaults and negative-step reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceSpec {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

/// One axis of a slice operation (`SliceIndex`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceIndex {
    /// A single integer index; removes the axis from the result.
    Index(i64),
    /// A `{start?, stop?, step?}` range; keeps the axis with a new length.
    Range(SliceSpec),
    /// Keep the whole axis unchanged (equivalent to `Range` with all
    /// fields defaulted, spelled out for readability at call sites).
    Full,
}

/// The concrete, resolved parameters for one sliced axis, suitable for
/// embedding in a `StorageTransformation` so a backend can execute without
/// re-deriving start/stop/step from the original `SliceIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAxis {
    /// `false` when this axis was removed by an integer index.
    pub kept: bool,
    pub start: i64,
    pub step: i64,
    /// Output length along this axis; `0` if the axis was removed.
    pub len: usize,
}

/// Computes the output shape of a slice operation. `indices` must have at
/// most `shape.len()` entries; trailing axes default to `Full`.
pub fn slice(shape: &[usize], indices: &[SliceIndex]) -> Result<Shape> {
    Ok(resolve(shape, indices)?
        .into_iter()
        .filter(|axis| axis.kept)
        .map(|axis| axis.len)
        .collect())
}

/// Resolves every axis of `shape` against `indices`, producing one
/// `ResolvedAxis` per input axis (including removed ones, so callers that
/// need the full per-input-axis attribute list for a `StorageTransformation`
/// can still see which axes were dropped and how).
pub fn resolve(shape: &[usize], indices: &[SliceIndex]) -> Result<Vec<ResolvedAxis>> {
    if indices.len() > shape.len() {
        return Err(ShapeError::PatternRankMismatch {
                expected: shape.len(),
                actual: indices.len(),
        });
    }

    let mut out = Vec::with_capacity(shape.len());
    for (axis, &len) in shape.iter().enumerate() {
        let spec = indices.get(axis).copied().unwrap_or(SliceIndex::Full);
        out.push(resolve_axis(axis, len, spec)?);
    }
    Ok(out)
}

fn resolve_axis(axis: usize, len: usize, spec: SliceIndex) -> Result<ResolvedAxis> {
    match spec {
        SliceIndex::Index(index) => {
            let normalized = normalize_index(index, len, axis)?;
            Ok(ResolvedAxis {
                    kept: false,
                    start: normalized as i64,
                    step: 1,
                    len: 0,
            })
        }
        SliceIndex::Full => resolve_axis(
            axis,
            len,
            SliceIndex::Range(SliceSpec::default()),
        ),
        SliceIndex::Range(spec) => {
            let step = spec.step.unwrap_or(1);
            if step == 0 {
                return Err(ShapeError::SliceZeroStep);
            }

            let len_i = len as i64;
            if step > 0 {
                let start = clamp_start(spec.start.unwrap_or(0), len_i);
                let stop = clamp_stop(spec.stop.unwrap_or(len_i), len_i);
                let count = if stop > start {
                    ((stop - start) + step - 1) / step
                } else {
                    0
                };
                Ok(ResolvedAxis {
                        kept: true,
                        start,
                        step,
                        len: count.max(0) as usize,
                })
            } else {
                let default_start = len_i - 1;
                let default_stop = -1; // one before index 0, i.e. "past the start" for reverse
                let start = clamp_start(spec.start.unwrap_or(default_start), len_i);
                let stop = spec.stop.map(|s| clamp_stop_reverse(s, len_i)).unwrap_or(default_stop);
                let count = if start > stop {
                    ((start - stop) + (-step) - 1) / (-step)
                } else {
                    0
                };
                Ok(ResolvedAxis {
                        kept: true,
                        start,
                        step,
                        len: count.max(0) as usize,
                })
            }
        }
    }
}

fn normalize_index(index: i64, len: usize, axis: usize) -> Result<usize> {
    let len_i = len as i64;
    let normalized = if index < 0 { index + len_i } else { index };
    if normalized < 0 || normalized >= len_i {
        return Err(ShapeError::SliceIndexOutOfRange { axis, index, len });
    }
    Ok(normalized as usize)
}

fn clamp_start(start: i64, len: i64) -> i64 {
    let s = if start < 0 { start + len } else { start };
    s.clamp(0, len)
}

fn clamp_stop(stop: i64, len: i64) -> i64 {
    let s = if stop < 0 { stop + len } else { stop };
    s.clamp(0, len)
}

fn clamp_stop_reverse(stop: i64, len: i64) -> i64 {
    let s = if stop < 0 { stop + len } else { stop };
    s.clamp(-1, len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_slice_seed_scenario() {
        // slice([10,20,30], [{start:0,stop:5,step:2}, 5, null]) => [3,30]
        let indices = [
            SliceIndex::Range(SliceSpec {
                    start: Some(0),
                    stop: Some(5),
                    step: Some(2),
            }),
            SliceIndex::Index(5),
            SliceIndex::Full,
        ];
        assert_eq!(slice(&[10, 20, 30], &indices).unwrap(), vec![3, 30]);
    }

    #[test]
    fn integer_index_removes_axis() {
        let indices = [SliceIndex::Index(0)];
        assert_eq!(slice(&[4, 5], &indices).unwrap(), vec![5]);
    }

    #[test]
    fn negative_integer_index() {
        let indices = [SliceIndex::Index(-1)];
        assert_eq!(slice(&[4, 5], &indices).unwrap(), vec![5]);
    }

    #[test]
    fn out_of_range_index_fails() {
        let indices = [SliceIndex::Index(4)];
        assert!(slice(&[4], &indices).is_err());
    }

    #[test]
    fn zero_step_fails() {
        let indices = [SliceIndex::Range(SliceSpec {
                    start: None,
                    stop: None,
                    step: Some(0),
        })];
        assert!(slice(&[4], &indices).is_err());
    }

    #[test]
    fn trailing_axes_default_to_full() {
        assert_eq!(slice(&[2, 3, 4], &[SliceIndex::Index(0)]).unwrap(), vec![3, 4]);
    }

    #[test]
    fn negative_step_reverses() {
        let indices = [SliceIndex::Range(SliceSpec {
                    start: None,
                    stop: None,
                    step: Some(-1),
        })];
        let resolved = resolve(&[5], &indices).unwrap();
        assert_eq!(resolved[0].len, 5);
        assert_eq!(resolved[0].start, 4);
        assert_eq!(resolved[0].step, -1);
    }

    #[test]
    fn full_slice_is_identity() {
        assert_eq!(slice(&[2, 3, 4], &[SliceIndex::Full, SliceIndex::Full, SliceIndex::Full]).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn empty_range_produces_zero_length() {
        let indices = [SliceIndex::Range(SliceSpec {
                    start: Some(3),
                    stop: Some(3),
                    step: Some(1),
        })];
        assert_eq!(slice(&[10], &indices).unwrap(), vec![0]);
    }
}

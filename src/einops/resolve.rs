//! Shared shape resolution for all three einops operations. Matches the
//! input pattern against a concrete shape to produce axis-name bindings,
//! then walks an output
//! pattern against those bindings to produce an output shape. What differs
//! per operation (rearrange/reduce/repeat) is only which bindings are
//! allowed to be missing or new -- handled by their own thin wrappers in
//! `mod.rs`.

use super::ast::{AxisPattern, AxisTerm, EinopsAst};
use crate::error::{Result, ShapeError};
use std::collections::BTreeMap;

/// The bound sizes for every named axis plus the concrete dims consumed by
/// `...`, derived from matching `ast.input` against `shape`.
pub struct InputResolution {
    pub bindings: BTreeMap<String, usize>,
    pub ellipsis_dims: Vec<usize>,
}

/// Matches `ast.input` against `shape`, producing bindings for every simple
/// and composite identifier and capturing the ellipsis-consumed dims.
pub fn resolve_input(
    input: &[AxisPattern],
    shape: &[usize],
    axes_hint: &BTreeMap<String, usize>,
) -> Result<InputResolution> {
    let fixed_slots = input.iter().filter(|slot| !slot.is_ellipsis()).count();
    let has_ellipsis = input.iter().any(|slot| slot.is_ellipsis());

    if has_ellipsis {
        if shape.len() < fixed_slots {
            return Err(ShapeError::PatternRankMismatch {
                    expected: fixed_slots,
                    actual: shape.len(),
            });
        }
    } else if shape.len() != fixed_slots {
        return Err(ShapeError::PatternRankMismatch {
                expected: fixed_slots,
                actual: shape.len(),
        });
    }

    let ellipsis_len = shape.len() - fixed_slots;

    let mut bindings = BTreeMap::new();
    let mut ellipsis_dims = Vec::new();
    let mut shape_pos = 0;

    for slot in input {
        match slot {
            AxisPattern::Simple(AxisTerm::Ellipsis) => {
                ellipsis_dims = shape[shape_pos..shape_pos + ellipsis_len].to_vec();
                shape_pos += ellipsis_len;
            }
            AxisPattern::Simple(AxisTerm::Ident(name)) => {
                bindings.insert(name.clone(), shape[shape_pos]);
                shape_pos += 1;
            }
            AxisPattern::Simple(AxisTerm::Singleton) => {
                let dim = shape[shape_pos];
                if dim != 1 {
                    return Err(ShapeError::SingletonMismatch {
                            axis: shape_pos,
                            dim,
                    });
                }
                shape_pos += 1;
            }
            AxisPattern::Composite(terms) => {
                let dim = shape[shape_pos];
                resolve_composite_factors(terms, dim, axes_hint, &mut bindings)?;
                shape_pos += 1;
            }
        }
    }

    Ok(InputResolution {
            bindings,
            ellipsis_dims,
    })
}

/// Resolves the individual factor sizes of one composite group against the
/// single matched input dimension: known factors come from the axes map or
/// a `1` literal; at most one factor may be inferred by division; the
/// factors' product must equal `dim` exactly.
fn resolve_composite_factors(
    terms: &[AxisTerm],
    dim: usize,
    axes_hint: &BTreeMap<String, usize>,
    bindings: &mut BTreeMap<String, usize>,
) -> Result<()> {
    let mut known_product: usize = 1;
    let mut unknown: Option<&str> = None;

    for term in terms {
        match term {
            AxisTerm::Singleton => known_product *= 1,
            AxisTerm::Ident(name) => {
                if let Some(&size) = axes_hint.get(name) {
                    known_product *= size;
                } else if unknown.is_none() {
                    unknown = Some(name);
                } else {
                    // A second unbound factor: unresolvable without another hint.
                    return Err(ShapeError::CompositeDoesNotDivide {
                            dim,
                            known_product,
                    });
                }
            }
            AxisTerm::Ellipsis => unreachable!("parser rejects ellipsis inside a composite group"),
        }
    }

    match unknown {
        None => {
            if known_product != dim {
                return Err(ShapeError::CompositeDoesNotDivide { dim, known_product });
            }
        }
        Some(name) => {
            if known_product == 0 || dim % known_product != 0 {
                return Err(ShapeError::CompositeDoesNotDivide { dim, known_product });
            }
            bindings.insert(name.to_string(), dim / known_product);
        }
    }

    for term in terms {
        if let AxisTerm::Ident(name) = term {
            if let Some(&size) = axes_hint.get(name) {
                bindings.insert(name.clone(), size);
            }
        }
    }

    Ok(())
}

/// How an output identifier that was never bound on the input side should be
/// handled: rearrange/reduce reject it, repeat requires a size from the
/// axes map.
pub enum UnboundPolicy<'a> {
    Reject,
    RequireAxesHint(&'a BTreeMap<String, usize>),
}

/// Walks `ast.output` against the bindings produced by `resolve_input`,
/// producing the final output shape.
pub fn resolve_output(
    output: &[AxisPattern],
    bindings: &BTreeMap<String, usize>,
    ellipsis_dims: &[usize],
    unbound_policy: UnboundPolicy,
) -> Result<Vec<usize>> {
    let mut out = Vec::with_capacity(output.len());

    for slot in output {
        match slot {
            AxisPattern::Simple(AxisTerm::Ellipsis) => {
                out.extend_from_slice(ellipsis_dims);
            }
            AxisPattern::Simple(AxisTerm::Singleton) => out.push(1),
            AxisPattern::Simple(AxisTerm::Ident(name)) => {
                out.push(lookup_or_resolve(name, bindings, &unbound_policy)?);
            }
            AxisPattern::Composite(terms) => {
                let mut product = 1usize;
                for term in terms {
                    product *= match term {
                        AxisTerm::Singleton => 1,
                        AxisTerm::Ident(name) => lookup_or_resolve(name, bindings, &unbound_policy)?,
                        AxisTerm::Ellipsis => unreachable!(),
                    };
                }
                out.push(product);
            }
        }
    }

    Ok(out)
}

fn lookup_or_resolve(
    name: &str,
    bindings: &BTreeMap<String, usize>,
    unbound_policy: &UnboundPolicy,
) -> Result<usize> {
    if let Some(&size) = bindings.get(name) {
        return Ok(size);
    }
    match unbound_policy {
        UnboundPolicy::Reject => Err(ShapeError::UnknownAxisInOutput {
                name: name.to_string(),
        }),
        UnboundPolicy::RequireAxesHint(axes_hint) => {
            axes_hint.get(name).copied().ok_or_else(|| ShapeError::NewAxisRequiresSize {
                    name: name.to_string(),
            })
        }
    }
}

/// Rejects patterns that drop a bound input identifier from the output
/// (rearrange and repeat perform "no reduction" -- every bound
/// identifier must reappear on the output side).
pub fn reject_dropped_axes(ast: &EinopsAst, bindings: &BTreeMap<String, usize>) -> Result<()> {
    let output_idents: std::collections::HashSet<&str> = ast
    .output
    .iter()
    .flat_map(|slot| slot.identifiers())
    .collect();

    for name in bindings.keys() {
        if !output_idents.contains(name.as_str()) {
            return Err(ShapeError::RearrangeCannotDropAxis { name: name.clone() });
        }
    }
    Ok(())
}

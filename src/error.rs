//! `error` defines the single error type returned by every fallible function
//! in this crate. Nothing here panics or throws: every operation in the
//! shape, layout and einops algebras returns a `Result<_, ShapeError>` whose
//! variants are tagged classifiers carrying the offending shapes/axes so the
//! rendered message is actionable without extra formatting at the call site.

use std::fmt;
use thiserror::Error;

/// One axis position, already normalized (no negative indices reach this type).
pub type Axis = usize;

/// The single error enum for the shape/layout/einops engine.
///
/// Every variant corresponds to a named shape, layout or einops pattern
/// failure classifier.
/// Variants are intentionally fieldful: a `ShapeError` should be printable
/// on its own and still be useful to a caller that wants to pattern-match on
/// `kind`-like data instead of the rendered string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("cannot broadcast {lhs:?} and {rhs:?} at axis {axis}: {lhs_dim} vs {rhs_dim}")]
    IncompatibleShapes {
        lhs: Vec<usize>,
        rhs: Vec<usize>,
        axis: usize,
        lhs_dim: usize,
        rhs_dim: usize,
    },

    #[error("cannot reshape {from_size} elements into a shape of {to_size} elements")]
    ShapeReshape {
        from_size: usize,
        to_size: usize,
        bad_dim: Option<usize>,
    },

    #[error("matmul inner dimension mismatch: {inner_a} (lhs) vs {inner_b} (rhs)")]
    ShapeMatmul { inner_a: usize, inner_b: usize },

    #[error("matmul batch dimensions are not broadcast-compatible: {batch_a:?} vs {batch_b:?}")]
    ShapeMatmulBatch {
        batch_a: Vec<usize>,
        batch_b: Vec<usize>,
    },

    #[error("axis {axis} is out of range for a tensor of rank {rank}")]
    AxisOutOfRange { axis: i64, rank: usize },

    #[error("axis {axis} appears more than once")]
    AxisDuplicate { axis: usize },

    #[error("slice step cannot be zero")]
    SliceZeroStep,

    #[error("slice index {index} is out of range for axis {axis} of length {len}")]
    SliceIndexOutOfRange {
        axis: usize,
        index: i64,
        len: usize,
    },

    #[error("cannot squeeze axis {axis}: size is {size}, expected 1")]
    SqueezeNonUnit { axis: usize, size: usize },

    #[error("cannot expand axis {axis} from {from} to {to}: only size-1 axes can be expanded")]
    ExpandNonSingleton { axis: usize, from: usize, to: usize },

    #[error("{op} requires a contiguous input; reshape of a non-contiguous view is not a view-preserving operation, copy it first")]
    LayoutNonContiguous { op: &'static str },

    #[error("rank {rank} exceeds the maximum supported rank {max}")]
    RankOverflow { rank: usize, max: usize },

    #[error("tensor size {size} exceeds the maximum representable size {max}")]
    SizeOverflow { size: usize, max: usize },

    #[error("einops pattern is empty")]
    EmptyPattern,

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("singleton '1' pattern axis at input position {axis} is matched against a dimension of size {dim}, expected 1")]
    SingletonMismatch { axis: usize, dim: usize },

    #[error("axis '{name}' appears on the input pattern but not on the output; rearrange and repeat cannot drop axes, only reduce can")]
    RearrangeCannotDropAxis { name: String },

    #[error("einops pattern contains more than one '->'")]
    MultipleArrows,

    #[error("unmatched parenthesis in einops pattern at position {position}")]
    UnmatchedParen { position: usize },

    #[error("identifier '{name}' appears more than once on the same side of the pattern")]
    DuplicateIdentifier { name: String },

    #[error("einops pattern contains more than one '...' on the same side")]
    MultipleEllipses,

    #[error("axis '{name}' appears in the output pattern but not in the input pattern")]
    UnknownAxisInOutput { name: String },

    #[error("new axis '{name}' introduced by repeat requires a size in the axes map")]
    NewAxisRequiresSize { name: String },

    #[error("composite axis does not evenly divide dimension of size {dim} with known factors product {known_product}")]
    CompositeDoesNotDivide { dim: usize, known_product: usize },

    #[error("pattern expects {expected} axes but the input shape has rank {actual}")]
    PatternRankMismatch { expected: usize, actual: usize },

    #[error("constraint violated: {lhs} {op} {rhs} does not hold ({lhs_value} {op} {rhs_value} is false)")]
    ConstraintViolation {
        lhs: String,
        rhs: String,
        op: &'static str,
        lhs_value: u64,
        rhs_value: u64,
    },

    #[error("symbolic dimension '{name}' could not be resolved")]
    UnresolvedSymbolicDim { name: String },
}

/// Position span attached to a pattern-parse error, kept separate from
/// `ShapeError` itself so call sites that do not care about spans are not
/// forced to pattern-match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A `ShapeError` together with the pattern string and span it arose from,
/// for einops pattern-parse failures specifically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pub error: ShapeError,
    pub pattern: String,
    pub span: Option<Span>,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} (at {} in \"{}\")", self.error, span, self.pattern),
            None => write!(f, "{} (in \"{}\")", self.error, self.pattern),
        }
    }
}

impl std::error::Error for PatternError {}

pub type Result<T> = std::result::Result<T, ShapeError>;
pub type PatternResult<T> = std::result::Result<T, PatternError>;

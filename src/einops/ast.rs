//! The einops AST (`EinopsAst`): `{input: [AxisPattern],
//! output: [AxisPattern]}`. A small, owned, strictly tree-shaped value -- no
//! shared ownership, no arena (design notes: "the einops AST is a
//! small tree and should be an owned value").

/// One leaf of a pattern: a named axis, the `1` singleton literal, or `...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisTerm {
    Ident(String),
    Singleton,
    Ellipsis,
}

/// One positional slot of a pattern side: either a single term, or a
/// parenthesized group of terms that together describe one physical axis
/// (a composite axis being split on the input side or merged on the output
/// side).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisPattern {
    Simple(AxisTerm),
    Composite(Vec<AxisTerm>),
}

impl AxisPattern {
    /// All identifiers named anywhere in this pattern slot (a composite may
    /// name several).
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            AxisPattern::Simple(AxisTerm::Ident(name)) => vec![name.as_str()],
            AxisPattern::Composite(terms) => terms
            .iter()
            .filter_map(|term| match term {
                    AxisTerm::Ident(name) => Some(name.as_str()),
                    _ => None,
            })
            .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self, AxisPattern::Simple(AxisTerm::Ellipsis))
    }
}

/// The parsed pattern: one side consumed against the input shape, the other
/// walked to produce the output shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EinopsAst {
    pub input: Vec<AxisPattern>,
    pub output: Vec<AxisPattern>,
}

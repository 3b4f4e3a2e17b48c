//! Recursive-descent parser over the einops token stream. Grammar:
//! `pattern := side '->' side`, `side := atom (atom)*`,
//! `atom := identifier | '1' | '...' | '(' side ')'`.
//!
//! Rejects: empty input/output, multiple arrows, unmatched parens, a
//! duplicate identifier on one side, multiple ellipses on one side.

use super::ast::{AxisPattern, AxisTerm, EinopsAst};
use super::scanner::{scan, Token, TokenKind};
use crate::error::{PatternError, ShapeError, Span};
use std::collections::HashSet;

pub fn parse(pattern: &str) -> Result<EinopsAst, PatternError> {
    let tokens = scan(pattern)?;

    let fail = |error: ShapeError, span: Option<Span>| PatternError {
        error,
        pattern: pattern.to_string(),
        span,
    };

    if tokens.is_empty() {
        return Err(fail(ShapeError::EmptyPattern, None));
    }

    let arrow_positions: Vec<usize> = tokens
    .iter()
    .enumerate()
    .filter(|(_, t)| t.kind == TokenKind::Arrow)
    .map(|(i, _)| i)
    .collect();

    if arrow_positions.is_empty() {
        return Err(fail(ShapeError::MultipleArrows, None)); // no arrow is also malformed; see note below
    }
    if arrow_positions.len() > 1 {
        let span = tokens[arrow_positions[1]].span;
        return Err(fail(ShapeError::MultipleArrows, Some(span)));
    }

    let split = arrow_positions[0];
    let (input_tokens, rest) = tokens.split_at(split);
    let output_tokens = &rest[1..];

    if input_tokens.is_empty() || output_tokens.is_empty() {
        return Err(fail(ShapeError::EmptyPattern, None));
    }

    let input = parse_side(input_tokens, pattern)?;
    let output = parse_side(output_tokens, pattern)?;

    check_side_constraints(&input, pattern)?;
    check_side_constraints(&output, pattern)?;

    Ok(EinopsAst { input, output })
}

fn parse_side(tokens: &[Token], pattern: &str) -> Result<Vec<AxisPattern>, PatternError> {
    let fail = |error: ShapeError, span: Span| PatternError {
        error,
        pattern: pattern.to_string(),
        span: Some(span),
    };

    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i].kind {
            TokenKind::Ident(name) => {
                out.push(AxisPattern::Simple(AxisTerm::Ident(name.clone())));
                i += 1;
            }
            TokenKind::Singleton => {
                out.push(AxisPattern::Simple(AxisTerm::Singleton));
                i += 1;
            }
            TokenKind::Ellipsis => {
                out.push(AxisPattern::Simple(AxisTerm::Ellipsis));
                i += 1;
            }
            TokenKind::LParen => {
                let open_span = tokens[i].span;
                let mut depth = 1;
                let start = i + 1;
                let mut end = start;
                while end < tokens.len() && depth > 0 {
                    match tokens[end].kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => depth -= 1,
                        _ => {}
                    }
                    if depth == 0 {
                        break;
                    }
                    end += 1;
                }
                if depth != 0 {
                    return Err(fail(
                            ShapeError::UnmatchedParen {
                                position: open_span.start,
                            },
                            open_span,
                    ));
                }
                let inner = parse_group(&tokens[start..end], pattern)?;
                out.push(AxisPattern::Composite(inner));
                i = end + 1;
            }
            TokenKind::RParen => {
                let span = tokens[i].span;
                return Err(fail(ShapeError::UnmatchedParen { position: span.start }, span));
            }
            TokenKind::Arrow => unreachable!("split_at already removed the arrow token"),
        }
    }
    Ok(out)
}

fn parse_group(tokens: &[Token], pattern: &str) -> Result<Vec<AxisTerm>, PatternError> {
    let fail = |error: ShapeError, span: Span| PatternError {
        error,
        pattern: pattern.to_string(),
        span: Some(span),
    };

    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match &token.kind {
            TokenKind::Ident(name) => out.push(AxisTerm::Ident(name.clone())),
            TokenKind::Singleton => out.push(AxisTerm::Singleton),
            TokenKind::Ellipsis => {
                return Err(fail(ShapeError::MultipleEllipses, token.span));
            }
            TokenKind::LParen | TokenKind::RParen => {
                return Err(fail(
                        ShapeError::UnmatchedParen {
                            position: token.span.start,
                        },
                        token.span,
                ));
            }
            TokenKind::Arrow => unreachable!(),
        }
    }
    Ok(out)
}

fn check_side_constraints(side: &[AxisPattern], pattern: &str) -> Result<(), PatternError> {
    let fail = |error: ShapeError| PatternError {
        error,
        pattern: pattern.to_string(),
        span: None,
    };

    let mut seen_idents = HashSet::new();
    let mut ellipsis_count = 0;

    for slot in side {
        if slot.is_ellipsis() {
            ellipsis_count += 1;
        }
        for name in slot.identifiers() {
            if !seen_idents.insert(name.to_string()) {
                return Err(fail(ShapeError::DuplicateIdentifier {
                            name: name.to_string(),
                }));
            }
        }
    }

    if ellipsis_count > 1 {
        return Err(fail(ShapeError::MultipleEllipses));
    }

    Ok(())
}

//! Tokenizer for einops patterns (grammar). Emits tokens with
//! position spans; whitespace is consumed as a separator and never itself
//! produces a token, matching the grammar's `side := atom (whitespace
//! atom)*`.

use crate::error::{PatternError, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Singleton,
    Ellipsis,
    LParen,
    RParen,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub fn scan(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '(' {
            tokens.push(Token {
                    kind: TokenKind::LParen,
                    span: Span { start: i, end: i + 1 },
            });
            i += 1;
            continue;
        }

        if c == ')' {
            tokens.push(Token {
                    kind: TokenKind::RParen,
                    span: Span { start: i, end: i + 1 },
            });
            i += 1;
            continue;
        }

        if chars[i..].starts_with(&['-', '>']) {
            tokens.push(Token {
                    kind: TokenKind::Arrow,
                    span: Span { start: i, end: i + 2 },
            });
            i += 2;
            continue;
        }

        if chars[i..].starts_with(&['.', '.', '.']) {
            tokens.push(Token {
                    kind: TokenKind::Ellipsis,
                    span: Span { start: i, end: i + 3 },
            });
            i += 3;
            continue;
        }

        if c == '1' && chars.get(i + 1).map_or(true, |n| !n.is_ascii_digit()) {
            tokens.push(Token {
                    kind: TokenKind::Singleton,
                    span: Span { start: i, end: i + 1 },
            });
            i += 1;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            let mut end = i + 1;
            while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
                end += 1;
            }
            let name: String = chars[start..end].iter().collect();
            tokens.push(Token {
                    kind: TokenKind::Ident(name),
                    span: Span { start, end },
            });
            i = end;
            continue;
        }

        return Err(PatternError {
                error: crate::error::ShapeError::UnexpectedCharacter {
                    character: c,
                    position: i,
                },
                pattern: pattern.to_string(),
                span: Some(Span { start: i, end: i + 1 }),
        });
    }

    Ok(tokens)
}

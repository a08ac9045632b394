//! Token cooking — from low-level tokens to parse tokens.
//!
//! The low-level lexer only knows kinds and lengths. This layer walks
//! its output once, tracking the absolute byte offset and line number,
//! and produces the materialized tokens the grammar consumes: trivia
//! dropped, keywords resolved, integer literals decoded, and malformed
//! literals turned into errors.

use std::fmt;

use amyr_ast::{Location, Span};
use amyr_lexer::unescape::{self, Mode};
use amyr_lexer::{Base, LiteralKind, TokenKind};

use crate::parser::ParseError;

/// A cooked token, carrying everything the grammar needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseToken {
    pub kind: ParseTokenKind,
    /// Line/column of the token's first character.
    pub loc: Location,
    pub span: Span,
}

impl ParseToken {
    pub fn line(&self) -> u32 {
        self.loc.line
    }
}

/// Token kinds at the grammar level.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseTokenKind {
    // Keywords
    Let,
    Mut,

    Ident(String),
    Int(i64),

    // Operators and delimiters
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    Semi,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,

    /// Anything the lexer understood but the grammar has no rule for,
    /// carried through so the parser can point at it.
    Other(String),

    Eof,
}

impl fmt::Display for ParseTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTokenKind::Let => write!(f, "`let`"),
            ParseTokenKind::Mut => write!(f, "`mut`"),
            ParseTokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            ParseTokenKind::Int(value) => write!(f, "integer `{value}`"),
            ParseTokenKind::Plus => write!(f, "`+`"),
            ParseTokenKind::Minus => write!(f, "`-`"),
            ParseTokenKind::Star => write!(f, "`*`"),
            ParseTokenKind::Slash => write!(f, "`/`"),
            ParseTokenKind::Eq => write!(f, "`=`"),
            ParseTokenKind::Semi => write!(f, "`;`"),
            ParseTokenKind::Comma => write!(f, "`,`"),
            ParseTokenKind::LParen => write!(f, "`(`"),
            ParseTokenKind::RParen => write!(f, "`)`"),
            ParseTokenKind::LBrace => write!(f, "`{{`"),
            ParseTokenKind::RBrace => write!(f, "`}}`"),
            ParseTokenKind::Other(text) => write!(f, "`{text}`"),
            ParseTokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// The keyword table. Static and immutable; everything else is an
/// identifier.
fn keyword(text: &str) -> Option<ParseTokenKind> {
    match text {
        "let" => Some(ParseTokenKind::Let),
        "mut" => Some(ParseTokenKind::Mut),
        _ => None,
    }
}

/// Materialize the parse-token list for `source`. Fails on the first
/// token the lexer flagged as malformed.
pub fn cook(source: &str) -> Result<Vec<ParseToken>, ParseError> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line = 1u32;
    // Byte offset where the current line starts, for column numbers.
    let mut line_start = 0usize;

    for token in amyr_lexer::tokenize(source) {
        let len = token.len as usize;
        let text = &source[pos..pos + len];
        let span = Span::new(pos as u32, (pos + len) as u32);
        let loc = Location::new(line, (pos - line_start + 1) as u32);
        line += text.matches('\n').count() as u32;
        if let Some(last_newline) = text.rfind('\n') {
            line_start = pos + last_newline + 1;
        }
        pos += len;

        let kind = match token.kind {
            TokenKind::Whitespace | TokenKind::LineComment { .. } => continue,
            TokenKind::BlockComment {
                terminated: true, ..
            } => continue,
            TokenKind::BlockComment {
                terminated: false, ..
            } => {
                return Err(ParseError::new(loc.line, "Unterminated block comment."));
            }

            TokenKind::Ident => {
                keyword(text).unwrap_or_else(|| ParseTokenKind::Ident(text.to_string()))
            }
            // `r#name` refers to the same binding as `name`.
            TokenKind::RawIdent => ParseTokenKind::Ident(text[2..].to_string()),
            TokenKind::InvalidIdent => {
                return Err(ParseError::new(
                    loc.line,
                    format!("Invalid character in identifier: {text}"),
                ));
            }

            TokenKind::Literal { kind, suffix_start } => {
                cook_literal(text, kind, suffix_start, loc.line)?
            }

            TokenKind::Semi => ParseTokenKind::Semi,
            TokenKind::Comma => ParseTokenKind::Comma,
            TokenKind::OpenParen => ParseTokenKind::LParen,
            TokenKind::CloseParen => ParseTokenKind::RParen,
            TokenKind::OpenBrace => ParseTokenKind::LBrace,
            TokenKind::CloseBrace => ParseTokenKind::RBrace,
            TokenKind::Eq => ParseTokenKind::Eq,
            TokenKind::Plus => ParseTokenKind::Plus,
            TokenKind::Minus => ParseTokenKind::Minus,
            TokenKind::Star => ParseTokenKind::Star,
            TokenKind::Slash => ParseTokenKind::Slash,

            TokenKind::Unknown => {
                return Err(ParseError::new(
                    loc.line,
                    format!("Unexpected character '{text}'."),
                ));
            }

            // Valid tokens with no role in the grammar; the parser
            // reports them in context.
            _ => ParseTokenKind::Other(text.to_string()),
        };

        tokens.push(ParseToken { kind, loc, span });
    }

    tokens.push(ParseToken {
        kind: ParseTokenKind::Eof,
        loc: Location::new(line, (pos - line_start + 1) as u32),
        span: Span::new(pos as u32, pos as u32),
    });
    Ok(tokens)
}

fn cook_literal(
    text: &str,
    kind: LiteralKind,
    suffix_start: u32,
    line: u32,
) -> Result<ParseTokenKind, ParseError> {
    let suffix_start = suffix_start as usize;
    match kind {
        LiteralKind::Int { base, empty_int } => {
            if empty_int {
                return Err(ParseError::new(line, "Missing digits in integer literal."));
            }
            if suffix_start < text.len() {
                return Err(ParseError::new(
                    line,
                    "Integer literal suffixes are not supported.",
                ));
            }
            let digits = match base {
                Base::Decimal => &text[..suffix_start],
                // Skip the `0b`/`0o`/`0x` prefix.
                _ => &text[2..suffix_start],
            };
            let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
            let value = i64::from_str_radix(&cleaned, base as u32)
                .map_err(|_| ParseError::new(line, "Integer literal out of range."))?;
            Ok(ParseTokenKind::Int(value))
        }

        LiteralKind::Float { empty_exponent, .. } => {
            if empty_exponent {
                return Err(ParseError::new(line, "Missing digits in float exponent."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::Char { terminated } => {
            if !terminated {
                return Err(ParseError::new(line, "Unterminated character literal."));
            }
            let body = &text[1..suffix_start - 1];
            if let Err(e) = unescape::unescape_char(body) {
                if e.is_fatal() {
                    return Err(ParseError::new(line, "Invalid character literal."));
                }
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::Str { terminated } => {
            if !terminated {
                return Err(ParseError::new(line, "Unterminated string literal."));
            }
            // The grammar has no string expressions, but escape errors
            // should still surface here rather than downstream.
            let body = &text[1..suffix_start - 1];
            if has_fatal_unicode(body, Mode::Str) {
                return Err(ParseError::new(line, "Invalid escape in string literal."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::Byte { terminated } => {
            if !terminated {
                return Err(ParseError::new(line, "Unterminated byte literal."));
            }
            // Skip the `b'` prefix.
            let body = &text[2..suffix_start - 1];
            if let Err(e) = unescape::unescape_byte(body) {
                if e.is_fatal() {
                    return Err(ParseError::new(line, "Invalid byte literal."));
                }
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::ByteStr { terminated } => {
            if !terminated {
                return Err(ParseError::new(line, "Unterminated byte string literal."));
            }
            let body = &text[2..suffix_start - 1];
            if has_fatal_mixed(body, Mode::ByteStr) {
                return Err(ParseError::new(line, "Invalid byte string literal."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::CStr { terminated } => {
            if !terminated {
                return Err(ParseError::new(line, "Unterminated C string literal."));
            }
            let body = &text[2..suffix_start - 1];
            if has_fatal_mixed(body, Mode::CStr) {
                return Err(ParseError::new(line, "Invalid C string literal."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::RawStr { n_hashes } => {
            let Some(n) = n_hashes else {
                return Err(ParseError::new(line, "Invalid raw string literal."));
            };
            let body = raw_body(text, 1, n, suffix_start);
            if has_fatal_unicode(body, Mode::RawStr) {
                return Err(ParseError::new(line, "Invalid raw string literal."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::RawByteStr { n_hashes } => {
            let Some(n) = n_hashes else {
                return Err(ParseError::new(line, "Invalid raw byte string literal."));
            };
            let body = raw_body(text, 2, n, suffix_start);
            if has_fatal_mixed(body, Mode::RawByteStr) {
                return Err(ParseError::new(line, "Invalid raw byte string literal."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }

        LiteralKind::RawCStr { n_hashes } => {
            let Some(n) = n_hashes else {
                return Err(ParseError::new(line, "Invalid raw C string literal."));
            };
            let body = raw_body(text, 2, n, suffix_start);
            if has_fatal_mixed(body, Mode::RawCStr) {
                return Err(ParseError::new(line, "Invalid raw C string literal."));
            }
            Ok(ParseTokenKind::Other(text.to_string()))
        }
    }
}

/// The body of a raw literal: past the `r`/`br`/`cr` prefix, the
/// opening hashes and quote, and before the closing quote and hashes.
fn raw_body(text: &str, prefix_len: usize, n_hashes: u8, suffix_start: usize) -> &str {
    let n = n_hashes as usize;
    &text[prefix_len + n + 1..suffix_start - n - 1]
}

/// Does the body produce any fatal error in a single-code-point mode?
fn has_fatal_unicode(body: &str, mode: Mode) -> bool {
    let mut fatal = false;
    unescape::unescape_unicode(body, mode, &mut |_, res| {
        if let Err(e) = res {
            fatal |= e.is_fatal();
        }
    });
    fatal
}

/// Does the body produce any fatal error in a mixed char/byte mode?
fn has_fatal_mixed(body: &str, mode: Mode) -> bool {
    let mut fatal = false;
    unescape::unescape_mixed(body, mode, &mut |_, res| {
        if let Err(e) = res {
            fatal |= e.is_fatal();
        }
    });
    fatal
}

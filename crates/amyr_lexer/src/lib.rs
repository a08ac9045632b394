//! Amayori low-level lexer.
//!
//! This crate separates pure lexing from the rest of the front-end: it
//! operates directly on `&str`, produces simple tokens that are a pair
//! of kind and byte length, and never reports errors — malformed input
//! is encoded as flags on the token kind so that higher layers can
//! recover diagnostics from it.
//!
//! Tokens out of this crate are not yet ready for parsing; the parser
//! cooks them into its own richer token type, resolving keywords and
//! literal values along the way.

pub mod cursor;
pub mod unescape;

mod lexer;
mod token;



pub use cursor::{Cursor, EOF_CHAR};
pub use lexer::{is_id_continue, is_id_start, is_ident, is_whitespace, scan_guarded_string};
pub use token::{Base, DocStyle, GuardedStr, LiteralKind, RawStrError, Token, TokenKind};

/// Tokenize the input lazily. The iterator yields every token up to,
/// but not including, `Eof`, and the token lengths sum to
/// `input.len()`.
pub fn tokenize(input: &str) -> impl Iterator<Item = Token> + '_ {
    let mut cursor = Cursor::new(input);
    std::iter::from_fn(move || {
        let token = cursor.advance_token();
        if token.kind != TokenKind::Eof {
            Some(token)
        } else {
            None
        }
    })
}

/// If the input begins with a shebang line, return its length so the
/// caller can strip it before tokenizing.
///
/// A leading `#![attribute]` is valid syntax, not a shebang, so the
/// line only counts when the first significant token after `#!` is not
/// an opening bracket.
pub fn strip_shebang(input: &str) -> Option<usize> {
    let input_tail = input.strip_prefix("#!")?;
    let next_significant = tokenize(input_tail).map(|tok| tok.kind).find(|kind| {
        !matches!(
            kind,
            TokenKind::Whitespace
                | TokenKind::LineComment { doc_style: None }
                | TokenKind::BlockComment {
                    doc_style: None,
                    ..
                }
        )
    });
    if next_significant != Some(TokenKind::OpenBracket) {
        // The newline itself is kept so line numbers stay correct.
        Some(2 + input_tail.lines().next().unwrap_or_default().len())
    } else {
        None
    }
}

/// Re-scan a raw string literal whose token reported `n_hashes: None`
/// and say precisely what was wrong with it. `prefix_len` is 1 for `r`
/// and 2 for `br`/`cr`.
pub fn validate_raw_string(input: &str, prefix_len: u32) -> Result<(), RawStrError> {
    debug_assert!(!input.is_empty());
    let mut cursor = Cursor::new(input);
    // Move past the leading `r` or `br`/`cr`.
    for _ in 0..prefix_len {
        if cursor.bump().is_none() {
            return Err(RawStrError::NoTerminator {
                expected: 0,
                found: 0,
                possible_terminator_offset: None,
            });
        }
    }
    cursor.raw_double_quoted_string(prefix_len).map(|_| ())
}

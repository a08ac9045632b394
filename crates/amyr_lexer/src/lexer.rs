//! The tokenizing state machine.
//!
//! One token per call to [`Cursor::advance_token`]: the first consumed
//! character selects a branch, the branch eats the rest of the token,
//! and the cursor's consumed-count becomes the token length. Errors
//! never abort the scan — they are encoded in the token kind.

use unicode_properties::UnicodeEmoji;
use unicode_xid::UnicodeXID;

use crate::cursor::{Cursor, EOF_CHAR};
use crate::token::{
    Base, DocStyle, GuardedStr, LiteralKind, RawStrError, Token, TokenKind,
};

/// True for the fixed set of characters the language treats as
/// whitespace. Deliberately a whitelist, not `char::is_whitespace`.
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        // ASCII
        '\u{0009}'   // \t
        | '\u{000A}' // \n
        | '\u{000B}' // vertical tab
        | '\u{000C}' // form feed
        | '\u{000D}' // \r
        | '\u{0020}' // space

        // NEXT LINE from latin1
        | '\u{0085}'

        // Bidi markers
        | '\u{200E}' // LEFT-TO-RIGHT MARK
        | '\u{200F}' // RIGHT-TO-LEFT MARK

        // Dedicated whitespace characters from Unicode
        | '\u{2028}' // LINE SEPARATOR
        | '\u{2029}' // PARAGRAPH SEPARATOR
    )
}

/// Can `c` begin an identifier? (XID_Start, plus `_`.)
pub fn is_id_start(c: char) -> bool {
    c == '_' || c.is_xid_start()
}

/// Can `c` continue an identifier? (XID_Continue.)
pub fn is_id_continue(c: char) -> bool {
    c.is_xid_continue()
}

/// Is `string` a single valid identifier?
pub fn is_ident(string: &str) -> bool {
    let mut chars = string.chars();
    match chars.next() {
        Some(start) => is_id_start(start) && chars.all(is_id_continue),
        None => false,
    }
}

impl Cursor<'_> {
    /// Lex the token starting at the cursor. At end of input returns
    /// `Eof` with length 0.
    pub fn advance_token(&mut self) -> Token {
        let first_char = match self.bump() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, 0),
        };

        let token_kind = match first_char {
            '/' => match self.first() {
                '/' => self.line_comment(),
                '*' => self.block_comment(),
                _ => TokenKind::Slash,
            },

            c if is_whitespace(c) => self.whitespace(),

            // `r` may open a raw identifier or a raw string, otherwise
            // it is an ordinary identifier start.
            'r' => match (self.first(), self.second()) {
                ('#', c1) if is_id_start(c1) => self.raw_ident(),
                ('#', _) | ('"', _) => {
                    let res = self.raw_double_quoted_string(1);
                    let suffix_start = self.pos_within_token();
                    if res.is_ok() {
                        self.eat_literal_suffix();
                    }
                    let kind = LiteralKind::RawStr { n_hashes: res.ok() };
                    TokenKind::Literal { kind, suffix_start }
                }
                _ => self.ident_or_unknown_prefix(),
            },

            'b' => self.c_or_byte_string(
                |terminated| LiteralKind::ByteStr { terminated },
                |n_hashes| LiteralKind::RawByteStr { n_hashes },
                Some(|terminated| LiteralKind::Byte { terminated }),
            ),

            'c' => self.c_or_byte_string(
                |terminated| LiteralKind::CStr { terminated },
                |n_hashes| LiteralKind::RawCStr { n_hashes },
                None,
            ),

            c if is_id_start(c) => self.ident_or_unknown_prefix(),

            c @ '0'..='9' => {
                let literal_kind = self.number(c);
                let suffix_start = self.pos_within_token();
                self.eat_literal_suffix();
                TokenKind::Literal {
                    kind: literal_kind,
                    suffix_start,
                }
            }

            '\'' => self.lifetime_or_char(),

            '"' => {
                let terminated = self.double_quoted_string();
                let suffix_start = self.pos_within_token();
                if terminated {
                    self.eat_literal_suffix();
                }
                let kind = LiteralKind::Str { terminated };
                TokenKind::Literal { kind, suffix_start }
            }

            // Guarded string prefix, reserved syntax: `#"` or `##`.
            '#' if matches!(self.first(), '"' | '#') => {
                self.bump();
                TokenKind::GuardedStrPrefix
            }

            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '@' => TokenKind::At,
            '#' => TokenKind::Pound,
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '$' => TokenKind::Dollar,
            '=' => TokenKind::Eq,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '-' => TokenKind::Minus,
            '&' => TokenKind::And,
            '|' => TokenKind::Or,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '^' => TokenKind::Caret,
            '%' => TokenKind::Percent,

            c if !c.is_ascii() && c.is_emoji_char() => self.invalid_ident(),

            _ => TokenKind::Unknown,
        };

        let token = Token::new(token_kind, self.pos_within_token());
        self.reset_pos_within_token();
        token
    }

    fn line_comment(&mut self) -> TokenKind {
        debug_assert!(self.prev() == '/' && self.first() == '/');
        self.bump();

        let doc_style = match self.first() {
            // `//!` documents the enclosing item.
            '!' => Some(DocStyle::Inner),
            // `///` documents the next item, but `////` is plain.
            '/' if self.second() != '/' => Some(DocStyle::Outer),
            _ => None,
        };

        self.eat_while(|c| c != '\n');
        TokenKind::LineComment { doc_style }
    }

    fn block_comment(&mut self) -> TokenKind {
        debug_assert!(self.prev() == '/' && self.first() == '*');
        self.bump();

        let doc_style = match self.first() {
            // `/*!` documents the enclosing item.
            '!' => Some(DocStyle::Inner),
            // `/**` documents the next item; `/***` and `/**/` do not.
            '*' if !matches!(self.second(), '*' | '/') => Some(DocStyle::Outer),
            _ => None,
        };

        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '/' if self.first() == '*' => {
                    self.bump();
                    depth += 1;
                }
                '*' if self.first() == '/' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => (),
            }
        }

        TokenKind::BlockComment {
            doc_style,
            terminated: depth == 0,
        }
    }

    fn whitespace(&mut self) -> TokenKind {
        debug_assert!(is_whitespace(self.prev()));
        self.eat_while(is_whitespace);
        TokenKind::Whitespace
    }

    fn raw_ident(&mut self) -> TokenKind {
        debug_assert!(
            self.prev() == 'r' && self.first() == '#' && is_id_start(self.second())
        );
        // Eat `#` and the identifier.
        self.bump();
        self.eat_identifier();
        TokenKind::RawIdent
    }

    fn ident_or_unknown_prefix(&mut self) -> TokenKind {
        debug_assert!(is_id_start(self.prev()));
        self.eat_while(is_id_continue);

        match self.first() {
            // An identifier glued to `#`, `'` or `"` is a reserved
            // literal prefix; the separator is lexed on its own.
            '#' | '"' | '\'' => TokenKind::UnknownPrefix,
            c if !c.is_ascii() && c.is_emoji_char() => self.invalid_ident(),
            _ => TokenKind::Ident,
        }
    }

    fn invalid_ident(&mut self) -> TokenKind {
        // Keep emoji sequences together so recovery sees one bad
        // identifier instead of a spray of Unknown tokens.
        self.eat_while(|c| {
            const ZERO_WIDTH_JOINER: char = '\u{200d}';
            is_id_continue(c) || (!c.is_ascii() && c.is_emoji_char()) || c == ZERO_WIDTH_JOINER
        });
        TokenKind::InvalidIdent
    }

    fn c_or_byte_string(
        &mut self,
        mk_kind: fn(bool) -> LiteralKind,
        mk_kind_raw: fn(Option<u8>) -> LiteralKind,
        single_quoted: Option<fn(bool) -> LiteralKind>,
    ) -> TokenKind {
        match (self.first(), self.second(), single_quoted) {
            ('\'', _, Some(single_quoted)) => {
                self.bump();
                let terminated = self.single_quoted_string();
                let suffix_start = self.pos_within_token();
                if terminated {
                    self.eat_literal_suffix();
                }
                TokenKind::Literal {
                    kind: single_quoted(terminated),
                    suffix_start,
                }
            }
            ('"', _, _) => {
                self.bump();
                let terminated = self.double_quoted_string();
                let suffix_start = self.pos_within_token();
                if terminated {
                    self.eat_literal_suffix();
                }
                TokenKind::Literal {
                    kind: mk_kind(terminated),
                    suffix_start,
                }
            }
            ('r', '"', _) | ('r', '#', _) => {
                self.bump();
                let res = self.raw_double_quoted_string(2);
                let suffix_start = self.pos_within_token();
                if res.is_ok() {
                    self.eat_literal_suffix();
                }
                TokenKind::Literal {
                    kind: mk_kind_raw(res.ok()),
                    suffix_start,
                }
            }
            _ => self.ident_or_unknown_prefix(),
        }
    }

    fn number(&mut self, first_digit: char) -> LiteralKind {
        debug_assert!('0' <= self.prev() && self.prev() <= '9');
        let mut base = Base::Decimal;

        if first_digit == '0' {
            // Possible base prefix.
            match self.first() {
                'b' => {
                    base = Base::Binary;
                    self.bump();
                    if !self.eat_decimal_digits() {
                        return LiteralKind::Int { base, empty_int: true };
                    }
                }
                'o' => {
                    base = Base::Octal;
                    self.bump();
                    if !self.eat_decimal_digits() {
                        return LiteralKind::Int { base, empty_int: true };
                    }
                }
                'x' => {
                    base = Base::Hexadecimal;
                    self.bump();
                    if !self.eat_hexadecimal_digits() {
                        return LiteralKind::Int { base, empty_int: true };
                    }
                }
                // `0` followed by more digits or separators.
                '0'..='9' | '_' => {
                    self.eat_decimal_digits();
                }
                // `0.`, `0e`: handled by the float logic below.
                '.' | 'e' | 'E' => {}
                // Just `0`.
                _ => return LiteralKind::Int { base, empty_int: false },
            }
        } else {
            self.eat_decimal_digits();
        }

        match self.first() {
            // `1.2` is a float; `1..2` is a range and `1.foo()` is a
            // method call, so the dot only counts when what follows can
            // not start another token on its own.
            '.' if self.second() != '.' && !is_id_start(self.second()) => {
                self.bump();
                let mut empty_exponent = false;
                if self.first().is_ascii_digit() {
                    self.eat_decimal_digits();
                    match self.first() {
                        'e' | 'E' => {
                            self.bump();
                            empty_exponent = !self.eat_float_exponent();
                        }
                        _ => (),
                    }
                }
                LiteralKind::Float {
                    base,
                    empty_exponent,
                }
            }
            'e' | 'E' => {
                self.bump();
                let empty_exponent = !self.eat_float_exponent();
                LiteralKind::Float {
                    base,
                    empty_exponent,
                }
            }
            _ => LiteralKind::Int {
                base,
                empty_int: false,
            },
        }
    }

    fn lifetime_or_char(&mut self) -> TokenKind {
        debug_assert!(self.prev() == '\'');

        let can_be_a_lifetime = if self.second() == '\'' {
            // Something like `'a'` — a char, never a lifetime.
            false
        } else {
            is_id_start(self.first()) || self.first().is_ascii_digit()
        };

        if !can_be_a_lifetime {
            let terminated = self.single_quoted_string();
            let suffix_start = self.pos_within_token();
            if terminated {
                self.eat_literal_suffix();
            }
            let kind = LiteralKind::Char { terminated };
            return TokenKind::Literal { kind, suffix_start };
        }

        // `'r#lt` is a raw lifetime.
        if self.first() == 'r' && self.second() == '#' && is_id_start(self.third()) {
            self.bump();
            self.bump();
            self.eat_while(is_id_continue);
            return TokenKind::RawLifetime;
        }

        let starts_with_number = self.first().is_ascii_digit();

        // Eat the name. A closing quote afterwards turns the whole
        // thing back into a (multi-character) char literal.
        self.bump();
        self.eat_while(is_id_continue);

        match self.first() {
            '\'' => {
                self.bump();
                let kind = LiteralKind::Char { terminated: true };
                TokenKind::Literal {
                    kind,
                    suffix_start: self.pos_within_token(),
                }
            }
            '#' if !starts_with_number => TokenKind::UnknownPrefixLifetime,
            _ => TokenKind::Lifetime { starts_with_number },
        }
    }

    fn single_quoted_string(&mut self) -> bool {
        debug_assert!(self.prev() == '\'');
        // Fast path for `'a'`.
        if self.second() == '\'' && self.first() != '\\' {
            self.bump();
            self.bump();
            return true;
        }

        // Too long or malformed; scan for the close quote.
        loop {
            match self.first() {
                '\'' => {
                    self.bump();
                    return true;
                }
                // Likely the start of a comment — give up so the
                // comment still lexes.
                '/' => break,
                '\n' if self.second() != '\'' => break,
                EOF_CHAR if self.is_eof() => break,
                '\\' => {
                    // Whatever is escaped is never the closing quote.
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
        false
    }

    /// Eat a double-quoted string, returning whether it was terminated.
    fn double_quoted_string(&mut self) -> bool {
        debug_assert!(self.prev() == '"');
        while let Some(c) = self.bump() {
            match c {
                '"' => return true,
                '\\' if self.first() == '\\' || self.first() == '"' => {
                    // Skip the escaped character.
                    self.bump();
                }
                _ => (),
            }
        }
        // End of input.
        false
    }

    /// Eat a raw string and report how many `#`s delimit it.
    /// `prefix_len` is 1 for `r` and 2 for `br`/`cr`.
    pub(crate) fn raw_double_quoted_string(&mut self, prefix_len: u32) -> Result<u8, RawStrError> {
        let n_hashes = self.raw_string_unvalidated(prefix_len)?;
        // Only up to 255 `#`s are allowed.
        match u8::try_from(n_hashes) {
            Ok(n) => Ok(n),
            Err(_) => Err(RawStrError::TooManyDelimiters { found: n_hashes }),
        }
    }

    fn raw_string_unvalidated(&mut self, prefix_len: u32) -> Result<u32, RawStrError> {
        debug_assert!(self.prev() == 'r');
        let start_pos = self.pos_within_token();
        let mut possible_terminator_offset = None;
        let mut max_hashes = 0;

        let mut eaten = 0;
        while self.first() == '#' {
            eaten += 1;
            self.bump();
        }
        let n_start_hashes = eaten;

        match self.bump() {
            Some('"') => (),
            c => {
                let c = c.unwrap_or(EOF_CHAR);
                return Err(RawStrError::InvalidStarter { bad_char: c });
            }
        }

        // Skip the body and look for a closing quote with enough
        // hashes after it.
        loop {
            self.eat_while(|c| c != '"');

            if self.is_eof() {
                return Err(RawStrError::NoTerminator {
                    expected: n_start_hashes,
                    found: max_hashes,
                    possible_terminator_offset,
                });
            }

            // Eat the closing quote candidate.
            self.bump();

            let mut n_end_hashes = 0;
            while self.first() == '#' && n_end_hashes < n_start_hashes {
                n_end_hashes += 1;
                self.bump();
            }

            if n_end_hashes == n_start_hashes {
                return Ok(n_start_hashes);
            } else if n_end_hashes > max_hashes {
                // Remember the best near-miss for diagnostics.
                possible_terminator_offset =
                    Some(self.pos_within_token() - start_pos - n_end_hashes + 1);
                max_hashes = n_end_hashes;
            }
        }
    }

    /// Eat digits and `_` separators. Returns true if at least one
    /// actual digit was seen.
    fn eat_decimal_digits(&mut self) -> bool {
        let mut has_digits = false;
        loop {
            match self.first() {
                '_' => {
                    self.bump();
                }
                '0'..='9' => {
                    has_digits = true;
                    self.bump();
                }
                _ => break,
            }
        }
        has_digits
    }

    fn eat_hexadecimal_digits(&mut self) -> bool {
        let mut has_digits = false;
        loop {
            match self.first() {
                '_' => {
                    self.bump();
                }
                '0'..='9' | 'a'..='f' | 'A'..='F' => {
                    has_digits = true;
                    self.bump();
                }
                _ => break,
            }
        }
        has_digits
    }

    /// Eat the exponent after `e`/`E`. Returns true if it had digits.
    fn eat_float_exponent(&mut self) -> bool {
        debug_assert!(self.prev() == 'e' || self.prev() == 'E');
        if self.first() == '-' || self.first() == '+' {
            self.bump();
        }
        self.eat_decimal_digits()
    }

    /// Eat the identifier suffix of a literal, e.g. the `u8` in `1u8`.
    fn eat_literal_suffix(&mut self) {
        self.eat_identifier();
    }

    /// Eat one identifier if the cursor is at its start.
    fn eat_identifier(&mut self) {
        if !is_id_start(self.first()) {
            return;
        }
        self.bump();
        self.eat_while(is_id_continue);
    }
}

/// Scan a guarded string literal `#"…"#` starting at `input`. Unlike a
/// raw string, surplus trailing `#`s are left unconsumed so older
/// editions can re-lex them as separate tokens.
pub fn scan_guarded_string(input: &str) -> GuardedStr {
    let mut cursor = Cursor::new(input);

    let mut n_hashes: u32 = 0;
    while cursor.first() == '#' {
        n_hashes += 1;
        cursor.bump();
    }

    let terminated = if cursor.first() == '"' {
        cursor.bump();
        loop {
            cursor.eat_while(|c| c != '"');
            if cursor.is_eof() {
                break false;
            }
            cursor.bump();

            let mut n_end_hashes = 0;
            while cursor.first() == '#' && n_end_hashes < n_hashes {
                n_end_hashes += 1;
                cursor.bump();
            }
            if n_end_hashes == n_hashes {
                break true;
            }
        }
    } else {
        false
    };

    GuardedStr {
        n_hashes,
        terminated,
        token_len: cursor.pos_within_token(),
    }
}

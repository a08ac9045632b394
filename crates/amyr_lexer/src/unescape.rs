//! Validation and decoding of char and string literal bodies.
//!
//! Given the text between a literal's quotes, these routines produce
//! the decoded units one at a time through a callback, pairing each
//! with the byte range it came from. A malformed escape reports an
//! error for that unit and decoding continues, so one bad escape does
//! not hide the rest. Two of the error variants are mere warnings; see
//! [`EscapeError::is_fatal`].

use std::ops::Range;
use std::str::Chars;

/// Errors and warnings that can occur while decoding a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeError {
    /// Expected 1 char, found 0, e.g. `''`.
    ZeroChars,
    /// Expected 1 char, found more, e.g. `'ab'`.
    MoreThanOneChar,

    /// `\` at the end of the literal.
    LoneSlash,
    /// Unknown escape, e.g. `\z`.
    InvalidEscape,
    /// Raw `\r` outside a CRLF pair.
    BareCarriageReturn,
    /// Raw `\r` in a raw string.
    BareCarriageReturnInRawString,
    /// A character that must be escaped appeared raw, e.g. `'` in a
    /// char literal.
    EscapeOnlyChar,

    /// `\x` with fewer than two digits, e.g. `\x1`.
    TooShortHexEscape,
    /// Non-hex character in `\x`, e.g. `\xz`.
    InvalidCharInHexEscape,
    /// `\x` value above 0x7F where only ASCII is allowed.
    OutOfRangeHexEscape,

    /// `\u` not followed by `{`.
    NoBraceInUnicodeEscape,
    /// Non-hex character inside `\u{..}`.
    InvalidCharInUnicodeEscape,
    /// `\u{}`.
    EmptyUnicodeEscape,
    /// Missing `}`, e.g. `\u{12`.
    UnclosedUnicodeEscape,
    /// `\u{_12}`.
    LeadingUnderscoreUnicodeEscape,
    /// More than six digits, e.g. `\u{10FFFF_FF}`.
    OverlongUnicodeEscape,
    /// A surrogate code point, e.g. `\u{DFFF}`.
    LoneSurrogateUnicodeEscape,
    /// A value above 0x10FFFF, e.g. `\u{FFFFFF}`.
    OutOfRangeUnicodeEscape,

    /// `\u` escape in a byte literal.
    UnicodeEscapeInByte,
    /// Non-ASCII character in a byte or byte-string literal.
    NonAsciiCharInByte,

    /// NUL, written or escaped, in a C string literal.
    NulInCStr,

    /// After `\` + newline, the next line starts with whitespace that
    /// was not skipped.
    UnskippedWhitespaceWarning,
    /// `\` + newline skipped more than one line.
    MultipleSkippedLinesWarning,
}

impl EscapeError {
    /// Everything except the two warning variants aborts the literal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            EscapeError::UnskippedWhitespaceWarning
                | EscapeError::MultipleSkippedLinesWarning
        )
    }
}

/// Which literal form is being decoded. The mode decides which escapes
/// exist and which code points are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Char,
    Byte,

    Str,
    RawStr,

    ByteStr,
    RawByteStr,

    CStr,
    RawCStr,
}

impl Mode {
    pub fn in_double_quotes(self) -> bool {
        match self {
            Mode::Char | Mode::Byte => false,
            Mode::Str
            | Mode::RawStr
            | Mode::ByteStr
            | Mode::RawByteStr
            | Mode::CStr
            | Mode::RawCStr => true,
        }
    }

    /// Are `\x80`..`\xFF` allowed?
    fn allow_high_bytes(self) -> bool {
        match self {
            Mode::Char | Mode::Str => false,
            Mode::Byte | Mode::ByteStr | Mode::CStr => true,
            Mode::RawStr | Mode::RawByteStr | Mode::RawCStr => {
                unreachable!("raw strings do not have escapes")
            }
        }
    }

    /// Are non-ASCII characters allowed?
    #[inline]
    fn allow_unicode_chars(self) -> bool {
        !matches!(self, Mode::Byte | Mode::ByteStr | Mode::RawByteStr)
    }

    /// Are `\u` escapes allowed?
    fn allow_unicode_escapes(self) -> bool {
        match self {
            Mode::Byte | Mode::ByteStr => false,
            Mode::Char | Mode::Str | Mode::CStr => true,
            Mode::RawStr | Mode::RawByteStr | Mode::RawCStr => {
                unreachable!("raw strings do not have escapes")
            }
        }
    }

    /// The literal prefix minus any `r`, for diagnostics.
    pub fn prefix_noraw(self) -> &'static str {
        match self {
            Mode::Char | Mode::Str | Mode::RawStr => "",
            Mode::Byte | Mode::ByteStr | Mode::RawByteStr => "b",
            Mode::CStr | Mode::RawCStr => "c",
        }
    }
}

/// One decoded unit of a C string: either a genuine character or a
/// high byte written via `\x80`..`\xFF`.
///
/// A `'¥'` in the source becomes `Char('¥')` and lands in the output
/// as its UTF-8 bytes; `\xa5` becomes `HighByte(0xa5)` and lands as
/// that single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixedUnit {
    Char(char),
    HighByte(u8),
}

impl From<char> for MixedUnit {
    fn from(c: char) -> Self {
        MixedUnit::Char(c)
    }
}

impl From<u8> for MixedUnit {
    fn from(n: u8) -> Self {
        if n.is_ascii() {
            MixedUnit::Char(n as char)
        } else {
            MixedUnit::HighByte(n)
        }
    }
}

/// Decode the body of a char literal.
pub fn unescape_char(src: &str) -> Result<char, EscapeError> {
    unescape_char_or_byte(&mut src.chars(), Mode::Char)
}

/// Decode the body of a byte literal.
pub fn unescape_byte(src: &str) -> Result<u8, EscapeError> {
    unescape_char_or_byte(&mut src.chars(), Mode::Byte).map(byte_from_char)
}

/// Decode the body of a literal whose units are single code points:
/// `Char`, `Byte`, `Str` and `RawStr` modes. The callback receives the
/// source byte range of each unit together with the decoded character
/// or the error.
pub fn unescape_unicode<F>(src: &str, mode: Mode, callback: &mut F)
where
    F: FnMut(Range<usize>, Result<char, EscapeError>),
{
    match mode {
        Mode::Char | Mode::Byte => {
            let mut chars = src.chars();
            let res = unescape_char_or_byte(&mut chars, mode);
            callback(0..(src.len() - chars.as_str().len()), res);
        }
        Mode::Str => unescape_non_raw_common(src, mode, callback),
        Mode::RawStr => check_raw_common(src, mode, callback),
        Mode::ByteStr | Mode::RawByteStr | Mode::CStr | Mode::RawCStr => {
            unreachable!("byte and C strings mix chars and bytes, use `unescape_mixed`")
        }
    }
}

/// Decode the body of a byte or C string literal, whose units mix
/// characters and high bytes: `ByteStr`, `RawByteStr`, `CStr` and
/// `RawCStr` modes. A `\xFF`-style high byte stays a single byte here
/// instead of widening into a two-byte UTF-8 character.
pub fn unescape_mixed<F>(src: &str, mode: Mode, callback: &mut F)
where
    F: FnMut(Range<usize>, Result<MixedUnit, EscapeError>),
{
    match mode {
        Mode::ByteStr => unescape_non_raw_common(src, mode, callback),
        Mode::CStr => unescape_non_raw_common(src, mode, &mut |range, mut result| {
            if let Ok(MixedUnit::Char('\0')) = result {
                result = Err(EscapeError::NulInCStr);
            }
            callback(range, result)
        }),
        // Raw bodies have no escapes, so every unit is a character,
        // but the content checks still apply.
        Mode::RawByteStr => check_raw_common(src, mode, &mut |range, result| {
            callback(range, result.map(MixedUnit::Char))
        }),
        Mode::RawCStr => check_raw_common(src, mode, &mut |range, mut result| {
            if let Ok('\0') = result {
                result = Err(EscapeError::NulInCStr);
            }
            callback(range, result.map(MixedUnit::Char))
        }),
        Mode::Char | Mode::Byte | Mode::Str | Mode::RawStr => {
            unreachable!("single-code-point literals go through `unescape_unicode`")
        }
    }
}

fn byte_from_char(c: char) -> u8 {
    let res = c as u32;
    debug_assert!(res <= u8::MAX as u32, "guaranteed because of Mode::Byte");
    res as u8
}

fn scan_escape<T: From<char> + From<u8>>(
    chars: &mut Chars<'_>,
    mode: Mode,
) -> Result<T, EscapeError> {
    // Previous character was '\\', decide what to do with the next one.
    let res: char = match chars.next().ok_or(EscapeError::LoneSlash)? {
        '"' => '"',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '\\' => '\\',
        '\'' => '\'',
        '0' => '\0',
        'x' => {
            let hi = chars.next().ok_or(EscapeError::TooShortHexEscape)?;
            let hi = hi.to_digit(16).ok_or(EscapeError::InvalidCharInHexEscape)?;

            let lo = chars.next().ok_or(EscapeError::TooShortHexEscape)?;
            let lo = lo.to_digit(16).ok_or(EscapeError::InvalidCharInHexEscape)?;

            let value = (hi * 16 + lo) as u8;

            return if !mode.allow_high_bytes() && !value.is_ascii() {
                Err(EscapeError::OutOfRangeHexEscape)
            } else {
                Ok(T::from(value))
            };
        }
        'u' => return scan_unicode(chars, mode.allow_unicode_escapes()).map(T::from),
        _ => return Err(EscapeError::InvalidEscape),
    };
    Ok(T::from(res))
}

fn scan_unicode(
    chars: &mut Chars<'_>,
    allow_unicode_escapes: bool,
) -> Result<char, EscapeError> {
    if chars.next() != Some('{') {
        return Err(EscapeError::NoBraceInUnicodeEscape);
    }

    // First character must be a hexadecimal digit.
    let mut n_digits = 1;
    let mut value: u32 = match chars.next().ok_or(EscapeError::UnclosedUnicodeEscape)? {
        '_' => return Err(EscapeError::LeadingUnderscoreUnicodeEscape),
        '}' => return Err(EscapeError::EmptyUnicodeEscape),
        c => c
            .to_digit(16)
            .ok_or(EscapeError::InvalidCharInUnicodeEscape)?,
    };

    // Subsequent characters: hexadecimal digits, `_` separators, or the
    // closing brace.
    loop {
        match chars.next() {
            None => return Err(EscapeError::UnclosedUnicodeEscape),
            Some('_') => continue,
            Some('}') => {
                if n_digits > 6 {
                    return Err(EscapeError::OverlongUnicodeEscape);
                }

                // The resolved value must exist and must be allowed in
                // this mode.
                if !allow_unicode_escapes {
                    return Err(EscapeError::UnicodeEscapeInByte);
                }

                break std::char::from_u32(value).ok_or({
                    if value > 0x10FFFF {
                        EscapeError::OutOfRangeUnicodeEscape
                    } else {
                        EscapeError::LoneSurrogateUnicodeEscape
                    }
                });
            }
            Some(c) => {
                let digit: u32 = c
                    .to_digit(16)
                    .ok_or(EscapeError::InvalidCharInUnicodeEscape)?;
                n_digits += 1;
                if n_digits > 6 {
                    // Stop accumulating, the escape is already invalid.
                    continue;
                }
                value = value * 16 + digit;
            }
        }
    }
}

#[inline]
fn ascii_check(c: char, allow_unicode_chars: bool) -> Result<char, EscapeError> {
    if allow_unicode_chars || c.is_ascii() {
        Ok(c)
    } else {
        Err(EscapeError::NonAsciiCharInByte)
    }
}

fn unescape_char_or_byte(chars: &mut Chars<'_>, mode: Mode) -> Result<char, EscapeError> {
    let c = chars.next().ok_or(EscapeError::ZeroChars)?;
    let res = match c {
        '\\' => scan_escape(chars, mode),
        '\n' | '\t' | '\'' => Err(EscapeError::EscapeOnlyChar),
        '\r' => Err(EscapeError::BareCarriageReturn),
        _ => ascii_check(c, mode.allow_unicode_chars()),
    }?;
    if chars.next().is_some() {
        return Err(EscapeError::MoreThanOneChar);
    }
    Ok(res)
}

/// Shared worker for double-quoted, escape-processing literals.
fn unescape_non_raw_common<F, T: From<char> + From<u8>>(src: &str, mode: Mode, callback: &mut F)
where
    F: FnMut(Range<usize>, Result<T, EscapeError>),
{
    let mut chars = src.chars();
    let allow_unicode_chars = mode.allow_unicode_chars();

    // The `start` and `end` computations are byte offsets into `src`,
    // derived from how much of the iterator is left.
    while let Some(c) = chars.next() {
        let start = src.len() - chars.as_str().len() - c.len_utf8();
        let res = match c {
            '\\' => {
                match chars.clone().next() {
                    Some('\n') => {
                        // `\` at the end of a line elides the newline
                        // and any leading whitespace on the next line.
                        skip_ascii_whitespace(&mut chars, start, &mut |range, err| {
                            callback(range, Err(err))
                        });
                        continue;
                    }
                    _ => scan_escape::<T>(&mut chars, mode),
                }
            }
            '"' => Err(EscapeError::EscapeOnlyChar),
            // A `\r` is only legal as part of a CRLF pair.
            '\r' if chars.clone().next() != Some('\n') => {
                Err(EscapeError::BareCarriageReturn)
            }
            _ => ascii_check(c, allow_unicode_chars).map(T::from),
        };
        let end = src.len() - chars.as_str().len();
        callback(start..end, res);
    }
}

fn skip_ascii_whitespace<F>(chars: &mut Chars<'_>, start: usize, callback: &mut F)
where
    F: FnMut(Range<usize>, EscapeError),
{
    let tail = chars.as_str();
    let first_non_space = tail
        .bytes()
        .position(|b| b != b' ' && b != b'\t' && b != b'\n' && b != b'\r')
        .unwrap_or(tail.len());
    if tail[1..first_non_space].contains('\n') {
        // Skipped past a second newline. The +1 accounts for the
        // escaping slash.
        let end = start + first_non_space + 1;
        callback(start..end, EscapeError::MultipleSkippedLinesWarning);
    }
    let tail = &tail[first_non_space..];
    if let Some(c) = tail.chars().next() {
        if c.is_whitespace() {
            // Only ASCII whitespace is skipped; anything else stays,
            // which is probably not what the author meant.
            let end = start + first_non_space + c.len_utf8() + 1;
            callback(start..end, EscapeError::UnskippedWhitespaceWarning);
        }
    }
    *chars = tail.chars();
}

/// Worker for raw literals: no escapes to decode, but bare `\r` and,
/// in byte mode, non-ASCII characters still have to be rejected.
fn check_raw_common<F>(src: &str, mode: Mode, callback: &mut F)
where
    F: FnMut(Range<usize>, Result<char, EscapeError>),
{
    let mut chars = src.chars();
    let allow_unicode_chars = mode.allow_unicode_chars();

    while let Some(c) = chars.next() {
        let start = src.len() - chars.as_str().len() - c.len_utf8();
        let res = match c {
            '\r' if chars.clone().next() != Some('\n') => {
                Err(EscapeError::BareCarriageReturnInRawString)
            }
            _ => ascii_check(c, allow_unicode_chars),
        };
        let end = src.len() - chars.as_str().len();
        callback(start..end, res);
    }
}

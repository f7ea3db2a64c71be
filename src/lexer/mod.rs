//! # Field Lexer
//!
//! A cursor over the bytes of a single sentence that reads one typed field at a
//! time, strictly left to right.
//!
//! Every `next_*` accessor reads the field under the cursor and then consumes the
//! separator that terminates it, so consecutive calls walk the sentence field by
//! field:
//!
//! ```rust
//! use nmea0183_stream::Lexer;
//!
//! let mut lexer = Lexer::new(b"$GPGLL,4916.45,N,12311.12,W,225444,A,*1D\r\n");
//!
//! assert_eq!(lexer.next_string().unwrap(), "GPGLL");
//! assert!((lexer.next_latitude().unwrap() - 49.274167).abs() < 1e-6);
//! assert!((lexer.next_longitude().unwrap() + 123.185333).abs() < 1e-6);
//! assert_eq!(lexer.next_time_span().unwrap().whole_seconds(), 22 * 3600 + 54 * 60 + 44);
//! assert_eq!(lexer.next_char().unwrap(), 'A');
//! assert_eq!(lexer.next_char().unwrap(), '\0');
//! assert_eq!(lexer.next_checksum().unwrap(), 0x1D);
//! ```
//!
//! ## Absent fields
//!
//! An empty field is not an error. Each accessor has one value it returns when
//! the field is empty:
//!
//! | Accessor | Absent value |
//! |----------|--------------|
//! | [`next_char`](Lexer::next_char) | `'\0'` |
//! | [`next_string`](Lexer::next_string), [`next_text`](Lexer::next_text) | `""` |
//! | [`next_double`](Lexer::next_double), [`next_latitude`](Lexer::next_latitude), [`next_longitude`](Lexer::next_longitude) | `NaN` |
//! | [`next_integer`](Lexer::next_integer), [`next_hexadecimal`](Lexer::next_hexadecimal), [`next_checksum`](Lexer::next_checksum) | `0` |
//! | [`next_time_span`](Lexer::next_time_span) | [`Duration::ZERO`] |
//! | [`next_date`](Lexer::next_date) | [`Date::MIN`] |
//! | [`next_date_time`](Lexer::next_date_time) | [`PrimitiveDateTime::MIN`] |
//!
//! Once the lexer has passed the `*` that starts the checksum (or the end of the
//! input), it is at the end of the sentence and every field accessor returns its
//! absent value without moving. Short sentences therefore decode without special
//! casing.
//!
//! ## Errors
//!
//! An accessor fails with a [`DecodeError`] when a non-empty field does not match
//! its grammar, or when the field is followed by something other than a
//! separator.

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::{
    error::{DecodeError, FieldKind},
    parsing,
};

mod token;

pub use token::Token;

#[cfg(test)]
mod tests {
    mod accessors;
    mod coordinates;
    mod tokens;
}

/// A field reader over one sentence.
///
/// The lexer only ever looks at the first line of its input: everything from the
/// first `\r` or `\n` on is ignored.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    index: usize,
    eol: bool,
    reference_year: Option<i32>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned on the first field of `input`.
    ///
    /// Leading whitespace and one leading separator (normally the `$`) are
    /// skipped, so the sentence can be given with or without its start
    /// delimiter.
    pub fn new(input: &'a [u8]) -> Self {
        let mut lexer = Self::raw(input);
        lexer.skip_whitespace();
        if lexer.current().is_some_and(is_separator) {
            lexer.consume_separator();
        }
        lexer
    }

    /// Creates a lexer positioned on the very first byte of `input`.
    ///
    /// This is the starting point for [`next_token`](Self::next_token), which
    /// reports separators as tokens of their own.
    pub fn raw(input: &'a [u8]) -> Self {
        let end = input
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .unwrap_or(input.len());

        Self {
            input: &input[..end],
            index: 0,
            eol: false,
            reference_year: None,
        }
    }

    /// Sets the year two-digit years are expanded against.
    ///
    /// Defaults to the current UTC year.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// 1-based position of the byte under the cursor.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// Whether the cursor has passed the end of the sentence body.
    pub fn is_eol(&self) -> bool {
        self.eol
    }

    /// The bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        let input = self.input;
        &input[self.index..]
    }

    /// Reads a single character field, or `'\0'` if the field is empty.
    pub fn next_char(&mut self) -> Result<char, DecodeError> {
        if self.eol {
            return Ok('\0');
        }

        self.skip_whitespace();
        match self.current() {
            Some(current) if is_text(current) => {
                self.advance();
                self.finish_field()?;
                Ok(char::from(current))
            }
            _ => {
                self.finish_field()?;
                Ok('\0')
            }
        }
    }

    /// Reads a field made of ASCII letters, such as the sentence identifier.
    pub fn next_string(&mut self) -> Result<String, DecodeError> {
        Ok(self
            .read_field(|b| b.is_ascii_alphabetic())?
            .map(|(_, run)| run.iter().copied().map(char::from).collect())
            .unwrap_or_default())
    }

    /// Reads the whole field as text, trimmed of surrounding whitespace.
    ///
    /// Unlike [`next_string`](Self::next_string) any byte other than a separator
    /// belongs to the field, which suits serial numbers and free-form status
    /// fields.
    pub fn next_text(&mut self) -> Result<String, DecodeError> {
        Ok(self
            .read_field(is_text)?
            .map(|(_, run)| String::from_utf8_lossy(run.trim_ascii_end()).into_owned())
            .unwrap_or_default())
    }

    /// Reads a decimal field, or `NaN` if the field is empty.
    pub fn next_double(&mut self) -> Result<f64, DecodeError> {
        match self.read_field(is_numeric)? {
            Some((position, run)) => {
                parsing::decimal(run).ok_or_else(|| invalid(FieldKind::Decimal, run, position))
            }
            None => Ok(f64::NAN),
        }
    }

    /// Reads a signed integer field, or `0` if the field is empty.
    pub fn next_integer(&mut self) -> Result<i32, DecodeError> {
        match self.read_field(is_numeric)? {
            Some((position, run)) => {
                parsing::integer(run).ok_or_else(|| invalid(FieldKind::Integer, run, position))
            }
            None => Ok(0),
        }
    }

    /// Reads a hexadecimal field, or `0` if the field is empty.
    pub fn next_hexadecimal(&mut self) -> Result<u32, DecodeError> {
        match self.read_field(|b| b.is_ascii_alphanumeric())? {
            Some((position, run)) => parsing::hexadecimal(run)
                .ok_or_else(|| invalid(FieldKind::Hexadecimal, run, position)),
            None => Ok(0),
        }
    }

    /// Reads a `HHMMSS[.sss]` field as the time elapsed since midnight.
    ///
    /// Fields shorter than six characters, including empty ones, read as
    /// [`Duration::ZERO`].
    pub fn next_time_span(&mut self) -> Result<Duration, DecodeError> {
        match self.read_field(is_numeric)? {
            Some((position, run)) if run.len() >= 6 => {
                parsing::time_of_day(run).ok_or_else(|| invalid(FieldKind::Time, run, position))
            }
            _ => Ok(Duration::ZERO),
        }
    }

    /// Reads a `DDMMYY` or `DDMMYYYY` date field.
    ///
    /// Fields shorter than six characters read as [`Date::MIN`]. Two-digit years
    /// resolve to the candidate closest to the reference year, see
    /// [`parsing::expand_two_digit_year`].
    pub fn next_date(&mut self) -> Result<Date, DecodeError> {
        match self.read_field(is_numeric)? {
            Some((position, run)) if run.len() >= 6 => {
                parsing::calendar_date(run, self.reference_year())
                    .ok_or_else(|| invalid(FieldKind::Date, run, position))
            }
            _ => Ok(Date::MIN),
        }
    }

    /// Reads a `YYYY/MM/DD HH:MM:SS` field.
    pub fn next_date_time(&mut self) -> Result<PrimitiveDateTime, DecodeError> {
        match self.read_field(is_text)? {
            Some((position, run)) => parsing::date_time(run.trim_ascii_end())
                .ok_or_else(|| invalid(FieldKind::DateTime, run, position)),
            None => Ok(PrimitiveDateTime::MIN),
        }
    }

    /// Reads a `DDMM.mmmm` latitude and its `N`/`S` hemisphere field.
    ///
    /// Southern latitudes are negative. Both fields are consumed even when the
    /// value is empty, in which case the result is `NaN`.
    pub fn next_latitude(&mut self) -> Result<f64, DecodeError> {
        self.next_coordinate(2, (b'N', b'S'), FieldKind::Latitude)
    }

    /// Reads a `DDDMM.mmmm` longitude and its `E`/`W` hemisphere field.
    ///
    /// Western longitudes are negative. Both fields are consumed even when the
    /// value is empty, in which case the result is `NaN`.
    pub fn next_longitude(&mut self) -> Result<f64, DecodeError> {
        self.next_coordinate(3, (b'E', b'W'), FieldKind::Longitude)
    }

    /// Skips to the `*` delimiter and reads the transmitted checksum after it.
    ///
    /// Works from any position in the sentence. The value is returned as sent;
    /// it is not compared against the sentence content. A sentence without a
    /// checksum reads as `0`.
    pub fn next_checksum(&mut self) -> Result<u8, DecodeError> {
        if !self.eol {
            while !matches!(self.current(), Some(b'*') | None) {
                self.advance();
            }
            if self.current() == Some(b'*') {
                self.advance();
            }
            self.eol = true;
        }

        self.skip_whitespace();
        let position = self.position();
        let run = self.take_while(|b| b.is_ascii_alphanumeric());
        if run.is_empty() {
            return Ok(0);
        }

        parsing::hexadecimal(run)
            .and_then(|value| u8::try_from(value).ok())
            .ok_or_else(|| invalid(FieldKind::Checksum, run, position))
    }

    /// Reads the next raw token, separators included.
    ///
    /// Numbers are read as decimals, so the checksum digits after a `*` come out
    /// as a [`Token::Number`] with their decimal reading.
    pub fn next_token(&mut self) -> Result<Token, DecodeError> {
        self.skip_whitespace();
        let position = self.position();

        let Some(current) = self.current() else {
            return Ok(Token::Eof);
        };

        match current {
            b'$' => {
                self.advance();
                Ok(Token::Dollar)
            }
            b',' => {
                self.advance();
                Ok(Token::Comma)
            }
            b'*' => {
                self.advance();
                self.eol = true;
                Ok(Token::Asterisk)
            }
            b if is_numeric(b) => {
                let run = self.take_while(is_numeric);
                parsing::decimal(run)
                    .map(Token::Number)
                    .ok_or_else(|| invalid(FieldKind::Decimal, run, position))
            }
            b if b.is_ascii_alphabetic() => {
                let run = self.take_while(|b| b.is_ascii_alphabetic());
                Ok(Token::String(run.iter().copied().map(char::from).collect()))
            }
            other => Err(DecodeError::Unexpected {
                found: char::from(other),
                position,
            }),
        }
    }

    fn next_coordinate(
        &mut self,
        degree_digits: usize,
        (positive, negative): (u8, u8),
        kind: FieldKind,
    ) -> Result<f64, DecodeError> {
        let magnitude = match self.read_field(is_numeric)? {
            Some((position, run)) => Some(
                parsing::sexagesimal(run, degree_digits)
                    .ok_or_else(|| invalid(kind, run, position))?,
            ),
            None => None,
        };

        let direction_position = self.position();
        let direction = self.read_field(|b| b.is_ascii_alphabetic())?;

        let Some(magnitude) = magnitude else {
            return Ok(f64::NAN);
        };

        match direction {
            Some((_, &[hemisphere])) if hemisphere == positive => Ok(magnitude),
            Some((_, &[hemisphere])) if hemisphere == negative => Ok(-magnitude),
            Some((position, run)) => Err(invalid(FieldKind::Direction, run, position)),
            None => Err(invalid(FieldKind::Direction, &[], direction_position)),
        }
    }

    /// Reads one field made of the bytes `accept` allows and consumes its
    /// separator. Returns `None` for an empty field or at the end of the
    /// sentence.
    fn read_field(
        &mut self,
        accept: impl Fn(u8) -> bool,
    ) -> Result<Option<(usize, &'a [u8])>, DecodeError> {
        if self.eol {
            return Ok(None);
        }

        self.skip_whitespace();
        let position = self.position();
        let run = self.take_while(accept);
        self.finish_field()?;

        Ok((!run.is_empty()).then_some((position, run)))
    }

    fn finish_field(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();

        match self.current() {
            None => {
                self.eol = true;
                Ok(())
            }
            Some(b) if is_separator(b) => {
                self.consume_separator();
                Ok(())
            }
            Some(other) => Err(DecodeError::Unexpected {
                found: char::from(other),
                position: self.position(),
            }),
        }
    }

    fn consume_separator(&mut self) {
        if self.current() == Some(b'*') {
            self.eol = true;
        }
        self.advance();
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a [u8] {
        let input = self.input;
        let start = self.index;
        let len = input[start..].iter().take_while(|&&b| accept(b)).count();
        self.index += len;
        &input[start..self.index]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(|b| b == b' ' || b == b'\t');
    }

    /// The byte under the cursor, `None` past the end of the input.
    fn current(&self) -> Option<u8> {
        self.input.get(self.index).copied()
    }

    fn advance(&mut self) {
        if self.index < self.input.len() {
            self.index += 1;
        }
    }

    fn reference_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| OffsetDateTime::now_utc().year())
    }
}

fn is_separator(b: u8) -> bool {
    matches!(b, b',' | b'*' | b'$')
}

fn is_numeric(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.' || b == b'-'
}

fn is_text(b: u8) -> bool {
    b != 0 && !is_separator(b)
}

fn invalid(kind: FieldKind, run: &[u8], position: usize) -> DecodeError {
    DecodeError::InvalidField {
        kind,
        text: String::from_utf8_lossy(run).into_owned(),
        position,
    }
}

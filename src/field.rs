use time::{Date, Duration, PrimitiveDateTime};

use crate::{DecodeError, Lexer};

/// Trait for types that can be read from the fields under a [`Lexer`] cursor.
///
/// `FromLexer` is the glue between sentence structs and the lexer accessors: the
/// [`Sentence`](crate::Sentence) and [`FromLexer`](derive@crate::FromLexer) derive
/// macros read every field through its type's implementation unless a field
/// attribute says otherwise. Implementations are provided for the primitive types
/// the lexer knows how to read, and for fixed-size arrays of them.
///
/// | Type | Accessor |
/// |------|----------|
/// | `char` | [`Lexer::next_char`] |
/// | `String` | [`Lexer::next_text`] |
/// | `f64` | [`Lexer::next_double`] |
/// | `i32` | [`Lexer::next_integer`] |
/// | `u32` | [`Lexer::next_hexadecimal`] |
/// | [`Duration`] | [`Lexer::next_time_span`] |
/// | [`Date`] | [`Lexer::next_date`] |
/// | [`PrimitiveDateTime`] | [`Lexer::next_date_time`] |
/// | `[T; N]` | `N` consecutive reads of `T` |
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::{FromLexer, Lexer};
///
/// let mut lexer = Lexer::new(b"3.6,2.1,2.2*3C");
/// let dops = <[f64; 3]>::read(&mut lexer).unwrap();
/// assert_eq!(dops, [3.6, 2.1, 2.2]);
/// ```
///
/// # Implementing for Custom Types
///
/// Compose the accessors, or other `FromLexer` implementations, in field order:
///
/// ```rust
/// use nmea0183_stream::{DecodeError, FromLexer, Lexer};
///
/// struct Depth {
///     meters: f64,
///     unit: char,
/// }
///
/// impl FromLexer for Depth {
///     fn read(lexer: &mut Lexer<'_>) -> Result<Self, DecodeError> {
///         Ok(Depth {
///             meters: f64::read(lexer)?,
///             unit: char::read(lexer)?,
///         })
///     }
/// }
///
/// let depth = Depth::read(&mut Lexer::new(b"12.5,M")).unwrap();
/// assert_eq!((depth.meters, depth.unit), (12.5, 'M'));
/// ```
pub trait FromLexer: Sized {
    /// Reads one value, consuming the field (or fields) it spans.
    fn read(lexer: &mut Lexer<'_>) -> Result<Self, DecodeError>;
}

macro_rules! impl_from_lexer {
    ($($t:ty => $accessor:ident),* $(,)?) => ($(
        impl FromLexer for $t {
            fn read(lexer: &mut Lexer<'_>) -> Result<Self, DecodeError> {
                lexer.$accessor()
            }
        }
    )*)
}

impl_from_lexer! {
    char => next_char,
    String => next_text,
    f64 => next_double,
    i32 => next_integer,
    u32 => next_hexadecimal,
    Duration => next_time_span,
    Date => next_date,
    PrimitiveDateTime => next_date_time,
}

impl<T, const N: usize> FromLexer for [T; N]
where
    T: FromLexer + Default + Copy,
{
    fn read(lexer: &mut Lexer<'_>) -> Result<Self, DecodeError> {
        let mut elems = [T::default(); N];

        for elem in &mut elems {
            *elem = T::read(lexer)?;
        }

        Ok(elems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_array() {
        let mut lexer = Lexer::new(b"$GPGSA,,,,,,16,18,,22,24,,,3.6*3C");
        lexer.next_string().unwrap();

        let result = <[i32; 12]>::read(&mut lexer);
        assert_eq!(result, Ok([0, 0, 0, 0, 0, 16, 18, 0, 22, 24, 0, 0]));
        assert_eq!(f64::read(&mut lexer), Ok(3.6));
    }

    #[test]
    fn test_read_array_error() {
        let mut lexer = Lexer::new(b"1,2,x,4");
        let result = <[i32; 4]>::read(&mut lexer);
        assert!(result.is_err(), "Failed: {result:?}");
    }
}

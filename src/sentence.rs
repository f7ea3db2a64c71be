//! # Sentence Decoders
//!
//! A [`Sentence`] is a typed record bound to one sentence identifier. A
//! [`SentenceDecoder`] is the object-safe capability the
//! [`StreamDecoder`](crate::StreamDecoder) dispatches frames to: it recognizes
//! frames by their 6-byte prefix and turns them into messages of the stream's
//! message type `M`.
//!
//! Any `Sentence` becomes a decoder for every message type it converts into with
//! [`decoder`]:
//!
//! ```rust
//! # #[cfg(feature = "sentences")] {
//! use nmea0183_stream::{
//!     SentenceDecoder, decoder,
//!     sentences::{GGA, NmeaMessage},
//! };
//!
//! let gga = decoder::<GGA>();
//! let frame = b"$GPGGA,232608.000,5057.1975,N,11134.8332,W,2,8,1.06,781.7,M,-18.1,M,0000,0000*62";
//!
//! assert!(SentenceDecoder::<NmeaMessage>::can_handle(&gga, frame));
//! let message: NmeaMessage = gga.parse(frame).unwrap();
//! assert!(matches!(message, NmeaMessage::GGA(_)));
//! # }
//! ```

use std::{fmt, marker::PhantomData};

use crate::{DecodeError, Lexer};

/// Length of the prefix a decoder matches frames on.
pub const KEY_LEN: usize = 6;

/// A typed sentence bound to one sentence identifier.
///
/// Usually derived:
///
/// ```rust
/// use nmea0183_stream::Sentence;
///
/// #[derive(Debug, Sentence)]
/// #[nmea(key = "$SDDBT")]
/// struct DBT {
///     depth_feet: f64,
///     feet: char,
///     depth_meters: f64,
///     meters: char,
///     #[nmea(checksum)]
///     checksum: u8,
/// }
///
/// let dbt = DBT::decode(b"$SDDBT,7.8,f,2.4,M,1.3,F*0D\r\n").unwrap();
/// assert_eq!(dbt.depth_meters, 2.4);
/// assert_eq!(dbt.checksum(), 0x0D);
/// ```
pub trait Sentence: Sized {
    /// The frame prefix: `$` followed by the sentence identifier.
    const KEY: &'static [u8; KEY_LEN];

    /// The sentence identifier as it appears in the first field.
    const IDENTIFIER: &'static str;

    /// Reads every field after the sentence identifier, checksum included.
    fn read_fields(lexer: &mut Lexer<'_>) -> Result<Self, DecodeError>;

    /// The checksum transmitted with the sentence.
    fn checksum(&self) -> u8;

    /// Decodes a whole frame, checking its sentence identifier first.
    fn decode(frame: &[u8]) -> Result<Self, DecodeError> {
        let mut lexer = Lexer::new(frame);
        let identifier = lexer.next_string()?;

        if identifier != Self::IDENTIFIER {
            return Err(DecodeError::IdentifierMismatch {
                expected: Self::IDENTIFIER,
                found: identifier,
            });
        }

        Self::read_fields(&mut lexer)
    }
}

/// Recognizes and decodes one kind of frame into messages of type `M`.
///
/// Decoders are stateless; the same instance may decode frames from any number
/// of streams concurrently.
pub trait SentenceDecoder<M>: Send + Sync {
    /// The 6-byte prefix of the frames this decoder handles.
    fn key(&self) -> &[u8; KEY_LEN];

    /// A human readable name, used in logs.
    fn name(&self) -> &str;

    /// Whether the frame starts with this decoder's key.
    ///
    /// Frames shorter than the key never match.
    fn can_handle(&self, frame: &[u8]) -> bool {
        frame.len() >= KEY_LEN && frame[..KEY_LEN] == self.key()[..]
    }

    /// Decodes the frame.
    fn parse(&self, frame: &[u8]) -> Result<M, DecodeError>;
}

impl<M, D> SentenceDecoder<M> for Box<D>
where
    D: SentenceDecoder<M> + ?Sized,
{
    fn key(&self) -> &[u8; KEY_LEN] {
        (**self).key()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn can_handle(&self, frame: &[u8]) -> bool {
        (**self).can_handle(frame)
    }

    fn parse(&self, frame: &[u8]) -> Result<M, DecodeError> {
        (**self).parse(frame)
    }
}

/// A [`SentenceDecoder`] that decodes frames as the sentence `S`.
pub struct Decoder<S>(PhantomData<fn() -> S>);

/// Creates the decoder for the sentence `S`.
pub fn decoder<S: Sentence>() -> Decoder<S> {
    Decoder(PhantomData)
}

impl<S> Clone for Decoder<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Decoder<S> {}

impl<S> Default for Decoder<S> {
    fn default() -> Self {
        Decoder(PhantomData)
    }
}

impl<S: Sentence> fmt::Debug for Decoder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Decoder").field(&S::IDENTIFIER).finish()
    }
}

impl<S, M> SentenceDecoder<M> for Decoder<S>
where
    S: Sentence,
    M: From<S>,
{
    fn key(&self) -> &[u8; KEY_LEN] {
        S::KEY
    }

    fn name(&self) -> &str {
        S::IDENTIFIER
    }

    fn parse(&self, frame: &[u8]) -> Result<M, DecodeError> {
        S::decode(frame).map(M::from)
    }
}

/// Computes the checksum of a frame: the XOR of every byte between the leading
/// `$` and the `*`.
///
/// Decoding never compares this against the transmitted value; it is provided
/// for callers that want to.
///
/// ```rust
/// use nmea0183_stream::sentence::checksum;
///
/// assert_eq!(checksum(b"$GPGLL,4916.45,N,12311.12,W,225444,A,*1D"), 0x1D);
/// ```
pub fn checksum(frame: &[u8]) -> u8 {
    let body = frame.strip_prefix(b"$").unwrap_or(frame);

    body.iter()
        .take_while(|&&b| b != b'*' && b != b'\r' && b != b'\n')
        .fold(0, |acc, b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl SentenceDecoder<()> for Probe {
        fn key(&self) -> &[u8; KEY_LEN] {
            b"$NMEAX"
        }

        fn name(&self) -> &str {
            "NMEAX"
        }

        fn parse(&self, _frame: &[u8]) -> Result<(), DecodeError> {
            Ok(())
        }
    }

    #[test]
    fn test_can_handle() {
        let cases: [(&[u8], bool); 5] = [
            (b"$NMEAX,1,2*00", true),
            (b"$NMEAX", true),
            (b"$NMEA", false),
            (b"", false),
            (b"$NMEAY,1,2*00", false),
        ];

        for (input, expected) in cases {
            let result = Probe.can_handle(input);
            assert_eq!(result, expected, "Failed: {input:?}");
        }
    }

    #[test]
    fn test_boxed_decoder() {
        let boxed: Box<dyn SentenceDecoder<()>> = Box::new(Probe);
        assert!(boxed.can_handle(b"$NMEAX,"));
        assert_eq!(boxed.name(), "NMEAX");
        assert_eq!(boxed.parse(b"$NMEAX,"), Ok(()));
    }

    #[test]
    fn test_checksum() {
        let cases: [(&[u8], u8); 3] = [
            (
                b"$GPGGA,232608.000,5057.1975,N,11134.8332,W,2,8,1.06,781.7,M,-18.1,M,0000,0000*62\r\n",
                0x62,
            ),
            (b"$GPGSV,4,4,13,31,02,340,24*4A", 0x4A),
            (b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48", 0x48),
        ];

        for (input, expected) in cases {
            let result = checksum(input);
            assert_eq!(result, expected, "Failed: {input:?}");
        }
    }
}

//! # NMEA 0183 Stream Decoder
//!
//! This library decodes NMEA 0183 sentences of the form
//! `$<identifier>,<field_1>,...,<field_n>*<checksum>\r\n` from byte streams.
//!
//! It is built from three layers:
//!
//! - [`Lexer`]: a cursor over one sentence with one typed accessor per field
//!   grammar. Absent fields read as well-defined absent values instead of
//!   failing, so short sentences decode without special casing.
//! - [`Sentence`] and [`SentenceDecoder`]: typed sentence records and the
//!   capability that recognizes and decodes their frames. Sentences are
//!   usually derived with `#[derive(Sentence)]`.
//! - [`StreamDecoder`]: splits a byte stream into frames, dispatches each to
//!   the first registered decoder that handles it and reports messages through
//!   a callback, stopping on end of stream, cancellation, or too many
//!   consecutive unparsed lines.
//!
//! The transmitted checksum is decoded but not verified; see
//! [`sentence::checksum`] to compute it.
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "sentences")]
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! use nmea0183_stream::{ExitReason, StreamDecoder, sentences::{NmeaMessage, gps_decoders}};
//! use tokio_util::sync::CancellationToken;
//!
//! let input: &[u8] =
//!     b"$GPGGA,232608.000,5057.1975,N,11134.8332,W,2,8,1.06,781.7,M,-18.1,M,0000,0000*62\r\n";
//!
//! let mut decoder = StreamDecoder::new();
//! decoder.register(gps_decoders())?.set_abort_after_unparsed_lines(10);
//!
//! let reason = decoder
//!     .parse_stream(
//!         input,
//!         |message| {
//!             if let NmeaMessage::GGA(gga) = message {
//!                 assert_eq!(gga.number_of_satellites, 8);
//!             }
//!         },
//!         CancellationToken::new(),
//!     )
//!     .await?;
//!
//! assert_eq!(reason, ExitReason::StreamEnded);
//! # Ok::<(), nmea0183_stream::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Features
//!
//! - `derive` (default): the `Sentence` and `FromLexer` derive macros.
//! - `sentences` (default): the built-in [`sentences`] and [`sentences::NmeaMessage`].
//! - `serde`: `Serialize` and `Deserialize` for messages, options and counters.

pub mod error;
mod field;
mod lexer;
pub mod parsing;
mod reader;
pub mod sentence;
#[cfg(feature = "sentences")]
pub mod sentences;
mod stream;

pub use error::{DecodeError, Error, FieldKind};
pub use field::FromLexer;
pub use lexer::{Lexer, Token};
pub use reader::NmeaReader;
pub use sentence::{Decoder, Sentence, SentenceDecoder, decoder};
pub use stream::{DecoderStats, ExitReason, StreamDecoder, StreamDecoderBuilder, StreamOptions};

#[cfg(feature = "derive")]
pub use nmea0183_stream_derive::{FromLexer, Sentence};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;

//! # Error Types
//!
//! Two layers of errors exist in this crate:
//!
//! - [`DecodeError`] is scoped to a single frame. It is produced by the
//!   [`Lexer`](crate::Lexer) accessors and by sentence decoders, and it never escapes
//!   a decoding run: the [`StreamDecoder`](crate::StreamDecoder) logs it and moves on
//!   to the next line.
//! - [`Error`] is scoped to a decoding run. It reports configuration problems that
//!   prevent a run from starting at all.

use std::fmt;

/// The grammar a field was being read with when decoding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Decimal,
    Integer,
    Hexadecimal,
    Latitude,
    Longitude,
    Direction,
    Time,
    Date,
    DateTime,
    Checksum,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::Hexadecimal => "hexadecimal",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Direction => "direction",
            Self::Time => "time",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Checksum => "checksum",
        };
        write!(f, "{name}")
    }
}

/// Represents the ways a single frame can fail to decode.
///
/// Positions are 1-based byte offsets into the frame handed to the lexer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// A byte was found where a field separator was required, or where no field
    /// can start.
    #[error("did not expect {found:?} at position {position}")]
    Unexpected {
        /// The offending byte, as a character
        found: char,
        /// Position of the offending byte
        position: usize,
    },

    /// A non-empty field could not be read with its declared grammar.
    #[error("invalid {kind} field {text:?} at position {position}")]
    InvalidField {
        /// The grammar the field was read with
        kind: FieldKind,
        /// The raw field text
        text: String,
        /// Position of the first byte of the field
        position: usize,
    },

    /// The sentence identifier does not belong to the decoder that was asked to
    /// decode the frame.
    #[error("expected sentence identifier {expected}, found {found:?}")]
    IdentifierMismatch {
        /// The identifier the decoder handles
        expected: &'static str,
        /// The identifier found in the frame
        found: String,
    },

    /// A selector field holds a value none of the enum variants accept.
    #[error("unknown value {value} at position {position}")]
    UnknownValue {
        /// Debug rendering of the selector value
        value: String,
        /// Position of the selector field
        position: usize,
    },
}

/// Errors that stop a decoding run from starting or completing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A run was started without any registered sentence decoder.
    #[error("no sentence decoders are registered")]
    NoDecoders,

    /// A registration call was made with an empty decoder list.
    #[error("at least one sentence decoder must be provided")]
    EmptyRegistration,

    /// The background task driving a [`NmeaReader`](crate::NmeaReader) panicked or
    /// was aborted.
    #[error("decoding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

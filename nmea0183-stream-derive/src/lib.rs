//! # Derive macros for nmea0183-stream
//!
//! `nmea0183-stream-derive` binds the fields of a struct to the typed accessors of
//! the `nmea0183-stream` lexer, in declaration order. It is re-exported by
//! `nmea0183-stream` behind its `derive` feature and is not meant to be used on its
//! own.
//!
//! ## `#[derive(Sentence)]`
//!
//! Implements `Sentence` for a struct. The struct needs a `key` and exactly one
//! field marked `checksum`:
//!
//! ```ignore
//! #[derive(Sentence)]
//! #[nmea(key = "$GPGLL")]
//! pub struct GLL {
//!     #[nmea(reader(Lexer::next_latitude))]
//!     pub latitude: f64,
//!     #[nmea(reader(Lexer::next_longitude))]
//!     pub longitude: f64,
//!     pub fix_time: Duration,
//!     pub data_active: char,
//!     #[nmea(checksum)]
//!     pub checksum: u8,
//! }
//! ```
//!
//! ## `#[derive(FromLexer)]`
//!
//! Implements `FromLexer` for a struct (fields read in order) or for an enum of
//! unit variants picked by a selector field:
//!
//! ```ignore
//! #[derive(FromLexer)]
//! #[nmea(selector(Lexer::next_integer))]
//! pub enum FixType {
//!     #[nmea(selector(1))]
//!     NoFix,
//!     #[nmea(selector(2))]
//!     Fix2D,
//!     #[nmea(selector(3))]
//!     Fix3D,
//!     #[nmea(selector(_))]
//!     Unknown,
//! }
//! ```
//!
//! ## Field attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `reader(expr)` | read the field with `expr(lexer)` instead of the type's `FromLexer` |
//! | `read_as(Type)` | read the field as `Type` |
//! | `map(expr)` | apply `expr` to the value read |
//! | `into` | convert the value read with `Into` |
//! | `ignore` | do not read; use `Default::default()` |
//! | `checksum` | read the transmitted checksum |

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod config;
mod generate;
mod meta;
mod reader;

#[proc_macro_derive(Sentence, attributes(nmea))]
pub fn derive_sentence(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate::generate_sentence_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_derive(FromLexer, attributes(nmea))]
pub fn derive_from_lexer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate::generate_from_lexer_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

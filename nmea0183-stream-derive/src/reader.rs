use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Type};

/// How one field is read from the lexer.
///
/// Every variant expands to an expression of type
/// `Result<T, nmea0183_stream::DecodeError>`.
#[derive(Clone)]
pub enum FieldReader {
    Checksum,
    Ignore(Box<Type>),
    Into(Box<FieldReader>),
    Map {
        reader: Box<FieldReader>,
        map: TokenStream,
    },
    Raw(TokenStream),
    Type(Box<Type>),
}

impl FieldReader {
    pub fn expand(&self, lexer: &Ident) -> TokenStream {
        match self {
            Self::Checksum => quote! { #lexer.next_checksum() },
            Self::Ignore(ty) => quote! {
                ::core::result::Result::<#ty, nmea0183_stream::DecodeError>::Ok(
                    <#ty as ::core::default::Default>::default()
                )
            },
            Self::Into(reader) => {
                let reader = reader.expand(lexer);
                quote! { #reader.map(::core::convert::Into::into) }
            }
            Self::Map { reader, map } => {
                let reader = reader.expand(lexer);
                quote! { #reader.map(#map) }
            }
            Self::Raw(reader) => quote! { (#reader)(#lexer) },
            Self::Type(ty) => quote! { <#ty as nmea0183_stream::FromLexer>::read(#lexer) },
        }
    }
}

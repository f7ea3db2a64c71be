use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DataStruct, Error, Generics, Ident, LitByteStr, LitStr, Result};

use crate::{
    config::Config,
    generate::{Generator, structs::reader::StructReader},
    meta::{self, AttributeKind, Placement},
};

pub mod reader;

pub struct Struct {
    pub name: Ident,
    pub config: Config,
    pub generics: Generics,
    pub struct_reader: StructReader,
}

impl Struct {
    pub fn from_datastruct(
        name: &Ident,
        datastruct: &DataStruct,
        attributes: &[Attribute],
        generics: &Generics,
    ) -> Result<Self> {
        let attributes = meta::parse_attributes(attributes, Placement::Item)?;

        if let Some(attribute) = attributes
            .iter()
            .find(|attribute| attribute.kind == AttributeKind::Selector)
        {
            return Err(Error::new(
                attribute.span(),
                "nmea0183-stream-derive: Structs do not support `selector` attributes; only enums support this feature.",
            ));
        }

        let config = Config::from_meta_attributes(&attributes)?;
        let struct_reader = StructReader::from_fields(&datastruct.fields)?;

        Ok(Self {
            name: name.clone(),
            config,
            generics: generics.clone(),
            struct_reader,
        })
    }

    pub fn generate_sentence(&self) -> Result<TokenStream> {
        let name = &self.name;
        let lexer = &self.config.lexer_name;

        let key = self.config.key.as_ref().ok_or_else(|| {
            Error::new(
                name.span(),
                "nmea0183-stream-derive: `Sentence` requires a `key` attribute, e.g. #[nmea(key = \"$GPGGA\")]",
            )
        })?;

        let value = key.value();
        if value.len() != 6 || !value.is_ascii() || !value.starts_with('$') {
            return Err(Error::new(
                key.span(),
                "nmea0183-stream-derive: `key` must be `$` followed by a 5 character sentence identifier",
            ));
        }

        let key_bytes = LitByteStr::new(value.as_bytes(), key.span());
        let identifier = LitStr::new(&value[1..], key.span());

        let checksum = self.struct_reader.checksum_member().ok_or_else(|| {
            Error::new(
                name.span(),
                "nmea0183-stream-derive: `Sentence` requires a field marked #[nmea(checksum)]",
            )
        })?;

        let body = self.generate_read_body()?;
        let (impl_generics, ty_generics, _) = self.generics.split_for_impl();
        let where_clause = self.where_clause();

        Ok(quote! {
            impl #impl_generics nmea0183_stream::Sentence for #name #ty_generics #where_clause {
                const KEY: &'static [u8; nmea0183_stream::sentence::KEY_LEN] = #key_bytes;
                const IDENTIFIER: &'static str = #identifier;

                fn read_fields(
                    #lexer: &mut nmea0183_stream::Lexer<'_>,
                ) -> ::core::result::Result<Self, nmea0183_stream::DecodeError> {
                    #body
                }

                fn checksum(&self) -> u8 {
                    self.#checksum
                }
            }
        })
    }
}

impl Generator for Struct {
    fn name(&self) -> &Ident {
        &self.name
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn generics(&self) -> &Generics {
        &self.generics
    }

    fn generate_read_body(&self) -> Result<TokenStream> {
        let lexer = &self.config.lexer_name;

        let (variable_name, reader): (Vec<_>, Vec<_>) = self
            .struct_reader
            .readers
            .iter()
            .map(|field| (&field.variable_name, field.reader.expand(lexer)))
            .unzip();

        let struct_def = match (self.struct_reader.empty, self.struct_reader.unnamed) {
            (true, _) => quote! { Self },
            (_, true) => quote! { Self(#(#variable_name),*) },
            (_, false) => quote! { Self { #(#variable_name),* } },
        };

        Ok(quote! {
            #(let #variable_name = #reader?;)*
            ::core::result::Result::Ok(#struct_def)
        })
    }
}

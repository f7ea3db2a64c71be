use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DataEnum, Error, Generics, Ident, Result};

use crate::{
    config::Config,
    generate::{Generator, enums::variant::VariantReader},
    meta::{self, Placement},
};

pub mod variant;

pub struct Enum {
    pub name: Ident,
    pub config: Config,
    pub generics: Generics,
    pub variant_readers: Vec<VariantReader>,
}

impl Enum {
    pub fn from_dataenum(
        name: &Ident,
        dataenum: &DataEnum,
        attributes: &[Attribute],
        generics: &Generics,
    ) -> Result<Self> {
        let attributes = meta::parse_attributes(attributes, Placement::Item)?;
        let config = Config::from_meta_attributes(&attributes)?;

        if config.selector_reader.is_none() {
            return Err(Error::new(
                name.span(),
                "nmea0183-stream-derive: Enums must have a `selector` attribute",
            ));
        }

        if let Some(key) = &config.key {
            return Err(Error::new(
                key.span(),
                "nmea0183-stream-derive: Enums do not support `key` attributes",
            ));
        }

        let variant_readers = dataenum
            .variants
            .iter()
            .map(VariantReader::from_variant)
            .collect::<Result<Vec<_>>>()?;

        // A catch-all selector must come last, or the variants after it are
        // unreachable.
        let default_position = variant_readers.iter().position(VariantReader::is_default);
        if let Some(position) = default_position {
            if position != variant_readers.len() - 1 {
                return Err(Error::new(
                    variant_readers[position].name.span(),
                    "nmea0183-stream-derive: Default case must be the last entry in the enum",
                ));
            }
        }

        Ok(Self {
            name: name.clone(),
            config,
            generics: generics.clone(),
            variant_readers,
        })
    }

    fn has_default(&self) -> bool {
        self.variant_readers.iter().any(VariantReader::is_default)
    }
}

impl Generator for Enum {
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
        let selector = &self.config.selector_name;
        let position = &self.config.position_name;
        let selector_reader = self.config.selector_reader.as_ref().ok_or_else(|| {
            Error::new(
                self.name.span(),
                "nmea0183-stream-derive: Enums must have a `selector` attribute",
            )
        })?;

        let variant_tokens = self.variant_readers.iter().map(|variant_reader| {
            let variant_name = &variant_reader.name;
            let selector = &variant_reader.selector;
            quote! { #selector => ::core::result::Result::Ok(Self::#variant_name), }
        });

        let (position_binding, default_case) = if self.has_default() {
            (quote! {}, quote! {})
        } else {
            let binding = quote! { let #position = #lexer.position(); };
            let default_case = quote! {
                other => ::core::result::Result::Err(nmea0183_stream::DecodeError::UnknownValue {
                    value: ::std::format!("{:?}", other),
                    position: #position,
                }),
            };
            (binding, default_case)
        };

        Ok(quote! {
            #position_binding
            let #selector = (#selector_reader)(#lexer)?;
            match #selector {
                #(#variant_tokens)*
                #default_case
            }
        })
    }
}

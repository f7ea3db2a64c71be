use proc_macro2::TokenStream;
use syn::{Error, Fields, Ident, Result, Variant, spanned::Spanned};

use crate::meta::{self, AttributeKind, Placement};

pub struct VariantReader {
    pub name: Ident,
    pub selector: TokenStream,
}

impl VariantReader {
    pub fn from_variant(variant: &Variant) -> Result<Self> {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "nmea0183-stream-derive: Only unit variants are supported",
            ));
        }

        let attributes = meta::parse_attributes(&variant.attrs, Placement::Field)?;

        let selector = attributes
            .iter()
            .find(|attr| attr.kind == AttributeKind::Selector)
            .ok_or_else(|| {
                Error::new(
                    variant.span(),
                    "nmea0183-stream-derive: Variants must have a `selector` attribute",
                )
            })?
            .required_arg()?
            .clone();

        Ok(Self {
            name: variant.ident.clone(),
            selector,
        })
    }

    pub fn is_default(&self) -> bool {
        self.selector.to_string() == "_"
    }
}

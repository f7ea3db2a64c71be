use proc_macro2::{Span, TokenStream};
use syn::{Ident, LitStr, Result, parse2};

use crate::meta::{AttributeKind, MetaAttribute};

#[derive(Clone)]
pub struct Config {
    pub lexer_name: Ident,
    pub selector_name: Ident,
    pub position_name: Ident,
    pub selector_reader: Option<TokenStream>,
    pub key: Option<LitStr>,
}

impl Config {
    pub fn from_meta_attributes(attribute_list: &[MetaAttribute]) -> Result<Self> {
        let mut selector_reader = None;
        let mut key = None;

        for meta in attribute_list {
            match meta.kind {
                AttributeKind::Selector => selector_reader = Some(meta.required_arg()?.clone()),
                AttributeKind::Key => key = Some(parse2::<LitStr>(meta.required_arg()?.clone())?),
                _ => {}
            }
        }

        Ok(Self {
            lexer_name: Ident::new("nmea_lexer", Span::call_site()),
            selector_name: Ident::new("nmea_selector", Span::call_site()),
            position_name: Ident::new("nmea_position", Span::call_site()),
            selector_reader,
            key,
        })
    }
}

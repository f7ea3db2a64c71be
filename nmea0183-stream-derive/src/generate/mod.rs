use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Generics, Ident, Result, WhereClause, parse_quote};

use crate::{
    config::Config,
    generate::{enums::Enum, structs::Struct},
};

mod enums;
mod structs;

/// Turns a parsed struct or enum into the body of its `FromLexer::read`.
///
/// Structs read their fields in declaration order; enums read a selector value
/// and match it against each variant's `#[nmea(selector(...))]` pattern.
trait Generator {
    fn name(&self) -> &Ident;
    fn config(&self) -> &Config;
    fn generics(&self) -> &Generics;
    fn generate_read_body(&self) -> Result<TokenStream>;

    /// The type's own where clause, plus a `FromLexer` bound on every type
    /// parameter.
    fn where_clause(&self) -> WhereClause {
        let generics = self.generics();
        let mut where_clause = generics
            .where_clause
            .clone()
            .unwrap_or_else(|| parse_quote!(where));

        for param in generics.type_params() {
            let param = &param.ident;
            where_clause
                .predicates
                .push(parse_quote!(#param: nmea0183_stream::FromLexer));
        }

        where_clause
    }

    fn generate_from_lexer(&self) -> Result<TokenStream> {
        let name = self.name();
        let lexer = &self.config().lexer_name;
        let body = self.generate_read_body()?;
        let (impl_generics, ty_generics, _) = self.generics().split_for_impl();
        let where_clause = self.where_clause();

        Ok(quote! {
            impl #impl_generics nmea0183_stream::FromLexer for #name #ty_generics #where_clause {
                fn read(
                    #lexer: &mut nmea0183_stream::Lexer<'_>,
                ) -> ::core::result::Result<Self, nmea0183_stream::DecodeError> {
                    #body
                }
            }
        })
    }
}

fn generator(input: &DeriveInput) -> Result<Box<dyn Generator>> {
    let DeriveInput {
        ident,
        attrs,
        generics,
        data,
        ..
    } = input;

    Ok(match data {
        Data::Struct(data) => Box::new(Struct::from_datastruct(ident, data, attrs, generics)?),
        Data::Enum(data) => Box::new(Enum::from_dataenum(ident, data, attrs, generics)?),
        Data::Union(_) => {
            return Err(Error::new(
                ident.span(),
                "nmea0183-stream-derive: `FromLexer` cannot be derived for unions",
            ));
        }
    })
}

pub fn generate_from_lexer_impl(input: &DeriveInput) -> Result<TokenStream> {
    generator(input)?.generate_from_lexer()
}

pub fn generate_sentence_impl(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(
            input.ident.span(),
            "nmea0183-stream-derive: `Sentence` can only be derived for structs",
        ));
    };

    Struct::from_datastruct(&input.ident, data, &input.attrs, &input.generics)?.generate_sentence()
}

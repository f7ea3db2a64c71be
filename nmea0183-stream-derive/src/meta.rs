use std::{collections::HashSet, fmt};

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::{
    Attribute, Error, Expr, Ident, LitStr, Pat, Result, Token, Type, parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    token::Paren,
};

/// Every `#[nmea(...)]` attribute the derive macros understand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AttributeKind {
    Checksum,
    Ignore,
    Into,
    Key,
    Map,
    ReadAs,
    Reader,
    Selector,
}

/// Where an attribute is written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    /// On the struct or enum itself.
    Item,
    /// On a struct field or an enum variant.
    Field,
}

impl AttributeKind {
    const ALL: [(&'static str, Self); 8] = [
        ("checksum", Self::Checksum),
        ("ignore", Self::Ignore),
        ("into", Self::Into),
        ("key", Self::Key),
        ("map", Self::Map),
        ("read_as", Self::ReadAs),
        ("reader", Self::Reader),
        ("selector", Self::Selector),
    ];

    fn from_ident(ident: &Ident) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(name, _)| ident == name)
            .map(|&(_, kind)| kind)
    }

    fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|&&(_, kind)| kind == self)
            .map_or("", |&(name, _)| name)
    }

    fn allowed_at(self, placement: Placement) -> bool {
        match placement {
            Placement::Item => matches!(self, Self::Key | Self::Selector),
            Placement::Field => self != Self::Key,
        }
    }

    fn repeatable(self) -> bool {
        self == Self::Map
    }

    /// The attribute that cannot be combined with this one on the same field.
    fn conflicts_with(self) -> Option<Self> {
        match self {
            Self::ReadAs => Some(Self::Reader),
            Self::Reader => Some(Self::ReadAs),
            _ => None,
        }
    }

    /// Parses the value following the attribute name, if this kind takes one.
    fn parse_value(self, input: ParseStream) -> Result<Option<TokenStream>> {
        let value = match self {
            Self::Checksum | Self::Ignore | Self::Into => return Ok(None),
            Self::Key => parse_value::<LitStr>(input, true)?,
            Self::ReadAs => parse_value::<Type>(input, false)?,
            Self::Selector => parse_value::<PatAndGuard>(input, false)?,
            Self::Map | Self::Reader => parse_value::<Expr>(input, false)?,
        };
        Ok(Some(value))
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct MetaAttribute {
    pub kind: AttributeKind,
    value: Option<TokenStream>,
    span: Span,
}

impl MetaAttribute {
    pub fn required_arg(&self) -> Result<&TokenStream> {
        self.value.as_ref().ok_or_else(|| {
            Error::new(
                self.span,
                format!("nmea0183-stream-derive: Attribute `{}` requires a value", self.kind),
            )
        })
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl Parse for MetaAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let ident: Ident = input.parse()?;
        let kind = AttributeKind::from_ident(&ident).ok_or_else(|| {
            Error::new(
                ident.span(),
                format!("nmea0183-stream-derive: Unknown nmea attribute `{ident}`"),
            )
        })?;

        Ok(Self {
            kind,
            value: kind.parse_value(input)?,
            span: ident.span(),
        })
    }
}

/// A match arm pattern with an optional guard, as written in
/// `#[nmea(selector(1 | 2 if strict))]`.
pub struct PatAndGuard {
    pat: Pat,
    guard: Option<Expr>,
}

impl Parse for PatAndGuard {
    fn parse(input: ParseStream) -> Result<Self> {
        let pat = Pat::parse_multi_with_leading_vert(input)?;
        let guard = match input.parse::<Option<Token![if]>>()? {
            Some(_) => Some(input.parse()?),
            None => None,
        };

        Ok(Self { pat, guard })
    }
}

impl ToTokens for PatAndGuard {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let pat = &self.pat;
        tokens.extend(match &self.guard {
            Some(guard) => quote! { #pat if #guard },
            None => quote! { #pat },
        });
    }
}

/// Parses `(value)` or `= value`.
///
/// After `=`, a string literal is taken as is when `literal` is set, and is
/// otherwise parsed again as `P`, so `map = "|x| x * 2"` and `map(|x| x * 2)`
/// are equivalent.
fn parse_value<P>(input: ParseStream, literal: bool) -> Result<TokenStream>
where
    P: Parse + ToTokens,
{
    let lookahead = input.lookahead1();

    if lookahead.peek(Paren) {
        let content;
        parenthesized!(content in input);
        let value: P = content.parse()?;
        return Ok(value.into_token_stream());
    }

    if !lookahead.peek(Token![=]) {
        return Err(lookahead.error());
    }

    input.parse::<Token![=]>()?;
    let value: LitStr = input.parse().map_err(|err| {
        Error::new(
            err.span(),
            "nmea0183-stream-derive: Expected a string literal after `=`",
        )
    })?;

    if literal {
        Ok(value.into_token_stream())
    } else {
        Ok(value.parse::<P>()?.into_token_stream())
    }
}

/// Parses every `#[nmea(...)]` attribute written at `placement`, rejecting
/// misplaced, duplicated and conflicting attributes.
pub fn parse_attributes(attrs: &[Attribute], placement: Placement) -> Result<Vec<MetaAttribute>> {
    let mut seen = HashSet::new();
    let mut attributes = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("nmea")) {
        let list = attr.parse_args_with(Punctuated::<MetaAttribute, Token![,]>::parse_terminated)?;

        for attribute in list {
            let kind = attribute.kind;

            if !kind.allowed_at(placement) {
                let level = match placement {
                    Placement::Item => "the top level",
                    Placement::Field => "the field level",
                };
                return Err(Error::new(
                    attribute.span,
                    format!("nmea0183-stream-derive: Attribute `{kind}` is not allowed at {level}"),
                ));
            }

            if !seen.insert(kind) && !kind.repeatable() {
                return Err(Error::new(
                    attribute.span,
                    format!("nmea0183-stream-derive: Duplicate nmea attribute `{kind}`"),
                ));
            }

            if let Some(other) = kind.conflicts_with().filter(|other| seen.contains(other)) {
                return Err(Error::new(
                    attribute.span,
                    format!("nmea0183-stream-derive: Attribute `{kind}` cannot be used with `{other}`"),
                ));
            }

            attributes.push(attribute);
        }
    }

    Ok(attributes)
}

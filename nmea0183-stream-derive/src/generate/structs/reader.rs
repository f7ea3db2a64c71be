use proc_macro2::Span;
use syn::{Error, Fields, Ident, Index, Member, Result, Type, parse2};

use crate::{
    meta::{self, AttributeKind, MetaAttribute, Placement},
    reader::FieldReader,
};

#[derive(Clone)]
pub struct FieldEntry {
    pub variable_name: Ident,
    pub member: Member,
    pub reader: FieldReader,
    pub checksum: bool,
}

#[derive(Clone)]
pub struct StructReader {
    pub empty: bool,
    pub unnamed: bool,
    pub readers: Vec<FieldEntry>,
}

impl StructReader {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let (empty, unnamed) = match fields {
            Fields::Named(_) => (false, false),
            Fields::Unnamed(_) => (false, true),
            Fields::Unit => (true, false),
        };

        let mut readers = vec![];
        for (index, field) in fields.iter().enumerate() {
            let (variable_name, member) = match &field.ident {
                Some(ident) => (ident.clone(), Member::Named(ident.clone())),
                None => (
                    Ident::new(&format!("_nmea_unnamed_{index}"), Span::call_site()),
                    Member::Unnamed(Index::from(index)),
                ),
            };

            let attributes = meta::parse_attributes(&field.attrs, Placement::Field)?;
            if let Some(attribute) = attributes
                .iter()
                .find(|attribute| attribute.kind == AttributeKind::Selector)
            {
                return Err(Error::new(
                    attribute.span(),
                    "nmea0183-stream-derive: `selector` is only allowed on enums and their variants",
                ));
            }

            let checksum = attributes
                .iter()
                .any(|attribute| attribute.kind == AttributeKind::Checksum);
            let reader = Self::get_reader(&field.ty, &attributes)?;

            readers.push(FieldEntry {
                variable_name,
                member,
                reader,
                checksum,
            });
        }

        let mut checksums = readers.iter().filter(|entry| entry.checksum);
        if let (Some(_), Some(second)) = (checksums.next(), checksums.next()) {
            return Err(Error::new(
                second.variable_name.span(),
                "nmea0183-stream-derive: Only one field can be marked `checksum`",
            ));
        }

        Ok(Self {
            empty,
            unnamed,
            readers,
        })
    }

    pub fn checksum_member(&self) -> Option<&Member> {
        self.readers
            .iter()
            .find(|entry| entry.checksum)
            .map(|entry| &entry.member)
    }

    fn get_reader(ty: &Type, attributes: &[MetaAttribute]) -> Result<FieldReader> {
        let mut attributes = attributes;
        while let Some((attribute, rest)) = attributes.split_first() {
            match attribute.kind {
                AttributeKind::Reader => {
                    return Ok(FieldReader::Raw(attribute.required_arg()?.clone()));
                }
                AttributeKind::ReadAs => {
                    let read_as_type = parse2::<Type>(attribute.required_arg()?.clone())?;
                    return Self::get_reader(&read_as_type, rest);
                }
                AttributeKind::Ignore => {
                    return Ok(FieldReader::Ignore(Box::new(ty.clone())));
                }
                AttributeKind::Checksum => {
                    return Ok(FieldReader::Checksum);
                }
                AttributeKind::Into => {
                    let reader = Self::get_reader(ty, rest)?;
                    return Ok(FieldReader::Into(Box::new(reader)));
                }
                AttributeKind::Map => {
                    let map = attribute.required_arg()?.clone();
                    let reader = Self::get_reader(ty, rest)?;
                    return Ok(FieldReader::Map {
                        reader: Box::new(reader),
                        map,
                    });
                }
                _ => {}
            }

            attributes = rest;
        }

        Ok(FieldReader::Type(Box::new(ty.clone())))
    }
}

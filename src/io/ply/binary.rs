//! Decoding binary bodies.
//!
//! The decoder is generic over the byte order so that each encoding gets its
//! own monomorphized copy; the byte order is only dispatched once per file.
//! All reads go through an explicit offset that is passed in and returned
//! again.

use std::convert::TryFrom;

use byteorder::ByteOrder;
use smallvec::SmallVec;

use crate::io::Error;
use super::{
    header::Header,
    raw::{ElementDef, Property, PropertyType, RawSink, Record},
};


/// Decodes the binary body `body` (everything after the header) with byte
/// order `B` and passes each element to `sink`.
///
/// Every byte of `body` has to be consumed: leftover data means the header
/// doesn't describe the body correctly.
pub(crate) fn read_body<B: ByteOrder>(
    header: &Header,
    body: &[u8],
    sink: &mut impl RawSink,
) -> Result<(), Error> {
    let mut offset = 0;
    let mut properties = Vec::new();

    for def in &header.elements {
        sink.element_group_start(def)?;

        // Every instance occupies at least `min_record_len` bytes, so a bogus
        // count is rejected here instead of looping until the body runs out.
        // The header parser guarantees that elements with instances have at
        // least one property, so the minimum is never 0 in that case.
        let min_len = min_record_len(def);
        let available = body.len() - offset;
        let needed = def.count.saturating_mul(min_len as u64);
        if needed > available as u64 {
            return Err(Error::BufferUnderrun {
                offset,
                needed: usize::try_from(needed).unwrap_or(usize::MAX),
                available,
            });
        }

        for _ in 0..def.count {
            properties.clear();
            offset = read_element::<B>(body, offset, def, &mut properties)?;
            sink.element(Record::new(def, &properties))?;
        }
    }

    if offset != body.len() {
        return Err(Error::TrailingData(format!("byte {}", header.len + offset)));
    }

    Ok(())
}

/// The number of bytes one instance of `def` needs at least: lists count
/// with their length prefix only.
fn min_record_len(def: &ElementDef) -> usize {
    def.property_defs.iter()
        .map(|p| match p.ty {
            PropertyType::Scalar(ty) => ty.len(),
            PropertyType::List { len_type, .. } => len_type.len(),
        })
        .sum()
}

/// Reads one element starting at `offset` and returns the offset directly
/// after it.
fn read_element<B: ByteOrder>(
    buf: &[u8],
    mut offset: usize,
    def: &ElementDef,
    out: &mut Vec<Property>,
) -> Result<usize, Error> {
    for prop in &def.property_defs {
        let value = match prop.ty {
            PropertyType::Scalar(ty) => {
                let (value, next) = ty.read_binary::<B>(buf, offset)?;
                offset = next;
                Property::Scalar(value)
            }
            PropertyType::List { len_type, scalar_type } => {
                let (len, next) = len_type.read_binary::<B>(buf, offset)?;
                let len = len.as_len().ok_or_else(|| Error::InvalidListLength {
                    element: def.name.clone(),
                    property: prop.name.clone(),
                    value: len.to_string(),
                })?;
                offset = next;

                // We don't reserve `len` items up front: the length comes
                // straight from the file and might be garbage.
                let mut list = SmallVec::new();
                for _ in 0..len {
                    let (item, next) = scalar_type.read_binary::<B>(buf, offset)?;
                    offset = next;
                    list.push(item);
                }
                Property::List(list)
            }
        };

        out.push(value);
    }

    Ok(offset)
}

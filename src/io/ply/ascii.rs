//! Decoding ASCII bodies.

use smallvec::SmallVec;

use crate::io::Error;
use super::{
    header::Header,
    raw::{ElementDef, Property, PropertyType, RawSink, Record},
    scalar::{Scalar, ScalarType},
};


/// Decodes the ASCII body `body` (everything after the header) and passes
/// each element to `sink`.
pub(crate) fn read_body(
    header: &Header,
    body: &[u8],
    sink: &mut impl RawSink,
) -> Result<(), Error> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::NotAscii(header.len + e.valid_up_to()))?;

    // Line numbers are 1-based and count from the start of the body.
    let mut lines = text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    // Keep this vector on the outside to retain allocations
    let mut properties = Vec::new();

    for def in &header.elements {
        sink.element_group_start(def)?;

        for found in 0..def.count {
            let (line_no, line) = lines.next().ok_or_else(|| Error::TruncatedInput {
                element: def.name.clone(),
                expected: def.count,
                found,
            })?;

            properties.clear();
            parse_line(def, line, line_no, &mut properties)?;
            sink.element(Record::new(def, &properties))?;
        }
    }

    match lines.next() {
        Some((line_no, _)) => Err(Error::TrailingData(format!("body line {}", line_no))),
        None => Ok(()),
    }
}

/// Parses one element with all its properties as described by `def`.
/// Tokens after the last property are ignored.
fn parse_line(
    def: &ElementDef,
    line: &str,
    line_no: usize,
    out: &mut Vec<Property>,
) -> Result<(), Error> {
    let mut tokens = line.split_whitespace();

    for prop in &def.property_defs {
        let mut next = |ty: ScalarType| -> Result<Scalar, Error> {
            let token = tokens.next().ok_or_else(|| Error::MalformedRecord {
                element: def.name.clone(),
                line: line_no,
            })?;

            ty.parse_ascii(token).ok_or_else(|| Error::InvalidValue {
                element: def.name.clone(),
                property: prop.name.clone(),
                token: token.to_string(),
                ty,
                line: line_no,
            })
        };

        let value = match prop.ty {
            PropertyType::Scalar(ty) => Property::Scalar(next(ty)?),
            PropertyType::List { len_type, scalar_type } => {
                let len = next(len_type)?;
                let len = len.as_len().ok_or_else(|| Error::InvalidListLength {
                    element: def.name.clone(),
                    property: prop.name.clone(),
                    value: len.to_string(),
                })?;

                let mut list = SmallVec::new();
                for _ in 0..len {
                    list.push(next(scalar_type)?);
                }
                Property::List(list)
            }
        };

        out.push(value);
    }

    Ok(())
}

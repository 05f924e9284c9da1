//! Parsing the PLY header into a [`Header`].
//!
//! The header is scanned byte by byte instead of being split on a decoded
//! string. That way we know exactly where the body starts, which matters
//! for binary files where the body isn't text.

use tracing::{debug, warn};

use crate::io::{debug_fmt_bytes, Error};
use super::{
    Config, Encoding,
    raw::{ElementDef, PropertyDef, PropertyType},
    scalar::ScalarType,
};


/// The parsed header of a PLY file: the schema of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub encoding: Encoding,

    /// The version string from the `format` line (virtually always `1.0`).
    pub version: String,

    /// All `comment` lines, without the leading keyword.
    pub comments: Vec<String>,

    /// All element groups in declaration order, which is also the order in
    /// which they appear in the body.
    pub elements: Vec<ElementDef>,

    /// Header lines with an unknown keyword (e.g. `obj_info`). These are
    /// skipped while parsing.
    pub unknown_lines: Vec<String>,

    /// Length of the header in bytes, including the linebreak after
    /// `end_header`. The body starts at this offset.
    pub len: usize,
}

impl Header {
    /// Parses the header at the beginning of `data`. Property names are mapped
    /// with the name mapping of `config`.
    ///
    /// Only the header is looked at, the body is not touched.
    pub fn parse(data: &[u8], config: &Config) -> Result<Self, Error> {
        let mut parser = HeaderParser::new(config);
        let mut line_start = 0;

        for (i, &b) in data.iter().enumerate() {
            if b == b'\n' {
                if parser.line(&data[line_start..i])? == LineKind::End {
                    return parser.finish(i + 1);
                }
                line_start = i + 1;
            }
        }

        // The input might end directly after `end_header` without linebreak.
        if line_start < data.len() && parser.line(&data[line_start..])? == LineKind::End {
            return parser.finish(data.len());
        }

        if !parser.magic_seen {
            Err(Error::MissingMagic)
        } else {
            Err(Error::MissingEndHeader)
        }
    }

    /// Returns the element group with the given name.
    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Normal,
    End,
}

/// State while parsing the header line by line.
struct HeaderParser<'a> {
    config: &'a Config,
    line_no: usize,
    magic_seen: bool,
    /// Line number of the last `element` line.
    element_line: usize,
    format: Option<(Encoding, String)>,
    comments: Vec<String>,
    elements: Vec<ElementDef>,
    unknown_lines: Vec<String>,
}

impl<'a> HeaderParser<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            line_no: 0,
            magic_seen: false,
            element_line: 0,
            format: None,
            comments: Vec::new(),
            elements: Vec::new(),
            unknown_lines: Vec::new(),
        }
    }

    fn line(&mut self, raw: &[u8]) -> Result<LineKind, Error> {
        self.line_no += 1;

        // The first non-empty line is the magic number. We check it before
        // anything else so that random binary data is rejected early.
        if !self.magic_seen {
            return match std::str::from_utf8(raw).map(str::trim) {
                Ok("") => Ok(LineKind::Normal),
                Ok("ply") => {
                    self.magic_seen = true;
                    Ok(LineKind::Normal)
                }
                _ => Err(Error::MissingMagic),
            };
        }

        let line = std::str::from_utf8(raw)
            .map_err(|_| self.error(debug_fmt_bytes(raw), "header is not valid ASCII"))?
            .trim();

        let mut words = line.split_whitespace();
        let keyword = match words.next() {
            Some(k) => k,
            None => return Ok(LineKind::Normal),
        };
        let args = words.collect::<Vec<_>>();

        match keyword {
            "end_header" => {
                if !args.is_empty() {
                    return Err(self.error(line, "unexpected data after 'end_header'"));
                }
                self.check_last_element()?;
                return Ok(LineKind::End);
            }

            // Format line, e.g. `format binary_little_endian 1.0`
            "format" => {
                if self.format.is_some() {
                    return Err(self.error(line, "duplicate 'format' line"));
                }
                if args.len() != 2 {
                    return Err(self.error(line, "expected 'format <encoding> <version>'"));
                }

                let encoding = match args[0] {
                    "ascii" => Encoding::Ascii,
                    "binary_little_endian" => Encoding::BinaryLittleEndian,
                    "binary_big_endian" => Encoding::BinaryBigEndian,
                    other => {
                        let msg = format!(
                            "expected \"ascii\", \"binary_little_endian\" or \
                                \"binary_big_endian\", found {:?}",
                            other,
                        );
                        return Err(self.error(line, msg));
                    }
                };

                self.format = Some((encoding, args[1].to_string()));
            }

            "comment" => {
                self.comments.push(line["comment".len()..].trim_start().to_string());
            }

            // Element definition, e.g. `element vertex 8`
            "element" => {
                if args.len() != 2 {
                    return Err(self.error(line, "expected 'element <name> <count>'"));
                }

                let count = args[1].parse::<u64>().map_err(|e| {
                    self.error(line, format!("invalid integer as element count ({})", e))
                })?;

                self.check_last_element()?;
                self.element_line = self.line_no;
                self.elements.push(ElementDef {
                    name: args[0].to_string(),
                    count,
                    property_defs: vec![],
                });
            }

            // Property definition, e.g. `property float x` or
            // `property list uchar int vertex_index`
            "property" => {
                let (ty, name) = match args.as_slice() {
                    ["list", len_type, scalar_type, name] => {
                        let len_type = self.scalar_type(line, len_type)?;
                        let scalar_type = self.scalar_type(line, scalar_type)?;

                        // A floating point list length doesn't make any sense.
                        if !len_type.is_integer() {
                            return Err(self.error(
                                line,
                                "only integers can be used to store list lengths",
                            ));
                        }

                        (PropertyType::List { len_type, scalar_type }, name)
                    }
                    [ty, name] if *ty != "list" => {
                        (PropertyType::Scalar(self.scalar_type(line, ty)?), name)
                    }
                    _ => {
                        return Err(self.error(
                            line,
                            "expected 'property <type> <name>' or \
                                'property list <count type> <item type> <name>'",
                        ));
                    }
                };

                let name = self.config.map_name(name);
                let elem = match self.elements.last_mut() {
                    Some(elem) => elem,
                    None => {
                        return Err(self.error(
                            line,
                            "property definition without preceding element definition",
                        ));
                    }
                };

                elem.property_defs.push(PropertyDef { ty, name });
            }

            // Something else. We skip these to be compatible with extensions
            // like `obj_info`.
            other => {
                warn!(line = self.line_no, keyword = other, "skipping unknown PLY header line");
                self.unknown_lines.push(line.to_string());
            }
        }

        Ok(LineKind::Normal)
    }

    /// An element with instances but without properties has no
    /// representation in the body, so its count can't be checked against the
    /// data.
    fn check_last_element(&self) -> Result<(), Error> {
        match self.elements.last() {
            Some(elem) if elem.count > 0 && elem.property_defs.is_empty() => {
                Err(Error::InvalidHeaderLine {
                    line: self.element_line,
                    content: format!("element {} {}", elem.name, elem.count),
                    msg: "element has instances, but no properties".into(),
                })
            }
            _ => Ok(()),
        }
    }

    fn scalar_type(&self, line: &str, word: &str) -> Result<ScalarType, Error> {
        word.parse::<ScalarType>().map_err(|e| self.error(line, e.to_string()))
    }

    fn error(&self, line: impl Into<String>, msg: impl Into<String>) -> Error {
        Error::InvalidHeaderLine {
            line: self.line_no,
            content: line.into(),
            msg: msg.into(),
        }
    }

    fn finish(self, len: usize) -> Result<Header, Error> {
        let (encoding, version) = self.format.ok_or(Error::MissingFormat)?;

        debug!(
            ?encoding,
            elements = self.elements.len(),
            header_len = len,
            "parsed PLY header"
        );

        Ok(Header {
            encoding,
            version,
            comments: self.comments,
            elements: self.elements,
            unknown_lines: self.unknown_lines,
            len,
        })
    }
}

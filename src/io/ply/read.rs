use byteorder::{BigEndian, LittleEndian};

use crate::{
    io::Error,
    mesh::{Mesh, MeshBuilder},
};
use super::{
    ascii, binary, Config, Encoding,
    header::Header,
    raw::{RawResult, RawSink},
};


/// A reader able to decode PLY data from a byte buffer.
///
/// Creating a reader parses the header; the body is only decoded by one of
/// the `read_*` methods. Most of the time you want [`decode`][super::decode]
/// instead, which does both in one step.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    header: Header,
    body: &'a [u8],
    config: &'a Config,
}

impl<'a> Reader<'a> {
    /// Parses the header of `data` and creates a reader for the remaining
    /// body.
    pub fn new(data: &'a [u8], config: &'a Config) -> Result<Self, Error> {
        let header = Header::parse(data, config)?;
        let body = &data[header.len..];

        Ok(Self { header, body, config })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn encoding(&self) -> Encoding {
        self.header.encoding
    }

    /// Decodes the whole body into the given raw sink.
    ///
    /// This is a low level building block that you usually don't want to use
    /// directly.
    pub fn read_raw_into(&self, sink: &mut impl RawSink) -> Result<(), Error> {
        match self.header.encoding {
            Encoding::Ascii => ascii::read_body(&self.header, self.body, sink),
            Encoding::BinaryBigEndian => {
                binary::read_body::<BigEndian>(&self.header, self.body, sink)
            }
            Encoding::BinaryLittleEndian => {
                binary::read_body::<LittleEndian>(&self.header, self.body, sink)
            }
        }
    }

    /// Decodes the whole body into a [`RawResult`].
    pub fn read_raw(&self) -> Result<RawResult, Error> {
        let mut out = RawResult::default();
        self.read_raw_into(&mut out)?;
        Ok(out)
    }

    /// Decodes the whole body and assembles a [`Mesh`] from the `vertex` and
    /// `face` elements.
    pub fn read_mesh(&self) -> Result<Mesh, Error> {
        let mut builder = MeshBuilder::new(self.config);
        self.read_raw_into(&mut builder)?;

        let mut mesh = builder.finish()?;
        mesh.comments = self.header.comments.clone();
        Ok(mesh)
    }
}

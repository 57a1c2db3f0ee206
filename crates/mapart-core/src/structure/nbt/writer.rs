use std::io::{self, ErrorKind, Write};

use super::tag::{Compound, List, Tag, TagType};
use super::Endian;

/// Streams tags to a byte sink under one byte order.
pub struct NbtWriter<W: Write> {
    inner: W,
    endian: Endian,
}

impl<W: Write> NbtWriter<W> {
    pub fn new(inner: W, endian: Endian) -> Self {
        Self { inner, endian }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.inner.write_all(&[v])
    }

    fn write_u16(&mut self, v: u16) -> io::Result<()> {
        match self.endian {
            Endian::Big => self.inner.write_all(&v.to_be_bytes()),
            Endian::Little => self.inner.write_all(&v.to_le_bytes()),
        }
    }

    fn write_i32(&mut self, v: i32) -> io::Result<()> {
        match self.endian {
            Endian::Big => self.inner.write_all(&v.to_be_bytes()),
            Endian::Little => self.inner.write_all(&v.to_le_bytes()),
        }
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let len = u16::try_from(s.len())
            .map_err(|_| io::Error::new(ErrorKind::InvalidInput, format!("string of {} bytes is too long", s.len())))?;
        self.write_u16(len)?;
        self.inner.write_all(s.as_bytes())
    }

    fn write_len(&mut self, len: usize) -> io::Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| io::Error::new(ErrorKind::InvalidInput, format!("list of {len} items is too long")))?;
        self.write_i32(len)
    }

    /// Write a named root compound.
    pub fn write_root(&mut self, name: &str, root: &Compound) -> io::Result<()> {
        self.write_u8(TagType::Compound.id())?;
        self.write_str(name)?;
        self.write_compound(root)
    }

    fn write_payload(&mut self, tag: &Tag) -> io::Result<()> {
        match tag {
            Tag::Int(v) => self.write_i32(*v),
            Tag::String(s) => self.write_str(s),
            Tag::List(l) => self.write_list(l),
            Tag::Compound(c) => self.write_compound(c),
        }
    }

    fn write_list(&mut self, list: &List) -> io::Result<()> {
        self.write_u8(list.element().id())?;
        self.write_len(list.len())?;
        for item in list.items() {
            self.write_payload(item)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> io::Result<()> {
        for (name, tag) in compound.iter() {
            self.write_u8(tag.tag_type().id())?;
            self.write_str(name)?;
            self.write_payload(tag)?;
        }
        self.write_u8(TagType::End.id())
    }
}

/// Encode a named root compound into a fresh buffer.
pub fn write_root(name: &str, root: &Compound, endian: Endian) -> io::Result<Vec<u8>> {
    let mut writer = NbtWriter::new(Vec::new(), endian);
    writer.write_root(name, root)?;
    Ok(writer.into_inner())
}

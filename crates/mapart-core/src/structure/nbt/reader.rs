use std::io::{self, Read};

use super::tag::{Compound, List, Tag, TagType};
use super::Endian;
use crate::structure::StructureError;

/// Nesting depth at which decoding gives up.
const MAX_DEPTH: usize = 64;

/// Decodes the tag subset written by [`NbtWriter`](super::NbtWriter).
pub struct NbtReader<R: Read> {
    inner: R,
    endian: Endian,
}

fn decode(msg: impl Into<String>) -> StructureError {
    StructureError::Decode(msg.into())
}

impl<R: Read> NbtReader<R> {
    pub fn new(inner: R, endian: Endian) -> Self {
        Self { inner, endian }
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_u16(&mut self) -> io::Result<u16> {
        let mut b = [0u8; 2];
        self.inner.read_exact(&mut b)?;
        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes(b),
            Endian::Little => u16::from_le_bytes(b),
        })
    }

    fn read_i32(&mut self) -> io::Result<i32> {
        let mut b = [0u8; 4];
        self.inner.read_exact(&mut b)?;
        Ok(match self.endian {
            Endian::Big => i32::from_be_bytes(b),
            Endian::Little => i32::from_le_bytes(b),
        })
    }

    fn read_str(&mut self) -> Result<String, StructureError> {
        let len = self.read_u16()? as usize;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| decode(format!("invalid UTF-8 in string: {e}")))
    }

    fn read_type(&mut self) -> Result<TagType, StructureError> {
        let id = self.read_u8()?;
        TagType::from_id(id).ok_or_else(|| decode(format!("unsupported tag type {id}")))
    }

    /// Read a named root compound.
    pub fn read_root(&mut self) -> Result<(String, Compound), StructureError> {
        let kind = self.read_type()?;
        if kind != TagType::Compound {
            return Err(decode(format!("root must be a compound, found {kind:?}")));
        }
        let name = self.read_str()?;
        let root = self.read_compound(0)?;
        Ok((name, root))
    }

    fn read_payload(&mut self, kind: TagType, depth: usize) -> Result<Tag, StructureError> {
        if depth > MAX_DEPTH {
            return Err(decode("tags nested too deeply"));
        }
        Ok(match kind {
            TagType::Int => Tag::Int(self.read_i32()?),
            TagType::String => Tag::String(self.read_str()?),
            TagType::List => Tag::List(self.read_list(depth + 1)?),
            TagType::Compound => Tag::Compound(self.read_compound(depth + 1)?),
            TagType::End => return Err(decode("unexpected end tag")),
        })
    }

    fn read_list(&mut self, depth: usize) -> Result<List, StructureError> {
        let element = self.read_type()?;
        let len = self.read_i32()?;
        let len = usize::try_from(len).map_err(|_| decode(format!("negative list length {len}")))?;
        if element == TagType::End {
            if len != 0 {
                return Err(decode("non-empty list of end tags"));
            }
            return Ok(List::empty(TagType::End));
        }
        let mut items = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            items.push(self.read_payload(element, depth)?);
        }
        List::from_items(element, items).ok_or_else(|| decode("heterogeneous list"))
    }

    fn read_compound(&mut self, depth: usize) -> Result<Compound, StructureError> {
        let mut compound = Compound::new();
        loop {
            let kind = self.read_type()?;
            if kind == TagType::End {
                return Ok(compound);
            }
            let name = self.read_str()?;
            let value = self.read_payload(kind, depth)?;
            compound.insert(name, value);
        }
    }
}

/// Decode a named root compound from a byte slice.
pub fn read_root(bytes: &[u8], endian: Endian) -> Result<(String, Compound), StructureError> {
    NbtReader::new(bytes, endian).read_root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::nbt::write_root;

    fn sample() -> Compound {
        Compound::new()
            .with("format_version", 1)
            .with("name", "minecraft:red_wool")
            .with("size", List::ints([3, 1, 2]))
            .with("indices", List::lists([List::ints([0, 1, 0]), List::ints([-1, -1, -1])]))
            .with("entities", List::empty(TagType::Compound))
            .with("palette", List::compounds([Compound::new().with("Name", "minecraft:air")]))
    }

    #[test]
    fn test_round_trip_both_orders() {
        for endian in [Endian::Big, Endian::Little] {
            let bytes = write_root("root", &sample(), endian).unwrap();
            let (name, decoded) = read_root(&bytes, endian).unwrap();
            assert_eq!(name, "root");
            assert_eq!(decoded, sample());
        }
    }

    #[test]
    fn test_truncated_input_is_io_error() {
        let bytes = write_root("", &sample(), Endian::Big).unwrap();
        let err = read_root(&bytes[..bytes.len() - 3], Endian::Big).unwrap_err();
        assert!(matches!(err, StructureError::Io(_)));
    }

    #[test]
    fn test_unknown_tag_is_decode_error() {
        let err = read_root(&[10, 0, 0, 6, 0, 1, b'd'], Endian::Big).unwrap_err();
        assert!(matches!(err, StructureError::Decode(_)));
    }

    #[test]
    fn test_non_compound_root_rejected() {
        let err = read_root(&[3, 0, 0, 0, 0, 0, 1], Endian::Big).unwrap_err();
        assert!(matches!(err, StructureError::Decode(_)));
    }
}

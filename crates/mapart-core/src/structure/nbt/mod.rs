//! Minimal NBT codec: Int, String, List and Compound tags.
//!
//! One codec serves both byte orders. The declared [`Endian`] applies to
//! every multi-byte field alike: ints, list lengths and string length
//! prefixes.

mod reader;
mod tag;
mod writer;

pub use reader::{read_root, NbtReader};
pub use tag::{Compound, List, Tag, TagType};
pub use writer::{write_root, NbtWriter};

/// Byte order of an NBT stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Java Edition files.
    Big,
    /// Bedrock Edition files.
    Little,
}

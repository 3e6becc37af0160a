//! Decoding the memory section.
//!
//! A memory section holds a vector of memory types. Each one is a limits descriptor:
//!
//! ```text
//! limits ::= 0x00 min:u32
//!          | 0x01 min:u32 max:u32
//! ```
//!
//! Only single-memory modules are supported. The maximum, when present, follows the minimum, so
//! the initial page count sits at the same offset whichever flag is set.

use crate::{
    error::Error,
    leb128,
    section::{Section, MEMORY_SECTION_ID},
};

/// The limits flag for a memory without a maximum.
pub const FLAG_NO_MAXIMUM: u64 = 0x00;
/// The limits flag for a memory with a maximum.
pub const FLAG_HAS_MAXIMUM: u64 = 0x01;

/// A varint decoded from a module, along with where its encoding sits in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedField {
    pub value: u64,
    /// Absolute file offset of the first encoded byte.
    pub offset: u64,
    /// Number of bytes in the encoding.
    pub width: usize,
}

/// The limits of the single memory a module declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryLimits {
    count: u64,
    flag: u64,
    initial: EncodedField,
    maximum: Option<EncodedField>,
}

impl MemoryLimits {
    /// The number of memories declared. Always 1.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The raw limits flag, [`FLAG_NO_MAXIMUM`] or [`FLAG_HAS_MAXIMUM`].
    pub fn flag(&self) -> u64 {
        self.flag
    }

    pub fn initial(&self) -> &EncodedField {
        &self.initial
    }

    pub fn initial_pages(&self) -> u64 {
        self.initial.value
    }

    pub fn initial_pages_offset(&self) -> u64 {
        self.initial.offset
    }

    pub fn initial_pages_width(&self) -> usize {
        self.initial.width
    }

    pub fn maximum(&self) -> Option<&EncodedField> {
        self.maximum.as_ref()
    }

    /// The maximum page count, or `None` if the memory is unlimited.
    pub fn maximum_pages(&self) -> Option<u64> {
        self.maximum.map(|max| max.value)
    }
}

/// A memory section together with its decoded limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemorySection {
    section: Section,
    limits: MemoryLimits,
}

impl MemorySection {
    /// Decode the limits held by a memory section.
    pub fn decode(section: Section) -> Result<Self, Error> {
        if section.id != MEMORY_SECTION_ID {
            return Err(Error::NotMemorySection { id: section.id });
        }

        let limits = {
            let mut fields = FieldReader {
                content: &section.content,
                base: section.content_offset,
                consumed: 0,
            };

            let count = fields.next("memory count")?.value;
            if count != 1 {
                return Err(Error::MultiMemory { count });
            }

            let flag = fields.next("memory limits flag")?.value;
            if flag != FLAG_NO_MAXIMUM && flag != FLAG_HAS_MAXIMUM {
                return Err(Error::UnsupportedLimits { flag });
            }

            let initial = fields.next("initial pages")?;
            let maximum = if flag == FLAG_HAS_MAXIMUM {
                Some(fields.next("maximum pages")?)
            } else {
                None
            };

            MemoryLimits {
                count,
                flag,
                initial,
                maximum,
            }
        };

        Ok(Self { section, limits })
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn limits(&self) -> &MemoryLimits {
        &self.limits
    }
}

/// Reads consecutive varints out of section content, tracking their absolute file offsets.
struct FieldReader<'a> {
    content: &'a [u8],
    base: u64,
    consumed: usize,
}

impl FieldReader<'_> {
    fn next(&mut self, context: &'static str) -> Result<EncodedField, Error> {
        let offset = self.base + self.consumed as u64;
        let mut rest = &self.content[self.consumed..];
        let (value, width) = leb128::read_u64(&mut rest).map_err(|source| Error::Stream {
            context,
            offset,
            source,
        })?;
        self.consumed += width;
        Ok(EncodedField {
            value,
            offset,
            width,
        })
    }
}

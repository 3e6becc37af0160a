//! Walking the top-level sections of a core WebAssembly module.

use {
    crate::{error::Error, leb128},
    std::{
        fmt,
        io::{self, Read, Seek},
    },
    tracing::trace,
};

/// The `\0asm` magic followed by binary format version 1.
pub const PREAMBLE: [u8; 8] = *b"\0asm\x01\x00\x00\x00";

/// The id of the memory section.
pub const MEMORY_SECTION_ID: u8 = 5;

/// Read the 8-byte module preamble, failing unless it names a version 1 core module.
pub fn read_preamble<R: Read + ?Sized>(reader: &mut R) -> Result<(), Error> {
    let mut preamble = Vec::with_capacity(PREAMBLE.len());
    reader
        .take(PREAMBLE.len() as u64)
        .read_to_end(&mut preamble)?;

    if preamble.len() < PREAMBLE.len() {
        return Err(Error::TruncatedPreamble {
            len: preamble.len(),
        });
    }
    if preamble == PREAMBLE {
        Ok(())
    } else if wasmparser::Parser::is_component(&preamble) {
        Err(Error::Component)
    } else {
        Err(Error::FileFormat)
    }
}

/// The semantic kind of a section, as named by its id byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Custom,
    Type,
    Import,
    Function,
    Table,
    Memory,
    Global,
    Export,
    Start,
    Element,
    Code,
    Data,
    DataCount,
    Tag,
    Unknown(u8),
}

impl From<u8> for SectionKind {
    fn from(id: u8) -> Self {
        match id {
            0 => Self::Custom,
            1 => Self::Type,
            2 => Self::Import,
            3 => Self::Function,
            4 => Self::Table,
            MEMORY_SECTION_ID => Self::Memory,
            6 => Self::Global,
            7 => Self::Export,
            8 => Self::Start,
            9 => Self::Element,
            10 => Self::Code,
            11 => Self::Data,
            12 => Self::DataCount,
            13 => Self::Tag,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Custom => "custom",
            Self::Type => "type",
            Self::Import => "import",
            Self::Function => "function",
            Self::Table => "table",
            Self::Memory => "memory",
            Self::Global => "global",
            Self::Export => "export",
            Self::Start => "start",
            Self::Element => "element",
            Self::Code => "code",
            Self::Data => "data",
            Self::DataCount => "data count",
            Self::Tag => "tag",
            Self::Unknown(id) => return write!(f, "unknown ({id})"),
        };
        f.write_str(name)
    }
}

/// One length-prefixed section of a module, with its absolute position in the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// The id byte.
    pub id: u8,
    /// Absolute offset of the id byte.
    pub header_offset: u64,
    /// Absolute offset of the first content byte, just past the length varint.
    pub content_offset: u64,
    /// Content length, as declared by the length varint.
    pub size: u64,
    /// The raw content; `content.len() == size`.
    pub content: Vec<u8>,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        SectionKind::from(self.id)
    }

    /// Absolute offset one past the last content byte. For every section but the last, this is
    /// the `header_offset` of the section that follows.
    pub fn end(&self) -> u64 {
        self.content_offset + self.size
    }
}

/// An iterator over the sections of a module, read lazily from a stream positioned just past
/// the preamble.
///
/// The iterator yields `None` once the stream ends cleanly on a section boundary. After an
/// error it yields nothing further.
pub struct Sections<R> {
    reader: R,
    position: u64,
    done: bool,
}

impl<R: Read + Seek> Sections<R> {
    pub fn new(mut reader: R) -> Result<Self, Error> {
        let position = reader.stream_position()?;
        Ok(Self {
            reader,
            position,
            done: false,
        })
    }

    fn read_section(&mut self) -> Result<Option<Section>, Error> {
        let mut id = [0u8; 1];
        match self.reader.read_exact(&mut id) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let id = id[0];
        let header_offset = self.position;
        self.position += 1;

        let (size, width) =
            leb128::read_u64(&mut self.reader).map_err(|source| Error::Stream {
                context: "section length",
                offset: self.position,
                source,
            })?;
        self.position += width as u64;
        let content_offset = self.position;

        // Bounded by `take`, so a bogus length cannot force a huge allocation up front.
        let mut content = Vec::new();
        (&mut self.reader).take(size).read_to_end(&mut content)?;
        let available = content.len() as u64;
        if available != size {
            return Err(Error::TruncatedSection {
                id,
                offset: header_offset,
                size,
                available,
            });
        }
        self.position += size;

        let section = Section {
            id,
            header_offset,
            content_offset,
            size,
            content,
        };
        trace!(
            "{} section at {:#x} (content at {:#x}, {} bytes)",
            section.kind(),
            section.header_offset,
            section.content_offset,
            section.size
        );
        Ok(Some(section))
    }
}

impl<R: Read + Seek> Iterator for Sections<R> {
    type Item = Result<Section, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_section() {
            Ok(Some(section)) => Some(Ok(section)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> std::iter::FusedIterator for Sections<R> {}

//! Fixed-width, in-place patches.
//!
//! A [`Patch`] replaces the bytes of one encoded field with a new encoding of exactly the same
//! width. Nothing before or after the field moves, so every other offset in the module stays
//! valid.

use {
    crate::{error::Error, leb128, memory::MemoryLimits, MAX_PAGES},
    std::{
        fs::OpenOptions,
        io::{Seek, SeekFrom, Write},
        path::Path,
    },
    tracing::debug,
};

/// A new encoding for a single field, planned against its original offset and width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    offset: u64,
    width: usize,
    bytes: Vec<u8>,
}

impl Patch {
    /// Plan a patch that sets a memory's initial page count to `pages`.
    ///
    /// All range checks happen here, before anything is written.
    pub fn initial_pages(limits: &MemoryLimits, pages: u64) -> Result<Self, Error> {
        if pages > MAX_PAGES {
            return Err(Error::TooManyPages { pages });
        }
        if let Some(maximum) = limits.maximum_pages() {
            if pages > maximum {
                return Err(Error::ExceedsMaximum { pages, maximum });
            }
        }

        let field = limits.initial();
        let bytes = leb128::encode_fixed(pages, field.width)?;
        Ok(Self {
            offset: field.offset,
            width: field.width,
            bytes,
        })
    }

    /// Absolute file offset the patch is written at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Width of the field being replaced.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn check_width(&self) -> Result<(), Error> {
        if self.bytes.len() != self.width {
            return Err(Error::WidthMismatch {
                expected: self.width,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Write the patch into `writer`, returning the number of bytes written.
    ///
    /// The write is a single call; anything short of the full width is an error.
    pub fn write_to<W: Write + Seek>(&self, writer: &mut W) -> Result<usize, Error> {
        self.check_width()?;
        writer.seek(SeekFrom::Start(self.offset))?;
        let written = writer.write(&self.bytes)?;
        if written != self.width {
            return Err(Error::ShortWrite {
                written,
                expected: self.width,
                offset: self.offset,
            });
        }
        writer.flush()?;
        Ok(written)
    }

    /// Apply the patch to the file at `path` in place, returning the number of bytes written.
    ///
    /// The file is opened for writing without truncation. A patch that would reach past the end
    /// of the file is refused before anything is written.
    pub fn apply(&self, path: impl AsRef<Path>) -> Result<usize, Error> {
        self.check_width()?;
        let mut file = OpenOptions::new().write(true).open(path.as_ref())?;

        let len = file.metadata()?.len();
        let end = self.offset.checked_add(self.width as u64);
        if end.map_or(true, |end| end > len) {
            return Err(Error::OutOfBounds {
                offset: self.offset,
                width: self.width,
                len,
            });
        }

        let written = self.write_to(&mut file)?;
        file.sync_all()?;
        debug!(
            "patched {} at {:#x}: {:02x?}",
            path.as_ref().display(),
            self.offset,
            self.bytes
        );
        Ok(written)
    }
}

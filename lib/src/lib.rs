//! wasm-pages implementation details.
//!
//! This crate finds the memory section of a core WebAssembly module and rewrites the encoded
//! initial page count in place, without changing the length of the file.

// When building the project in release mode:
//   (1): Promote warnings into errors.
//   (2): Deny broken documentation links.
//   (3): Deny invalid codeblock attributes in documentation.
//   (4): Promote warnings in examples into errors, except for unused variables.
#![cfg_attr(not(debug_assertions), deny(warnings))]
#![cfg_attr(not(debug_assertions), deny(clippy::all))]
#![cfg_attr(not(debug_assertions), deny(rustdoc::broken_intra_doc_links))]
#![cfg_attr(not(debug_assertions), deny(rustdoc::invalid_codeblock_attributes))]
#![cfg_attr(not(debug_assertions), doc(test(attr(deny(warnings)))))]
#![cfg_attr(not(debug_assertions), doc(test(attr(allow(dead_code)))))]
#![cfg_attr(not(debug_assertions), doc(test(attr(allow(unused_variables)))))]

pub mod config;
pub mod error;
pub mod leb128;
pub mod memory;
pub mod patch;
pub mod section;

pub use {
    error::Error,
    memory::{MemoryLimits, MemorySection},
    patch::Patch,
    section::{Section, Sections},
};

use {
    std::{
        fs::File,
        io::{BufReader, Read, Seek},
        path::Path,
    },
    tracing::debug,
};

/// The size of a WebAssembly page, in bytes.
pub const PAGE_SIZE: u64 = 64 * 1024;

/// The largest page count a 32-bit memory can declare: 4 GiB of 64 KiB pages.
pub const MAX_PAGES: u64 = 1 << 16;

/// Find and decode the memory section of a module read from `reader`.
///
/// The reader must be positioned at the start of the module. Returns `Ok(None)` if the module
/// has no memory section.
pub fn inspect<R: Read + Seek>(mut reader: R) -> Result<Option<MemorySection>, Error> {
    section::read_preamble(&mut reader)?;
    for section in Sections::new(reader)? {
        let section = section?;
        if section.id == section::MEMORY_SECTION_ID {
            return MemorySection::decode(section).map(Some);
        }
    }
    Ok(None)
}

/// Find and decode the memory section of the module at `path`.
pub fn inspect_file(path: impl AsRef<Path>) -> Result<Option<MemorySection>, Error> {
    let path = path.as_ref();
    debug!("scanning {}", path.display());
    let file = File::open(path)?;
    inspect(BufReader::new(file))
}

//! Error types.

use {crate::leb128::VarintError, std::io};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The file does not start with the `\0asm` magic and a version 1 header.
    #[error("Expected a WebAssembly (version 1) module")]
    FileFormat,

    /// The file carries a component-model preamble rather than a core module's.
    #[error("Expected a core WebAssembly module, found a component")]
    Component,

    #[error("Truncated module preamble: {len} of 8 bytes present")]
    TruncatedPreamble { len: usize },

    /// A varint could not be decoded. `offset` is the absolute file offset where its encoding
    /// begins, and `context` names the field being read.
    #[error("Malformed {context} at offset {offset:#x}")]
    Stream {
        context: &'static str,
        offset: u64,
        #[source]
        source: VarintError,
    },

    /// A section header declares more content than the file holds.
    #[error(
        "Section {id} at offset {offset:#x} declares {size} bytes of content, \
         but only {available} remain"
    )]
    TruncatedSection {
        id: u8,
        offset: u64,
        size: u64,
        available: u64,
    },

    #[error("Section {id} is not a memory section")]
    NotMemorySection { id: u8 },

    #[error("Unsupported: expected exactly one memory, found {count}")]
    MultiMemory { count: u64 },

    #[error("Unsupported memory limits flag {flag:#04x}")]
    UnsupportedLimits { flag: u64 },

    /// A value cannot be represented in the fixed number of bytes available to it.
    #[error("{value} cannot be encoded in {width} byte(s)")]
    Overflow { value: u64, width: usize },

    #[error("{pages} pages exceeds the 32-bit memory limit of {max} pages", max = crate::MAX_PAGES)]
    TooManyPages { pages: u64 },

    #[error("{pages} initial pages exceeds the declared maximum of {maximum} pages")]
    ExceedsMaximum { pages: u64, maximum: u64 },

    /// A patch buffer no longer matches the width of the field it replaces.
    #[error("Patch is {actual} byte(s) wide, but the field it replaces is {expected}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("Patch range {offset:#x}+{width} lies outside the file ({len} bytes)")]
    OutOfBounds { offset: u64, width: usize, len: u64 },

    #[error("Short write at offset {offset:#x}: {written} of {expected} bytes written")]
    ShortWrite {
        written: usize,
        expected: usize,
        offset: u64,
    },

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that may occur while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error that occurred while reading the file.
    #[error("error reading '{path}': {err}")]
    IoError {
        /// The path to the file that was being read.
        path: String,
        /// The underlying [`io::Error`].
        #[source]
        err: io::Error,
    },

    /// The file could not be parsed as TOML, or did not match the expected layout.
    #[error("invalid configuration: {0}")]
    InvalidToml(#[from] toml::de::Error),
}

//! Unsigned LEB128 varints.
//!
//! Decoding reads one byte at a time, so a reader is never advanced past the final byte of an
//! encoding. Encoding is fixed-width: [`encode_fixed`] emits exactly the requested number of
//! bytes, padding with continuation groups where the value is small, so that a value can be
//! rewritten in place over an existing encoding.

use {
    crate::error::Error,
    std::io::{self, Read},
};

/// The longest encoding of a `u64`: `ceil(64 / 7)` groups.
pub const MAX_WIDTH: usize = 10;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u8 = 0x7f;

/// Errors raised while decoding a varint from a stream.
#[derive(Debug, thiserror::Error)]
pub enum VarintError {
    /// The stream ended before a byte with a clear continuation bit was seen.
    #[error("unexpected end of stream after {read} byte(s) of varint")]
    Truncated { read: usize },

    /// The encoding does not fit in 64 bits.
    #[error("varint does not fit in 64 bits")]
    TooLong,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Decode one unsigned varint, returning its value and the number of bytes it occupied.
pub fn read_u64<R: Read + ?Sized>(reader: &mut R) -> Result<(u64, usize), VarintError> {
    let mut value = 0u64;
    let mut read = 0;
    loop {
        let mut byte = [0u8; 1];
        match reader.read_exact(&mut byte) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(VarintError::Truncated { read })
            }
            Err(e) => return Err(e.into()),
        }
        let group = byte[0] & GROUP_MASK;
        let shift = 7 * read as u32;
        read += 1;

        // The tenth group holds bit 63 only.
        if read == MAX_WIDTH && group > 1 {
            return Err(VarintError::TooLong);
        }
        value |= u64::from(group) << shift;

        if byte[0] & CONTINUATION == 0 {
            return Ok((value, read));
        }
        if read == MAX_WIDTH {
            return Err(VarintError::TooLong);
        }
    }
}

/// Encode `value` in exactly `width` bytes.
///
/// Fails with [`Error::Overflow`] rather than truncating or widening the encoding when `value`
/// needs more than `width` groups of 7 bits.
pub fn encode_fixed(value: u64, width: usize) -> Result<Vec<u8>, Error> {
    if width == 0 || width > MAX_WIDTH {
        return Err(Error::Overflow { value, width });
    }

    let mut bytes = Vec::with_capacity(width);
    let mut rest = value;
    for i in 0..width {
        let mut byte = (rest as u8) & GROUP_MASK;
        rest >>= 7;
        if i + 1 < width {
            byte |= CONTINUATION;
        }
        bytes.push(byte);
    }

    if rest != 0 {
        return Err(Error::Overflow { value, width });
    }
    Ok(bytes)
}

/// The number of bytes in the shortest encoding of `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

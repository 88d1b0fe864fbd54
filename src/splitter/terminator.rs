//! Terminator classification
//!
//! A CR can only be classified once the byte after it is known. Inside a chunk that
//! byte is always available except for the last position, which is reported as
//! [`Classification::PendingNextByte`] and resolved by [`resolve_carried_cr`] when the
//! next chunk arrives.

use memchr::memchr2;

/// Line feed
pub const LF: u8 = b'\n';
/// Carriage return
pub const CR: u8 = b'\r';

/// Result of classifying one byte of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The byte ends a line; `len` terminator bytes (1 or 2) start at it
    Terminator { len: usize },
    /// Ordinary line content
    Content,
    /// CR in the last position of the chunk, decided by the next chunk's first byte
    PendingNextByte,
}

/// Classify `chunk[i]` using only bytes of the same chunk
pub fn classify(chunk: &[u8], i: usize) -> Classification {
    match chunk[i] {
        LF => Classification::Terminator { len: 1 },
        CR => match chunk.get(i + 1) {
            Some(&LF) => Classification::Terminator { len: 2 },
            Some(_) => Classification::Terminator { len: 1 },
            None => Classification::PendingNextByte,
        },
        _ => Classification::Content,
    }
}

/// Number of leading bytes of a new chunk that belong to a CR carried from the
/// previous chunk (1 when the pair turns out to be CR+LF, else 0)
pub fn resolve_carried_cr(first: Option<u8>) -> usize {
    match first {
        Some(LF) => 1,
        _ => 0,
    }
}

/// Position of the next CR or LF in `chunk` at or after `from`
pub fn find_terminator(chunk: &[u8], from: usize) -> Option<usize> {
    memchr2(CR, LF, &chunk[from..]).map(|pos| from + pos)
}

//! Byte-range sources for the line splitter.
//!
//! The splitter never seeks or schedules I/O itself. It asks a [`ByteRangeReader`]
//! for "up to N bytes at absolute offset O" once per chunk. Files use positional
//! reads so the handle's own cursor is never touched.

pub mod file;
pub mod validation;

pub use file::FileSource;
pub use validation::validate_file_path;

use std::io;

/// Positional reader over a byte-addressable input
///
/// Implementations fill `buf` with bytes starting at `offset` and return how many
/// bytes were written. Returning fewer than `buf.len()` is allowed; returning 0 means
/// nothing is available at `offset`.
pub trait ByteRangeReader {
    /// Read up to `buf.len()` bytes starting at absolute `offset`
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;
}

impl ByteRangeReader for std::fs::File {
    #[cfg(unix)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }
}

impl ByteRangeReader for [u8] {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset overflows usize"))?;
        if start >= self.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

impl ByteRangeReader for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.as_slice().read_at(offset, buf)
    }
}

impl<T: ByteRangeReader + ?Sized> ByteRangeReader for &T {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

impl<T: ByteRangeReader + ?Sized> ByteRangeReader for Box<T> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

//! Buffered line splitting over a byte-range source
//!
//! [`LineSplitter`] reads the source in fixed-size chunks at explicit offsets and
//! yields one raw line per `next()` call. LF, CR and CR+LF all terminate a line and
//! are stripped from the output. A terminator split across two reads is handled by
//! carrying the unresolved CR into the next chunk.
//!
//! ```
//! use readlines::{LineSplitter, SplitterOptions};
//!
//! let data = b"ab\r\ncd".to_vec();
//! let lines: Vec<Vec<u8>> = LineSplitter::new(data, 6, SplitterOptions::default().buffer_size(3))
//!     .unwrap()
//!     .collect::<readlines::Result<_>>()
//!     .unwrap();
//! assert_eq!(lines, vec![b"ab".to_vec(), b"cd".to_vec()]);
//! ```

pub mod fragment;
pub mod terminator;

use crate::error::{Result, ReadlinesError};
use crate::source::ByteRangeReader;
use fragment::PendingFragment;
use std::fmt;
use std::iter::FusedIterator;
use terminator::{classify, find_terminator, resolve_carried_cr, Classification};

/// Chunk size used when none is given
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Traversal parameters for a [`LineSplitter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterOptions {
    /// Upper bound on the bytes requested per read
    pub buffer_size: usize,
    /// Absolute offset the first read starts at
    pub start_offset: u64,
}

impl SplitterOptions {
    pub fn new(buffer_size: usize, start_offset: u64) -> Self {
        Self {
            buffer_size,
            start_offset,
        }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn start_offset(mut self, start_offset: u64) -> Self {
        self.start_offset = start_offset;
        self
    }
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, 0)
    }
}

/// Pull-driven line splitter
///
/// Holds the cursor, the reusable chunk buffer, the pending fragment and the
/// carry-CR flag. Each `next()` resumes scanning exactly where the previous call
/// stopped and issues reads only when the current chunk is used up.
pub struct LineSplitter<R> {
    reader: R,
    total_size: u64,
    buffer_size: usize,

    /// Absolute offset of the next unread byte
    cursor: u64,

    /// Reused for every read; only `chunk[..chunk_len]` is valid
    chunk: Vec<u8>,
    chunk_len: usize,

    /// Start of the not-yet-yielded segment within the chunk
    scan_start: usize,

    pending: PendingFragment,

    /// Previous chunk ended in a CR whose pairing is not known yet
    carry_cr: bool,

    finished: bool,
    lines_yielded: u64,
}

impl<R: ByteRangeReader> LineSplitter<R> {
    /// Create a splitter over `reader`, which holds `total_size` bytes
    ///
    /// # Errors
    /// * `InvalidBufferSize` if `options.buffer_size` is zero
    /// * `OffsetOutOfRange` if `options.start_offset > total_size`
    pub fn new(reader: R, total_size: u64, options: SplitterOptions) -> Result<Self> {
        if options.buffer_size == 0 {
            return Err(ReadlinesError::InvalidBufferSize);
        }
        if options.start_offset > total_size {
            return Err(ReadlinesError::OffsetOutOfRange {
                offset: options.start_offset,
                total_size,
            });
        }

        log::debug!(
            "line splitter over {} bytes from offset {} with {}-byte chunks",
            total_size,
            options.start_offset,
            options.buffer_size
        );

        Ok(Self {
            reader,
            total_size,
            buffer_size: options.buffer_size,
            cursor: options.start_offset,
            chunk: Vec::new(),
            chunk_len: 0,
            scan_start: 0,
            pending: PendingFragment::new(),
            carry_cr: false,
            finished: false,
            lines_yielded: 0,
        })
    }

    /// Produce the next line, or `None` once the source is exhausted
    pub fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }

        let line = match self.advance() {
            Ok(line) => line,
            Err(e) => {
                self.finished = true;
                self.pending.clear();
                return Err(e);
            }
        };

        match line {
            Some(_) => self.lines_yielded += 1,
            None => log::debug!(
                "line splitter exhausted after {} lines at offset {}",
                self.lines_yielded,
                self.cursor
            ),
        }
        Ok(line)
    }

    /// Absolute offset of the next byte that will be read from the source
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Total size this splitter reads up to
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Maximum bytes requested per read
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Lines produced so far
    pub fn lines_yielded(&self) -> u64 {
        self.lines_yielded
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn advance(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            if let Some(line) = self.scan_chunk() {
                return Ok(Some(line));
            }

            if self.cursor >= self.total_size {
                return Ok(self.flush());
            }

            self.read_chunk()?;

            // The carried CR ends the line before anything in the new chunk is scanned;
            // a leading LF is the rest of that terminator.
            if self.carry_cr {
                self.carry_cr = false;
                let first = self.chunk[..self.chunk_len].first().copied();
                self.scan_start = resolve_carried_cr(first);
                return Ok(Some(self.pending.take()));
            }
        }
    }

    /// Scan the current chunk for the next complete line
    ///
    /// Returns `None` once the chunk is used up; unterminated bytes are moved into the
    /// pending fragment by then.
    fn scan_chunk(&mut self) -> Option<Vec<u8>> {
        let chunk = &self.chunk[..self.chunk_len];
        let mut search_from = self.scan_start;

        while search_from < chunk.len() {
            let Some(i) = find_terminator(chunk, search_from) else {
                break;
            };

            match classify(chunk, i) {
                Classification::Terminator { len } => {
                    let line = self.pending.complete(&chunk[self.scan_start..i]);
                    self.scan_start = i + len;
                    return Some(line);
                }
                Classification::PendingNextByte => {
                    self.pending.extend(&chunk[self.scan_start..i]);
                    self.carry_cr = true;
                    self.scan_start = chunk.len();
                    return None;
                }
                Classification::Content => search_from = i + 1,
            }
        }

        if self.scan_start < chunk.len() {
            self.pending.extend(&chunk[self.scan_start..]);
            self.scan_start = chunk.len();
        }
        None
    }

    /// Read the next chunk at the cursor into the reusable buffer
    fn read_chunk(&mut self) -> Result<()> {
        let remaining = self.total_size - self.cursor;
        let len = usize::try_from(remaining).map_or(self.buffer_size, |r| r.min(self.buffer_size));
        if self.chunk.len() < len {
            self.chunk.resize(len, 0);
        }

        let offset = self.cursor;
        let n = self
            .reader
            .read_at(offset, &mut self.chunk[..len])
            .map_err(|e| ReadlinesError::read_failed(offset, len, e))?;

        if n == 0 {
            return Err(ReadlinesError::read_failed(
                offset,
                len,
                std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "source ended before its declared size",
                ),
            ));
        }
        let n = n.min(len);
        if n < len {
            log::warn!("short read at offset {}: got {} of {} bytes", offset, n, len);
        }
        log::trace!("read {} bytes at offset {}", n, offset);

        self.cursor += n as u64;
        self.chunk_len = n;
        self.scan_start = 0;
        Ok(())
    }

    /// Emit whatever the last chunk left behind
    fn flush(&mut self) -> Option<Vec<u8>> {
        self.finished = true;
        if std::mem::take(&mut self.carry_cr) || !self.pending.is_empty() {
            Some(self.pending.take())
        } else {
            None
        }
    }
}

impl<R: ByteRangeReader> Iterator for LineSplitter<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

impl<R: ByteRangeReader> FusedIterator for LineSplitter<R> {}

impl<R> fmt::Debug for LineSplitter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSplitter")
            .field("total_size", &self.total_size)
            .field("buffer_size", &self.buffer_size)
            .field("cursor", &self.cursor)
            .field("pending_len", &self.pending.len())
            .field("carry_cr", &self.carry_cr)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Lines of `source` from `start_offset` up to `total_size`, read `buffer_size` bytes
/// at a time
pub fn readlines<R: ByteRangeReader>(
    source: R,
    total_size: u64,
    buffer_size: usize,
    start_offset: u64,
) -> Result<LineSplitter<R>> {
    LineSplitter::new(
        source,
        total_size,
        SplitterOptions::new(buffer_size, start_offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::io;

    /// In-memory reader that records every request and can fail on demand
    struct RecordingReader {
        data: Vec<u8>,
        requests: RefCell<Vec<(u64, usize)>>,
        fail_at_request: Option<usize>,
        max_per_read: Option<usize>,
        calls: Cell<usize>,
    }

    impl RecordingReader {
        fn new(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                requests: RefCell::new(Vec::new()),
                fail_at_request: None,
                max_per_read: None,
                calls: Cell::new(0),
            }
        }
    }

    impl ByteRangeReader for RecordingReader {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            self.requests.borrow_mut().push((offset, buf.len()));
            if self.fail_at_request == Some(call) {
                return Err(io::Error::new(io::ErrorKind::Other, "device error"));
            }
            let limit = self.max_per_read.unwrap_or(buf.len()).min(buf.len());
            self.data.as_slice().read_at(offset, &mut buf[..limit])
        }
    }

    fn split(data: &[u8], buffer_size: usize) -> Vec<Vec<u8>> {
        readlines(data, data.len() as u64, buffer_size, 0)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap()
    }

    fn lines(expected: &[&str]) -> Vec<Vec<u8>> {
        expected.iter().map(|l| l.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_lf_lines() {
        assert_eq!(split(b"a\nb\nc", 1024), lines(&["a", "b", "c"]));
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(split(b"a\r\nb", 1024), lines(&["a", "b"]));
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        assert_eq!(split(b"ab\r\ncd", 3), lines(&["ab", "cd"]));
    }

    #[test]
    fn test_consecutive_terminators_yield_empty_lines() {
        assert_eq!(split(b"\n\n", 1024), lines(&["", ""]));
        assert_eq!(split(b"\r\r", 1), lines(&["", ""]));
        assert_eq!(split(b"\r\n\r\n", 1), lines(&["", ""]));
    }

    #[test]
    fn test_no_terminator_yields_whole_input() {
        assert_eq!(split(b"abc", 1024), lines(&["abc"]));
        assert_eq!(split(b"abc", 1), lines(&["abc"]));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(split(b"", 1024).is_empty());
    }

    #[test]
    fn test_trailing_terminator_has_no_empty_line() {
        assert_eq!(split(b"a\n", 1024), lines(&["a"]));
        assert_eq!(split(b"a\r\n", 2), lines(&["a"]));
        assert_eq!(split(b"a\r", 2), lines(&["a"]));
    }

    #[test]
    fn test_lone_cr_input() {
        assert_eq!(split(b"\r", 1024), lines(&[""]));
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(
            split(b"one\ntwo\rthree\r\nfour", 1024),
            lines(&["one", "two", "three", "four"])
        );
    }

    #[test]
    fn test_carried_cr_followed_by_non_lf() {
        // First chunk "x\r" leaves the CR unresolved; "y" proves it was a lone CR
        let data = b"x\ry\n";
        let mut splitter = readlines(data.as_slice(), 4, 2, 0).unwrap();

        assert_eq!(splitter.next_line().unwrap(), Some(b"x".to_vec()));
        assert_eq!(splitter.position(), 4);
        assert_eq!(splitter.next_line().unwrap(), Some(b"y".to_vec()));
        assert_eq!(splitter.next_line().unwrap(), None);
    }

    #[test]
    fn test_carried_cr_followed_by_cr() {
        assert_eq!(split(b"ab\r\rcd", 3), lines(&["ab", "", "cd"]));
    }

    #[test]
    fn test_carried_cr_does_not_leak_past_first_byte() {
        // "a\r" | "b\nc": only the first byte of the second chunk sees the flag
        assert_eq!(split(b"a\rb\nc", 2), lines(&["a", "b", "c"]));
        assert_eq!(split(b"a\r\n\nc", 2), lines(&["a", "", "c"]));
    }

    #[test]
    fn test_start_offset_skips_prefix() {
        let data = b"first\nsecond\nthird";
        let result: Vec<Vec<u8>> = readlines(data.as_slice(), data.len() as u64, 4, 6)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(result, lines(&["second", "third"]));
    }

    #[test]
    fn test_start_offset_at_end_yields_nothing() {
        let data = b"abc";
        let mut splitter = readlines(data.as_slice(), 3, 8, 3).unwrap();
        assert!(splitter.next().is_none());
    }

    #[test]
    fn test_zero_buffer_size_rejected() {
        let err = readlines(b"abc".as_slice(), 3, 0, 0).unwrap_err();
        assert!(matches!(err, ReadlinesError::InvalidBufferSize));
    }

    #[test]
    fn test_offset_beyond_total_size_rejected() {
        let err = readlines(b"abc".as_slice(), 3, 16, 4).unwrap_err();
        match err {
            ReadlinesError::OffsetOutOfRange { offset, total_size } => {
                assert_eq!(offset, 4);
                assert_eq!(total_size, 3);
            }
            other => panic!("Expected OffsetOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_one_read_per_chunk_and_final_read_shrunk() {
        let reader = RecordingReader::new(b"hello\nworld\n!");
        let splitter = readlines(&reader, 13, 5, 0).unwrap();
        assert_eq!(splitter.count(), 3);

        assert_eq!(
            *reader.requests.borrow(),
            vec![(0, 5), (5, 5), (10, 3)]
        );
    }

    #[test]
    fn test_reads_are_lazy() {
        let reader = RecordingReader::new(b"a\nb\nc\n");
        let mut splitter = readlines(&reader, 6, 2, 0).unwrap();
        assert!(reader.requests.borrow().is_empty());

        assert_eq!(splitter.next_line().unwrap(), Some(b"a".to_vec()));
        assert_eq!(reader.requests.borrow().len(), 1);
    }

    #[test]
    fn test_read_failure_is_fatal() {
        let mut reader = RecordingReader::new(b"abc\ndef\nghi");
        reader.fail_at_request = Some(1);
        let mut splitter = readlines(&reader, 11, 4, 0).unwrap();

        assert_eq!(splitter.next_line().unwrap(), Some(b"abc".to_vec()));
        match splitter.next_line() {
            Err(ReadlinesError::Io { offset, length, .. }) => {
                assert_eq!(offset, 4);
                assert_eq!(length, 4);
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
        assert!(splitter.next().is_none());
        assert_eq!(reader.requests.borrow().len(), 2);
    }

    #[test]
    fn test_read_failure_discards_pending_fragment() {
        let mut reader = RecordingReader::new(b"abcdef");
        reader.fail_at_request = Some(1);
        let results: Vec<_> = readlines(&reader, 6, 3, 0).unwrap().collect();

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_short_reads_advance_by_bytes_read() {
        let mut reader = RecordingReader::new(b"ab\r\ncd\nef");
        reader.max_per_read = Some(2);
        let result: Vec<Vec<u8>> = readlines(&reader, 9, 4, 0)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(result, lines(&["ab", "cd", "ef"]));
        let offsets: Vec<u64> = reader.requests.borrow().iter().map(|r| r.0).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_source_shorter_than_declared_size() {
        let results: Vec<_> = readlines(b"ab\ncd".as_slice(), 10, 4, 0).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), b"ab");
        match &results[1] {
            Err(ReadlinesError::Io { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("Expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn test_lines_yielded_and_accessors() {
        let mut splitter = readlines(b"a\nb".as_slice(), 3, 64, 0).unwrap();
        assert_eq!(splitter.buffer_size(), 64);
        assert_eq!(splitter.total_size(), 3);

        while splitter.next_line().unwrap().is_some() {}
        assert_eq!(splitter.lines_yielded(), 2);
        assert_eq!(splitter.position(), 3);
    }

    #[test]
    fn test_debug_omits_chunk_contents() {
        let splitter = readlines(b"secret".as_slice(), 6, 4, 0).unwrap();
        let debug_str = format!("{:?}", splitter);
        assert!(debug_str.contains("LineSplitter"));
        assert!(!debug_str.contains("secret"));
    }

    #[test]
    fn test_every_buffer_size_agrees() {
        let data = b"alpha\r\nbeta\rgamma\n\r\n\rdelta\r";
        let expected = split(data, data.len() + 10);
        assert_eq!(expected, lines(&["alpha", "beta", "gamma", "", "", "delta"]));

        for buffer_size in 1..=data.len() {
            assert_eq!(split(data, buffer_size), expected, "buffer_size = {}", buffer_size);
        }
    }
}

//! Pending fragment carried between chunks

/// Unterminated tail of the current line
///
/// Bytes are always copied in from the chunk buffer, which is overwritten by the
/// next read. Terminator bytes never enter the fragment.
#[derive(Debug, Default)]
pub struct PendingFragment {
    bytes: Vec<u8>,
}

impl PendingFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment that did not end in a terminator
    pub fn extend(&mut self, segment: &[u8]) {
        self.bytes.extend_from_slice(segment);
    }

    /// Finish the current line with `segment`, leaving the fragment empty
    pub fn complete(&mut self, segment: &[u8]) -> Vec<u8> {
        if self.bytes.is_empty() {
            return segment.to_vec();
        }
        let mut line = std::mem::take(&mut self.bytes);
        line.extend_from_slice(segment);
        line
    }

    /// Take the fragment as a finished line
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

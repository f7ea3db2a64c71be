//! Retains the unconsumed tail of the byte stream between reads and splits
//! complete lines off its front.

use bytes::{Buf, BytesMut};

/// What [`LineBuffer::next_line`] found at the front of the buffer.
#[derive(Debug, PartialEq)]
pub(crate) enum Line {
    /// A line without its line feed. A preceding `\r` is kept.
    Complete(BytesMut),
    /// A partial line grew past the length limit and this many bytes of it
    /// were dropped. The rest of the line, up to its line feed, is dropped as
    /// it arrives.
    Overflowed(usize),
}

/// Single-producer, single-consumer line splitter.
///
/// Bytes are appended at the back with [`extend`](LineBuffer::extend) and
/// whole lines are split off the front with [`next_line`](LineBuffer::next_line).
/// A partial line stays in the buffer until the read that completes it, and the
/// bytes already searched for a line feed are not searched again.
#[derive(Debug)]
pub(crate) struct LineBuffer {
    buf: BytesMut,
    scanned: usize,
    max_line_length: usize,
    discarding: bool,
}

impl LineBuffer {
    pub(crate) fn new(max_line_length: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            scanned: 0,
            max_line_length: max_line_length.max(1),
            discarding: false,
        }
    }

    pub(crate) fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Splits the next line off the front of the buffer.
    ///
    /// Returns `None` once no line feed remains in the buffered bytes.
    pub(crate) fn next_line(&mut self) -> Option<Line> {
        loop {
            let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') else {
                return self.check_overflow();
            };

            let end = self.scanned + offset;
            self.scanned = 0;

            if self.discarding {
                self.buf.advance(end + 1);
                self.discarding = false;
                continue;
            }

            let mut line = self.buf.split_to(end + 1);
            line.truncate(end);
            return Some(Line::Complete(line));
        }
    }

    /// Number of buffered bytes not yet returned as part of a line.
    pub(crate) fn pending(&self) -> usize {
        self.buf.len()
    }

    fn check_overflow(&mut self) -> Option<Line> {
        if self.discarding {
            self.buf.clear();
            self.scanned = 0;
            return None;
        }

        self.scanned = self.buf.len();
        if self.buf.len() <= self.max_line_length {
            return None;
        }

        let dropped = self.buf.len();
        self.buf.clear();
        self.scanned = 0;
        self.discarding = true;
        Some(Line::Overflowed(dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(line: &[u8]) -> Option<Line> {
        Some(Line::Complete(BytesMut::from(line)))
    }

    #[test]
    fn test_lines_in_one_chunk() {
        let mut buffer = LineBuffer::new(64);
        buffer.extend(b"$GPGLL,1*00\r\n\n$GPGLL,2*00\n$GPG");

        assert_eq!(buffer.next_line(), complete(b"$GPGLL,1*00\r"));
        assert_eq!(buffer.next_line(), complete(b""));
        assert_eq!(buffer.next_line(), complete(b"$GPGLL,2*00"));
        assert_eq!(buffer.next_line(), None);
        assert_eq!(buffer.pending(), 4);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let frame = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n";

        for split in 0..frame.len() {
            let mut buffer = LineBuffer::new(64);
            buffer.extend(&frame[..split]);
            assert_eq!(buffer.next_line(), None, "Failed at {split}");

            buffer.extend(&frame[split..]);
            assert_eq!(
                buffer.next_line(),
                complete(&frame[..frame.len() - 1]),
                "Failed at {split}"
            );
            assert_eq!(buffer.pending(), 0);
        }
    }

    #[test]
    fn test_overflow_drops_rest_of_line() {
        let mut buffer = LineBuffer::new(8);
        buffer.extend(b"0123456789");

        assert_eq!(buffer.next_line(), Some(Line::Overflowed(10)));
        assert_eq!(buffer.pending(), 0);

        buffer.extend(b"abcdef");
        assert_eq!(buffer.next_line(), None);

        buffer.extend(b"gh\n$GPGLL*00\n");
        assert_eq!(buffer.next_line(), complete(b"$GPGLL*00"));
        assert_eq!(buffer.next_line(), None);
    }

    #[test]
    fn test_long_complete_line_is_kept() {
        let mut buffer = LineBuffer::new(4);
        buffer.extend(b"0123456789\n");

        assert_eq!(buffer.next_line(), complete(b"0123456789"));
    }
}

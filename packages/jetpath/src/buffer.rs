//! Buffered window over the input reader.
//!
//! The buffer keeps the live portion of the stream contiguous so a complete
//! value can always be handed out as one slice. Two cursors describe the
//! window: `scanp` is the first unread byte, and `scanned` counts the bytes
//! already slid out in front of the window, so `scanned + scanp` is the
//! absolute stream offset of the cursor.
//!
//! The dispatcher relies on one invariant here: between the end of a value
//! read and the return of the user callback, the buffer is neither grown nor
//! slid, so value slices stay valid for the whole callback.

use std::io::{self, Read};
use std::ops::Range;

use bytes::BytesMut;

use crate::scanner::is_space;

/// Initial capacity; enough for typical single records without growth.
const INITIAL_CAPACITY: usize = 8 * 1024;

/// Free tail space below which a refill grows the buffer first.
const MIN_READ: usize = 4096;

/// Grow-on-demand contiguous window over a byte source.
#[derive(Debug)]
pub(crate) struct StreamBuffer<R> {
    reader: R,
    buf: BytesMut,
    /// Offset of the first unread byte inside `buf`.
    pub(crate) scanp: usize,
    /// Bytes discarded in front of the window.
    scanned: u64,
}

impl<R: Read> StreamBuffer<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(INITIAL_CAPACITY),
            scanp: 0,
            scanned: 0,
        }
    }

    /// Absolute stream offset of the cursor.
    #[inline]
    pub(crate) fn offset(&self) -> u64 {
        self.scanned + self.scanp as u64
    }

    /// Bytes currently buffered (consumed prefix included).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn byte_at(&self, i: usize) -> u8 {
        self.buf[i]
    }

    /// Borrow a range of the window; valid until the next refill.
    #[inline]
    pub(crate) fn window(&self, range: Range<usize>) -> &[u8] {
        &self.buf[range]
    }

    /// Skip insignificant whitespace and return the next byte without
    /// consuming it, refilling from the reader as needed. `Ok(None)` is
    /// clean end-of-stream.
    pub(crate) fn peek(&mut self) -> io::Result<Option<u8>> {
        let mut exhausted = false;
        loop {
            while self.scanp < self.buf.len() {
                let c = self.buf[self.scanp];
                if !is_space(c) {
                    return Ok(Some(c));
                }
                self.scanp += 1;
            }
            if exhausted {
                return Ok(None);
            }
            if self.refill()? == 0 {
                exhausted = true;
            }
        }
    }

    /// Slide consumed bytes out of the window, grow if the free tail is
    /// short, and read once from the underlying source. Returns the number
    /// of bytes read; zero means end-of-stream.
    pub(crate) fn refill(&mut self) -> io::Result<usize> {
        if self.scanp > 0 {
            self.scanned += self.scanp as u64;
            let _ = self.buf.split_to(self.scanp);
            self.scanp = 0;
        }

        if self.buf.capacity() - self.buf.len() < MIN_READ {
            let grow = self.buf.capacity() + MIN_READ;
            log::debug!("growing stream buffer by {grow} bytes");
            self.buf.reserve(grow);
        }

        let len = self.buf.len();
        let cap = self.buf.capacity();
        self.buf.resize(cap, 0);
        loop {
            match self.reader.read(&mut self.buf[len..]) {
                Ok(n) => {
                    self.buf.truncate(len + n);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(len);
                    return Err(e);
                }
            }
        }
    }

    /// Replace the input and clear the window, keeping capacity.
    pub(crate) fn reset(&mut self, reader: R) {
        self.reader = reader;
        self.buf.clear();
        self.scanp = 0;
        self.scanned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that yields its input in fixed-size drips to force refills.
    struct Drip<'a> {
        data: &'a [u8],
        at: usize,
        chunk: usize,
    }

    impl Read for Drip<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            let n = self.data.len().saturating_sub(self.at).min(self.chunk).min(out.len());
            out[..n].copy_from_slice(&self.data[self.at..self.at + n]);
            self.at += n;
            Ok(n)
        }
    }

    #[test]
    fn peek_skips_whitespace_across_reads() {
        let mut buf = StreamBuffer::new(Drip {
            data: b" \t\r\n  7",
            at: 0,
            chunk: 2,
        });
        assert_eq!(buf.peek().unwrap(), Some(b'7'));
        // peeking again is stable
        assert_eq!(buf.peek().unwrap(), Some(b'7'));
    }

    #[test]
    fn peek_reports_clean_eof() {
        let mut buf = StreamBuffer::new(Drip {
            data: b"   ",
            at: 0,
            chunk: 1,
        });
        assert_eq!(buf.peek().unwrap(), None);
        assert_eq!(buf.peek().unwrap(), None);
    }

    #[test]
    fn offset_accounts_for_slid_bytes() {
        let mut buf = StreamBuffer::new(Drip {
            data: b"abcdef",
            at: 0,
            chunk: 6,
        });
        buf.refill().unwrap();
        buf.scanp = 4;
        buf.refill().unwrap();
        assert_eq!(buf.scanp, 0);
        assert_eq!(buf.offset(), 4);
        assert_eq!(buf.window(0..2), b"ef");
    }

    #[test]
    fn reset_preserves_capacity_but_drops_content() {
        let mut buf = StreamBuffer::new(Drip {
            data: b"12345",
            at: 0,
            chunk: 5,
        });
        buf.refill().unwrap();
        assert!(buf.len() > 0);
        buf.reset(Drip {
            data: b"9",
            at: 0,
            chunk: 1,
        });
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.offset(), 0);
        assert_eq!(buf.peek().unwrap(), Some(b'9'));
    }
}

//! Console newline transcoding.
//!
//! The UART_DM block has no line discipline, so every `\n` leaves the driver
//! as the pair `\r\n`. The caller's buffer is only ever borrowed.

use core::iter::FusedIterator;

/// Number of characters the hardware will send for `bytes`.
pub fn physical_len(bytes: &[u8]) -> usize {
    bytes.len() + bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Iterator over the physical character stream of a logical buffer.
#[derive(Debug, Clone)]
pub struct Crlf<'a> {
    bytes: core::slice::Iter<'a, u8>,
    pending_lf: bool,
}

impl<'a> Crlf<'a> {
    /// Creates the physical stream for `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Crlf {
            bytes: bytes.iter(),
            pending_lf: false,
        }
    }
}

impl Iterator for Crlf<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.pending_lf {
            self.pending_lf = false;
            return Some(b'\n');
        }
        match *self.bytes.next()? {
            b'\n' => {
                self.pending_lf = true;
                Some(b'\r')
            }
            b => Some(b),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.bytes.len() + usize::from(self.pending_lf);
        // Every remaining byte may still be a newline.
        (rest, rest.checked_add(self.bytes.len()))
    }
}

impl FusedIterator for Crlf<'_> {}

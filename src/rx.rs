//! Receive path.
//!
//! The RX FIFO hands out whole words. A word is only signalled through `SR`
//! once four characters have arrived; fewer characters wait in the packing
//! buffer until software forces them out with a stale command.

use crate::Error;
use crate::bus::{Block, Bus};
use crate::regs::{DMRX_WORD, cr, rxfs, sr};
use crate::word::{FifoWord, LANES};

/// A word pulled from the FIFO together with the number of valid lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Received {
    pub(crate) word: FifoWord,
    pub(crate) len: u8,
}

/// Reads the next word from the RX FIFO.
///
/// Returns [`Error::RxNotReady`] if nothing has been received.
pub(crate) fn fetch<B: Bus>(block: &mut Block<'_, B>) -> Result<Received, Error> {
    // An overrun only costs the lost character; clear it and carry on.
    if block.read(block.map.sr) & sr::OVERRUN != 0 {
        debug!("uart_dm: clearing overrun at {:#x}", block.base);
        block.command(cr::RESET_ERROR_STATUS);
    }

    if block.read(block.map.sr) & sr::RXRDY != 0 {
        let word = FifoWord::from_raw(block.read(block.map.rf));
        return Ok(Received { word, len: LANES as u8 });
    }

    let pending = rxfs::buffer_count(block.read(block.map.rxfs));
    if pending == 0 {
        return Err(Error::RxNotReady);
    }

    trace!("uart_dm: forcing stale with {} pending", pending);
    block.command(cr::FORCE_STALE);
    let word = FifoWord::from_raw(block.read(block.map.rf));
    block.command(cr::RESET_STALE_INT);
    block.write(block.map.dmrx, DMRX_WORD);

    Ok(Received { word, len: pending.min(LANES as u32) as u8 })
}

/// Characters of the last fetched word that have not been handed out yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RxCache {
    word: FifoWord,
    remaining: u8,
}

impl RxCache {
    pub(crate) const EMPTY: Self = RxCache {
        word: FifoWord::ZERO,
        remaining: 0,
    };

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub(crate) fn fill(&mut self, received: Received) {
        self.word = received.word;
        self.remaining = received.len;
    }

    /// Takes the next character, lowest lane first.
    pub(crate) fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.word.lane(0);
        self.word = FifoWord::from_raw(self.word.raw() >> 8);
        self.remaining -= 1;
        Some(byte)
    }
}

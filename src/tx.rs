//! Transmit path.
//!
//! A transfer is announced by programming `NO_CHARS_FOR_TX` with the number of
//! physical characters, then the characters are pushed into `TF` four at a
//! time. The count write and the FIFO writes must not interleave with another
//! transfer on the same block, so they run inside one critical section.

use crate::Error;
use crate::bus::{Block, Bus};
use crate::crlf::{Crlf, physical_len};
use crate::poll::PollPolicy;
use crate::regs::{cr, isr, sr};
use crate::word::FifoWord;

/// Sends `data` with newline transcoding.
///
/// Returns [`Error::InvalidArgument`] for an empty `data` without touching
/// the hardware.
pub(crate) fn transmit<B: Bus>(block: &mut Block<'_, B>, policy: PollPolicy, data: &[u8]) -> Result<(), Error> {
    if data.is_empty() {
        return Err(Error::InvalidArgument);
    }
    let chars = u32::try_from(physical_len(data)).map_err(|_| Error::InvalidArgument)?;

    // The count register may only be written once the previous transfer has
    // left the FIFO.
    if block.read(block.map.sr) & sr::TXEMT == 0 {
        block.wait_for(policy, block.map.isr, isr::TX_READY)?;
    }

    critical_section::with(|_| -> Result<(), Error> {
        block.write(block.map.no_chars_for_tx, chars);
        block.command(cr::RESET_TX_READY);

        let mut stream = Crlf::new(data);
        while let Some((word, _)) = FifoWord::pack(&mut stream) {
            if let Err(e) = block.wait_for(policy, block.map.sr, sr::TXRDY) {
                // The count is already programmed; drop the partial transfer
                // so the next one starts from an idle transmitter.
                block.command(cr::RESET_TX);
                return Err(e);
            }
            block.write(block.map.tf, word.raw());
        }
        Ok(())
    })
}

/// Waits until the transmitter has shifted out everything it was given.
pub(crate) fn drain<B: Bus>(block: &mut Block<'_, B>, policy: PollPolicy) -> Result<(), Error> {
    block.wait_for(policy, block.map.sr, sr::TXEMT)
}

#[cfg(test)]
mod test {
    extern crate std;

    use super::*;
    use crate::mock::{Access, MockUart};
    use crate::regs::RegisterMap;
    use crate::word::words_for;
    use std::vec::Vec;

    const BASE: usize = 0x1000;

    fn send(uart: &mut MockUart, data: &[u8]) -> Result<(), Error> {
        let map = uart.map();
        let mut block = Block { bus: uart, map: &map, base: BASE };
        transmit(&mut block, PollPolicy::Budget(100), data)
    }

    #[test]
    fn plain_bytes_go_out_unchanged() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        send(&mut uart, b"hello, world").unwrap();
        assert_eq!(uart.tx_bytes(), b"hello, world");
        assert_eq!(uart.tx_words().len(), words_for(12));
        assert_eq!(uart.tx_counts(), [12]);
    }

    #[test]
    fn newlines_are_expanded_and_buffer_is_kept() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        let data = *b"ab\ncd\n";
        send(&mut uart, &data).unwrap();
        assert_eq!(uart.tx_bytes(), b"ab\r\ncd\r\n");
        assert_eq!(uart.tx_counts(), [8]);
        assert_eq!(uart.tx_words().len(), 2);
        assert_eq!(&data, b"ab\ncd\n");
    }

    #[test]
    fn crlf_may_straddle_words() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        send(&mut uart, b"abc\nd").unwrap();
        assert_eq!(
            uart.tx_words(),
            [FifoWord::from_lanes(*b"abc\r"), FifoWord::from_lanes([b'\n', b'd', 0, 0])]
        );
    }

    #[test]
    fn sentinel_byte_is_ordinary_payload() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        send(&mut uart, &[0x80, b'\n', 0x80]).unwrap();
        assert_eq!(uart.tx_bytes(), [0x80, b'\r', b'\n', 0x80]);
    }

    #[test]
    fn empty_buffer_is_rejected_before_any_access() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        assert_eq!(send(&mut uart, b""), Err(Error::InvalidArgument));
        assert!(uart.log().is_empty());
    }

    #[test]
    fn count_is_programmed_before_fifo_writes() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        send(&mut uart, b"xyz").unwrap();
        let map = uart.map();
        let writes: Vec<_> = uart
            .log()
            .iter()
            .filter_map(|a| match *a {
                Access::Write(off, v) => Some((off, v)),
                Access::Read(..) => None,
            })
            .collect();
        assert_eq!(
            writes,
            [
                (map.no_chars_for_tx, 3),
                (map.cr, cr::RESET_TX_READY),
                (map.tf, u32::from_le_bytes([b'x', b'y', b'z', 0])),
            ]
        );
    }

    #[test]
    fn busy_fifo_waits_for_tx_ready() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        uart.set_tx_busy_polls(3);
        send(&mut uart, b"q").unwrap();
        assert_eq!(uart.tx_bytes(), b"q");
        assert_eq!(uart.delays(), 3);
    }

    #[test]
    fn busy_fifo_waits_for_each_word() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        // One busy read for the idle check, two while waiting for the first word.
        uart.set_sr_busy_polls(3);
        send(&mut uart, b"12345678\n").unwrap();
        assert_eq!(uart.tx_bytes(), b"12345678\r\n");
        assert_eq!(uart.tx_words().len(), 3);
        assert_eq!(uart.delays(), 2);
    }

    #[test]
    fn timeout_mid_transfer_resets_transmitter() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        uart.set_tx_stall_after(1);
        let map = uart.map();
        let mut block = Block { bus: &mut uart, map: &map, base: BASE };
        assert_eq!(transmit(&mut block, PollPolicy::Budget(5), b"12345678"), Err(Error::Timeout));
        assert_eq!(uart.tx_counts(), [8]);
        assert_eq!(uart.tx_words().len(), 1);
        assert_eq!(uart.commands(), [cr::RESET_TX_READY, cr::RESET_TX]);

        // The reset leaves the port usable for the next transfer.
        send(&mut uart, b"ok").unwrap();
        assert_eq!(uart.tx_counts(), [8, 2]);
        assert_eq!(uart.tx_words().last(), Some(&FifoWord::from_lanes([b'o', b'k', 0, 0])));
    }

    #[test]
    fn drain_waits_for_empty_transmitter() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        uart.set_sr_busy_polls(4);
        let map = uart.map();
        let mut block = Block { bus: &mut uart, map: &map, base: BASE };
        assert_eq!(drain(&mut block, PollPolicy::Budget(10)), Ok(()));
        assert_eq!(uart.delays(), 4);
    }

    #[test]
    fn stuck_transmitter_times_out() {
        let mut uart = MockUart::new(BASE, RegisterMap::BLSP);
        uart.set_tx_stuck(true);
        assert_eq!(send(&mut uart, b"lost"), Err(Error::Timeout));
        assert!(uart.tx_words().is_empty());
    }

    #[test]
    fn gsbi_layout_uses_its_own_offsets() {
        let mut uart = MockUart::new(BASE, RegisterMap::GSBI);
        send(&mut uart, b"old\n").unwrap();
        assert_eq!(uart.tx_bytes(), b"old\r\n");
    }
}

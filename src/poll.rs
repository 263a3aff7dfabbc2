//! Busy-wait polling of hardware status bits.

use crate::Error;
use crate::bus::Bus;

/// Default number of polls before a status wait gives up.
///
/// With the one microsecond delay between polls this is about a second, far
/// longer than a 4-byte word takes at 115200 baud.
pub const DEFAULT_POLL_BUDGET: u32 = 1_000_000;

/// How long the driver waits for a status bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollPolicy {
    /// Poll until the bit is set. A device that never responds blocks forever;
    /// no watchdog is serviced.
    Forever,
    /// Give up with [`Error::Timeout`] after this many unsuccessful polls.
    Budget(u32),
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::Budget(DEFAULT_POLL_BUDGET)
    }
}

impl PollPolicy {
    /// Polls `ready` until it returns `true`, delaying one microsecond between
    /// attempts.
    pub(crate) fn wait<B: Bus>(
        self,
        bus: &mut B,
        mut ready: impl FnMut(&mut B) -> bool,
    ) -> Result<(), Error> {
        let mut misses: u32 = 0;
        while !ready(bus) {
            if let PollPolicy::Budget(budget) = self {
                misses += 1;
                if misses >= budget {
                    return Err(Error::Timeout);
                }
            }
            bus.delay_us(1);
        }
        Ok(())
    }

    /// Waits for `mask` to be set in the register at `addr`.
    pub(crate) fn wait_for_bits<B: Bus>(self, bus: &mut B, addr: usize, mask: u32) -> Result<(), Error> {
        let res = self.wait(bus, |bus| bus.read(addr) & mask != 0);
        if res.is_err() {
            warn!("uart_dm: gave up waiting for {:#x} at {:#x}", mask, addr);
        }
        res
    }
}

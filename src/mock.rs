//! Simulated UART_DM block for host tests.

extern crate std;

use std::collections::VecDeque;
use std::vec::Vec;

use crate::bus::Bus;
use crate::regs::{RegisterMap, cr, isr, sr};
use crate::word::FifoWord;

/// Size of the address window decoded as the UART_DM block.
const WINDOW: usize = 0x200;

/// One register access, with the offset relative to the block base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read(usize, u32),
    Write(usize, u32),
}

struct Transfer {
    chars: u32,
    words: Vec<FifoWord>,
}

pub(crate) struct MockUart {
    base: usize,
    map: RegisterMap,
    log: Vec<Access>,
    registers: Vec<(usize, u32)>,
    outside: Vec<(usize, u32)>,
    commands: Vec<u32>,
    transfers: Vec<Transfer>,
    rx: VecDeque<u8>,
    stale: bool,
    overrun: bool,
    tx_busy_polls: u32,
    tx_stuck: bool,
    sr_busy_polls: u32,
    tx_stall_after: Option<usize>,
    tf_writes: usize,
    delays: u32,
}

impl MockUart {
    pub(crate) fn new(base: usize, map: RegisterMap) -> Self {
        MockUart {
            base,
            map,
            log: Vec::new(),
            registers: Vec::new(),
            outside: Vec::new(),
            commands: Vec::new(),
            transfers: Vec::new(),
            rx: VecDeque::new(),
            stale: false,
            overrun: false,
            tx_busy_polls: 0,
            tx_stuck: false,
            sr_busy_polls: 0,
            tx_stall_after: None,
            tf_writes: 0,
            delays: 0,
        }
    }

    pub(crate) fn map(&self) -> RegisterMap {
        self.map
    }

    /// Queues characters as if they arrived on the wire.
    pub(crate) fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub(crate) fn set_overrun(&mut self, overrun: bool) {
        self.overrun = overrun;
    }

    pub(crate) fn overrun(&self) -> bool {
        self.overrun
    }

    /// The transmitter reports busy for the next `polls` reads of `ISR`.
    pub(crate) fn set_tx_busy_polls(&mut self, polls: u32) {
        self.tx_busy_polls = polls;
    }

    /// The transmitter never becomes ready.
    pub(crate) fn set_tx_stuck(&mut self, stuck: bool) {
        self.tx_stuck = stuck;
    }

    /// `SR` reports `TXRDY` and `TXEMT` clear for the next `polls` reads.
    pub(crate) fn set_sr_busy_polls(&mut self, polls: u32) {
        self.sr_busy_polls = polls;
    }

    /// The transmitter stops accepting words once `words` more have been
    /// written to `TF`, until it is reset with `RESET_TX`.
    pub(crate) fn set_tx_stall_after(&mut self, words: usize) {
        self.tx_stall_after = Some(self.tf_writes + words);
    }

    pub(crate) fn log(&self) -> &[Access] {
        &self.log
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
        self.commands.clear();
    }

    /// Commands written to `CR`, in order.
    pub(crate) fn commands(&self) -> Vec<u32> {
        self.commands.clone()
    }

    /// Last value written to the plain register at `offset`.
    pub(crate) fn register(&self, offset: usize) -> Option<u32> {
        self.registers.iter().rev().find(|(o, _)| *o == offset).map(|&(_, v)| v)
    }

    /// Writes that landed outside the UART_DM window, as absolute addresses.
    pub(crate) fn outside_writes(&self) -> &[(usize, u32)] {
        &self.outside
    }

    pub(crate) fn delays(&self) -> u32 {
        self.delays
    }

    pub(crate) fn tx_counts(&self) -> Vec<u32> {
        self.transfers.iter().map(|t| t.chars).collect()
    }

    pub(crate) fn tx_words(&self) -> Vec<FifoWord> {
        self.transfers.iter().flat_map(|t| t.words.iter().copied()).collect()
    }

    /// Characters put on the wire: each transfer contributes as many lanes as
    /// its programmed count.
    pub(crate) fn tx_bytes(&self) -> Vec<u8> {
        self.transfers
            .iter()
            .flat_map(|t| {
                t.words
                    .iter()
                    .flat_map(|w| w.lanes())
                    .take(t.chars as usize)
            })
            .collect()
    }

    fn tx_stalled(&self) -> bool {
        self.tx_stall_after.is_some_and(|limit| self.tf_writes >= limit)
    }

    fn tx_idle(&self) -> bool {
        !self.tx_stuck && !self.tx_stalled() && self.tx_busy_polls == 0
    }

    fn status(&self) -> u32 {
        let mut status = 0;
        if self.rx.len() >= 4 {
            status |= sr::RXRDY;
        }
        if !self.tx_stuck && !self.tx_stalled() {
            status |= sr::TXRDY;
        }
        if self.tx_idle() {
            status |= sr::TXEMT;
        }
        if self.overrun {
            status |= sr::OVERRUN;
        }
        status
    }

    fn pop_word(&mut self, max: usize) -> u32 {
        let mut lanes = [0; 4];
        for slot in lanes.iter_mut().take(max) {
            match self.rx.pop_front() {
                Some(b) => *slot = b,
                None => break,
            }
        }
        u32::from_le_bytes(lanes)
    }

    fn read_offset(&mut self, offset: usize) -> u32 {
        let map = self.map;
        if offset == map.sr {
            if self.sr_busy_polls > 0 {
                self.sr_busy_polls -= 1;
                self.status() & !(sr::TXRDY | sr::TXEMT)
            } else {
                self.status()
            }
        } else if offset == map.isr {
            if self.tx_stuck || self.tx_stalled() {
                0
            } else if self.tx_busy_polls > 0 {
                self.tx_busy_polls -= 1;
                0
            } else {
                isr::TX_READY
            }
        } else if offset == map.rxfs {
            ((self.rx.len() % 4) as u32) << 7
        } else if offset == map.rf {
            if self.stale {
                self.stale = false;
                self.pop_word(4)
            } else if self.rx.len() >= 4 {
                self.pop_word(4)
            } else {
                0
            }
        } else {
            self.register(offset).unwrap_or(0)
        }
    }

    fn write_offset(&mut self, offset: usize, value: u32) {
        let map = self.map;
        if offset == map.tf {
            self.tf_writes += 1;
            let word = FifoWord::from_raw(value);
            match self.transfers.last_mut() {
                Some(t) => t.words.push(word),
                None => self.transfers.push(Transfer { chars: 0, words: std::vec![word] }),
            }
        } else if offset == map.cr {
            self.commands.push(value);
            match value {
                cr::RESET_ERROR_STATUS => self.overrun = false,
                cr::FORCE_STALE => self.stale = true,
                cr::RESET_RX => self.rx.clear(),
                cr::RESET_TX => self.tx_stall_after = None,
                _ => {}
            }
        } else {
            if offset == map.no_chars_for_tx {
                self.transfers.push(Transfer { chars: value, words: Vec::new() });
            }
            self.registers.push((offset, value));
        }
    }
}

impl Bus for MockUart {
    fn read(&mut self, addr: usize) -> u32 {
        let offset = addr.wrapping_sub(self.base);
        if offset >= WINDOW {
            // Nothing else is attached: an idle block with empty FIFOs.
            return 0;
        }
        let value = self.read_offset(offset);
        self.log.push(Access::Read(offset, value));
        value
    }

    fn write(&mut self, addr: usize, value: u32) {
        let offset = addr.wrapping_sub(self.base);
        if offset >= WINDOW {
            self.outside.push((addr, value));
            return;
        }
        self.log.push(Access::Write(offset, value));
        self.write_offset(offset, value);
    }

    fn delay_us(&mut self, us: u32) {
        self.delays += us;
    }
}

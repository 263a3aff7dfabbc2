//! A UART_DM register block emulated in RAM.
//!
//! QEMU's lm3s6965evb has no UART_DM, so the examples drive the real driver
//! against this [`Bus`]. Words written to `TF` are cut to the programmed
//! character count and forwarded to UART0; the receive side is fed by
//! [`EmulatedUartDm::inject`].

use msm_uart_dm::regs::{cr, isr, sr};
use msm_uart_dm::{Bus, FifoWord, RegisterMap};

/// Base address the examples register the emulated block at.
pub const BASE: usize = 0x7800_0000;

const RX_CAPACITY: usize = 64;

/// Register file and FIFO state of one emulated block.
pub struct EmulatedUartDm {
    map: RegisterMap,
    registers: [u32; 0x60],
    tx_remaining: u32,
    rx: [u8; RX_CAPACITY],
    rx_head: usize,
    rx_len: usize,
    stale: bool,
    stuck: bool,
}

impl EmulatedUartDm {
    pub const fn new(map: RegisterMap) -> Self {
        EmulatedUartDm {
            map,
            registers: [0; 0x60],
            tx_remaining: 0,
            rx: [0; RX_CAPACITY],
            rx_head: 0,
            rx_len: 0,
            stale: false,
            stuck: false,
        }
    }

    /// A block whose transmitter never reports ready.
    pub const fn stuck(map: RegisterMap) -> Self {
        let mut uart = Self::new(map);
        uart.stuck = true;
        uart
    }

    /// Queues `bytes` as received characters. Bytes beyond the queue capacity are dropped.
    pub fn inject(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.rx_len == RX_CAPACITY {
                break;
            }
            self.rx[(self.rx_head + self.rx_len) % RX_CAPACITY] = b;
            self.rx_len += 1;
        }
    }

    fn pop_word(&mut self) -> u32 {
        let mut lanes = [0; 4];
        for lane in lanes.iter_mut().take(self.rx_len) {
            *lane = self.rx[self.rx_head];
            self.rx_head = (self.rx_head + 1) % RX_CAPACITY;
            self.rx_len -= 1;
        }
        FifoWord::from_lanes(lanes).raw()
    }

    fn status(&self) -> u32 {
        let mut status = 0;
        if !self.stuck {
            status |= sr::TXRDY | sr::TXEMT;
        }
        if self.rx_len >= 4 {
            status |= sr::RXRDY;
        }
        status
    }
}

impl Bus for EmulatedUartDm {
    fn read(&mut self, addr: usize) -> u32 {
        let offset = addr - BASE;
        let map = self.map;
        if offset == map.sr {
            self.status()
        } else if offset == map.isr {
            if self.stuck { 0 } else { isr::TX_READY }
        } else if offset == map.rxfs {
            ((self.rx_len % 4) as u32) << 7
        } else if offset == map.rf {
            if self.stale || self.rx_len >= 4 {
                self.stale = false;
                self.pop_word()
            } else {
                0
            }
        } else {
            self.registers[offset / 4]
        }
    }

    fn write(&mut self, addr: usize, value: u32) {
        let offset = addr - BASE;
        let map = self.map;
        if offset == map.tf {
            let lanes = FifoWord::from_raw(value).lanes();
            let take = self.tx_remaining.min(4) as usize;
            crate::uart::write_bytes(&lanes[..take]);
            self.tx_remaining -= take as u32;
        } else if offset == map.cr {
            match value {
                cr::FORCE_STALE => self.stale = true,
                cr::RESET_RX => self.rx_len = 0,
                _ => {}
            }
        } else {
            if offset == map.no_chars_for_tx {
                self.tx_remaining = value;
            }
            self.registers[offset / 4] = value;
        }
    }

    fn delay_us(&mut self, _us: u32) {
        cortex_m::asm::nop();
    }
}


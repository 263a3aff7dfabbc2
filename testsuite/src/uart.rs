//! The LM3S6965 UART0 that QEMU connects to its first `-serial` backend.
//!
//! Characters the emulated UART_DM puts on its wire end up here, so the test
//! harness can capture them.

use core::ptr::{with_exposed_provenance, with_exposed_provenance_mut};

const UART0_BASE: usize = 0x4000_C000;

const UART_DR_OFFSET: usize = 0x000; // Data Register
const UART_FR_OFFSET: usize = 0x018; // Flag Register
const UART_FR_TXFF: u32 = 0x20; // Transmit FIFO Full

/// Sends one character to the host capture.
pub fn write_byte(byte: u8) {
    let dr = with_exposed_provenance_mut::<u32>(UART0_BASE + UART_DR_OFFSET);
    let fr = with_exposed_provenance::<u32>(UART0_BASE + UART_FR_OFFSET);
    // SAFETY: UART0 is always mapped on the emulated board and only used from here.
    unsafe {
        while fr.read_volatile() & UART_FR_TXFF != 0 {}
        dr.write_volatile(u32::from(byte));
    }
}

/// Sends `bytes` to the host capture without any transcoding.
pub fn write_bytes(bytes: &[u8]) {
    for &byte in bytes {
        write_byte(byte);
    }
}

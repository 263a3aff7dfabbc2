#![no_std]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

// Must come first so the logging macros are visible in every module below.
#[macro_use]
mod fmt;

mod bus;
mod config;
mod crlf;
mod driver;
mod io;
#[cfg(test)]
mod mock;
mod poll;
mod port;
pub mod regs;
mod rx;
mod tx;
mod word;

pub use bus::{Board, Bus, Mmio};
pub use config::{Config, DEFAULT_BANNER};
pub use crlf::{Crlf, physical_len};
pub use driver::UartDm;
pub use io::Port;
pub use poll::{DEFAULT_POLL_BUDGET, PollPolicy};
pub use port::{DEFAULT_PORTS, PortId, PortRegistry};
pub use regs::RegisterMap;
pub use word::{FifoWord, LANES, words_for};

/// Error returned by the character I/O operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An empty buffer was passed, or its transcoded length does not fit the
    /// character count register.
    InvalidArgument,
    /// The port id does not belong to an initialized port.
    Uninitialized,
    /// Nothing has been received. Not a fault: try again later.
    RxNotReady,
    /// A status bit did not assert within the configured poll budget.
    Timeout,
}

impl Error {
    /// The integer code used for this error by the boot environment's C
    /// console interface.
    pub const fn code(self) -> i32 {
        match self {
            Error::Timeout => 2,
            Error::InvalidArgument => 3,
            Error::RxNotReady => 5,
            Error::Uninitialized => -1,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Error::InvalidArgument => "invalid argument",
            Error::Uninitialized => "port not initialized",
            Error::RxNotReady => "no character received",
            Error::Timeout => "timed out waiting for the UART",
        })
    }
}

impl core::error::Error for Error {}

/// Error returned by [`UartDm::init`] when a port cannot be brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The UART_DM base address is null.
    InvalidBase,
    /// Every slot of the port registry is taken.
    RegistryFull,
    /// The init banner could not be sent.
    Transmit(Error),
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::InvalidBase => f.write_str("null UART_DM base address"),
            InitError::RegistryFull => f.write_str("port registry is full"),
            InitError::Transmit(e) => write!(f, "init banner failed: {e}"),
        }
    }
}

impl core::error::Error for InitError {}

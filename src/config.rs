//! Driver configuration.

use crate::poll::PollPolicy;
use crate::regs::{CSR_115200, RegisterMap};

/// Banner printed on every port right after it is initialized.
pub const DEFAULT_BANNER: &[u8] = b"Android Bootloader - UART_DM Initialized!!!\n";

/// Driver configuration, shared by all ports of a [`UartDm`](crate::UartDm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Register layout of the UART_DM blocks.
    pub registers: RegisterMap,
    /// Value programmed into `CSR`, selecting the RX and TX bit rates.
    pub clock_select: u32,
    /// Enables RX-ready hardware flow control in `MR1`, for boards wired to
    /// an RS-232 connector.
    pub rx_flow_control: bool,
    /// Sent once after a port is initialized, if set.
    pub banner: Option<&'static [u8]>,
    /// How long to wait for transmitter status bits.
    pub poll: PollPolicy,
}

impl Config {
    /// BLSP register layout, 115200 8-N-1 with flow control, default banner
    /// and a bounded poll budget.
    pub const fn new() -> Self {
        Config {
            registers: RegisterMap::BLSP,
            clock_select: CSR_115200,
            rx_flow_control: true,
            banner: Some(DEFAULT_BANNER),
            poll: PollPolicy::Budget(crate::poll::DEFAULT_POLL_BUDGET),
        }
    }

    /// Selects the register layout.
    pub const fn with_registers(mut self, registers: RegisterMap) -> Self {
        self.registers = registers;
        self
    }

    /// Overrides the `CSR` value.
    pub const fn with_clock_select(mut self, clock_select: u32) -> Self {
        self.clock_select = clock_select;
        self
    }

    /// Enables or disables RX-ready flow control.
    pub const fn with_rx_flow_control(mut self, enabled: bool) -> Self {
        self.rx_flow_control = enabled;
        self
    }

    /// Sets or clears the init banner.
    pub const fn with_banner(mut self, banner: Option<&'static [u8]>) -> Self {
        self.banner = banner;
        self
    }

    /// Sets the poll policy.
    pub const fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

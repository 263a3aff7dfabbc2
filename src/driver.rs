//! The driver context: registered ports, their receive caches and the bus.

use crate::bus::{Block, Board, Bus};
use crate::config::Config;
use crate::io::Port;
use crate::port::{DEFAULT_PORTS, PortId, PortRegistry};
use crate::regs::{DMEN_OFF, MR1_RX_RDY_CTL, MR2_8N1, cr, gsbi};
use crate::rx::{RxCache, fetch};
use crate::tx::{drain, transmit};
use crate::{Error, InitError};

/// UART_DM console driver for up to `N` ports.
///
/// All driver state lives here. The boot environment owns one instance and
/// passes it by `&mut` to every call, so sharing it between execution
/// contexts requires an explicit lock around it.
pub struct UartDm<B, const N: usize = DEFAULT_PORTS> {
    bus: B,
    config: Config,
    ports: PortRegistry<N>,
    rx: [RxCache; N],
}

impl<B: Bus, const N: usize> UartDm<B, N> {
    /// Creates a driver with no initialized ports.
    pub const fn new(bus: B, config: Config) -> Self {
        UartDm {
            bus,
            config,
            ports: PortRegistry::new(),
            rx: [RxCache::EMPTY; N],
        }
    }

    /// Brings up the UART_DM block at `uart_base` and registers it.
    ///
    /// `block` is the hardware instance number handed to the board hooks.
    /// `gsbi_base`, when given, is the GSBI wrapper whose protocol select is
    /// switched to UART.
    ///
    /// The registry capacity and the base address are checked before any
    /// register is written. If the banner cannot be sent the port is left
    /// unregistered.
    pub fn init(
        &mut self,
        board: &mut impl Board,
        block: u8,
        gsbi_base: Option<usize>,
        uart_base: usize,
    ) -> Result<PortId, InitError> {
        if uart_base == 0 {
            return Err(InitError::InvalidBase);
        }
        if self.ports.is_full() {
            return Err(InitError::RegistryFull);
        }

        board.configure_clock(block);
        self.bus.barrier();
        board.configure_gpio(block);
        self.bus.barrier();

        if let Some(gsbi_base) = gsbi_base {
            self.bus.write(
                gsbi_base + gsbi::CTRL,
                gsbi::PROTOCOL_I2C_UART << gsbi::PROTOCOL_CODE_SHIFT,
            );
            self.bus.barrier();
        }

        let Config {
            registers: map,
            clock_select,
            rx_flow_control,
            banner,
            poll,
        } = self.config;
        let mut regs = Block {
            bus: &mut self.bus,
            map: &map,
            base: uart_base,
        };

        regs.write(map.csr, clock_select);
        regs.bus.barrier();
        regs.write(map.mr1, if rx_flow_control { MR1_RX_RDY_CTL } else { 0 });
        regs.write(map.mr2, MR2_8N1);
        regs.command(cr::RESET_RX);
        regs.command(cr::RESET_TX);
        regs.write(map.dmen, DMEN_OFF);

        if let Some(banner) = banner {
            transmit(&mut regs, poll, banner).map_err(|e| {
                warn!("uart_dm: init banner failed on {:#x}", uart_base);
                InitError::Transmit(e)
            })?;
        }

        let id = self.ports.register(uart_base)?;
        self.rx[id.index()] = RxCache::EMPTY;
        debug!("uart_dm: block {} at {:#x} is port {}", block, uart_base, id.0);
        Ok(id)
    }

    /// Sends one character, expanding `\n` to `\r\n`.
    pub fn put_char(&mut self, port: PortId, byte: u8) -> Result<(), Error> {
        self.write(port, &[byte])
    }

    /// Sends `bytes`, expanding every `\n` to `\r\n`.
    ///
    /// An empty slice is [`Error::InvalidArgument`].
    pub fn write(&mut self, port: PortId, bytes: &[u8]) -> Result<(), Error> {
        let base = self.base(port)?;
        let poll = self.config.poll;
        let map = self.config.registers;
        transmit(
            &mut Block {
                bus: &mut self.bus,
                map: &map,
                base,
            },
            poll,
            bytes,
        )
    }

    /// Waits until everything sent on `port` has left the transmitter.
    pub fn flush(&mut self, port: PortId) -> Result<(), Error> {
        let base = self.base(port)?;
        let poll = self.config.poll;
        let map = self.config.registers;
        drain(
            &mut Block {
                bus: &mut self.bus,
                map: &map,
                base,
            },
            poll,
        )
    }

    /// Returns the next received character.
    ///
    /// Characters come out of a one-word cache; the FIFO is only read once
    /// the cache is used up. With `wait` the call spins until a character
    /// arrives. Without it an empty FIFO yields [`Error::RxNotReady`] and
    /// leaves the cache untouched.
    pub fn get_char(&mut self, port: PortId, wait: bool) -> Result<u8, Error> {
        let base = self.base(port)?;
        let slot = port.index();

        if self.rx[slot].is_empty() {
            let map = self.config.registers;
            let mut regs = Block {
                bus: &mut self.bus,
                map: &map,
                base,
            };
            let received = loop {
                match fetch(&mut regs) {
                    Err(Error::RxNotReady) if wait => continue,
                    res => break res?,
                }
            };
            self.rx[slot].fill(received);
        }

        // A fill always carries at least one character.
        self.rx[slot].pop().ok_or(Error::RxNotReady)
    }

    /// A [`Port`] handle implementing the `embedded-io` and `core::fmt`
    /// traits for `port`.
    pub fn port(&mut self, port: PortId) -> Result<Port<'_, B, N>, Error> {
        self.base(port)?;
        Ok(Port::new(self, port))
    }

    /// The registered ports.
    pub fn ports(&self) -> &PortRegistry<N> {
        &self.ports
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// The underlying bus, mutably.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consumes the driver, returning the bus.
    pub fn release(self) -> B {
        self.bus
    }

    fn base(&self, port: PortId) -> Result<usize, Error> {
        self.ports.resolve(port).ok_or(Error::Uninitialized)
    }
}

//! Register access and board integration seams.

use core::ptr::{with_exposed_provenance, with_exposed_provenance_mut};
use core::sync::atomic::{Ordering, fence};

use crate::Error;
use crate::poll::PollPolicy;
use crate::regs::RegisterMap;

/// 32-bit register access used by the driver.
///
/// Addresses are absolute: the driver adds register offsets to the block base
/// before calling into the bus.
pub trait Bus {
    /// Reads the register at `addr`.
    fn read(&mut self, addr: usize) -> u32;

    /// Writes `value` to the register at `addr`.
    fn write(&mut self, addr: usize, value: u32);

    /// Busy-waits for roughly `us` microseconds. Called between status polls.
    fn delay_us(&mut self, us: u32);

    /// Orders all previous register writes before any following access.
    ///
    /// The default is a `SeqCst` fence, which is a `dmb` on ARM. Bring-up
    /// after clock and pad configuration expects the writes to have
    /// completed, so hardware buses should issue a `dsb` instead.
    #[inline]
    fn barrier(&mut self) {
        fence(Ordering::SeqCst);
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    #[inline]
    fn read(&mut self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&mut self, addr: usize, value: u32) {
        (**self).write(addr, value)
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    #[inline]
    fn barrier(&mut self) {
        (**self).barrier()
    }
}

/// Volatile memory-mapped register access.
pub struct Mmio {
    delay_us: fn(u32),
    barrier: fn(),
}

fn fence_seq_cst() {
    fence(Ordering::SeqCst);
}

impl Mmio {
    /// Creates a bus that dereferences register addresses directly.
    ///
    /// `delay_us` is the platform's microsecond delay.
    ///
    /// # Safety
    ///
    /// Every address later handed to the driver (UART_DM and GSBI bases) must
    /// be mapped as device memory, and the registers must not be driven by
    /// anything else while this bus is in use.
    pub const unsafe fn new(delay_us: fn(u32)) -> Self {
        Mmio {
            delay_us,
            barrier: fence_seq_cst,
        }
    }

    /// Replaces the barrier run after clock, pad and `CSR` programming.
    ///
    /// On Cortex-M pass `cortex_m::asm::dsb`; on AArch64 a function issuing
    /// `dsb sy`.
    pub const fn with_barrier(mut self, barrier: fn()) -> Self {
        self.barrier = barrier;
        self
    }
}

impl Bus for Mmio {
    #[inline]
    fn read(&mut self, addr: usize) -> u32 {
        // SAFETY: The constructor's contract makes `addr` a mapped, aligned device register.
        unsafe { with_exposed_provenance::<u32>(addr).read_volatile() }
    }

    #[inline]
    fn write(&mut self, addr: usize, value: u32) {
        // SAFETY: The constructor's contract makes `addr` a mapped, aligned device register.
        unsafe { with_exposed_provenance_mut::<u32>(addr).write_volatile(value) }
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        (self.delay_us)(us)
    }

    #[inline]
    fn barrier(&mut self) {
        (self.barrier)()
    }
}

/// Board-specific setup the UART block needs before it can be programmed.
pub trait Board {
    /// Enables and configures the clocks of UART block `block`.
    fn configure_clock(&mut self, block: u8);

    /// Routes the pads of UART block `block` to the serial function.
    fn configure_gpio(&mut self, block: u8);
}

/// A board whose clocks and pads were already set up by an earlier stage.
impl Board for () {
    fn configure_clock(&mut self, _block: u8) {}

    fn configure_gpio(&mut self, _block: u8) {}
}

/// One UART_DM register block seen through a bus.
pub(crate) struct Block<'a, B> {
    pub(crate) bus: &'a mut B,
    pub(crate) map: &'a RegisterMap,
    pub(crate) base: usize,
}

impl<B: Bus> Block<'_, B> {
    /// Address of the register at `offset`.
    #[inline]
    pub(crate) fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    #[inline]
    pub(crate) fn read(&mut self, offset: usize) -> u32 {
        let addr = self.addr(offset);
        self.bus.read(addr)
    }

    #[inline]
    pub(crate) fn write(&mut self, offset: usize, value: u32) {
        let addr = self.addr(offset);
        self.bus.write(addr, value)
    }

    /// Issues a `CR` command.
    #[inline]
    pub(crate) fn command(&mut self, cmd: u32) {
        self.write(self.map.cr, cmd)
    }

    /// Waits until `mask` is set in the register at `offset`.
    pub(crate) fn wait_for(&mut self, policy: PollPolicy, offset: usize, mask: u32) -> Result<(), Error> {
        let addr = self.addr(offset);
        policy.wait_for_bits(self.bus, addr, mask)
    }
}

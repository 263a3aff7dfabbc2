//! UART_DM register offsets, status bits and command encodings.

/// Offsets of the registers the driver touches, relative to the block base.
///
/// Some layouts alias registers: the same offset can be a write-only
/// register and a different read-only register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterMap {
    /// Mode register 1 (flow control).
    pub mr1: usize,
    /// Mode register 2 (character format).
    pub mr2: usize,
    /// Clock select (write).
    pub csr: usize,
    /// Status (read).
    pub sr: usize,
    /// Command (write).
    pub cr: usize,
    /// Interrupt status (read).
    pub isr: usize,
    /// RX transfer length / watermark.
    pub dmrx: usize,
    /// Data mover enable.
    pub dmen: usize,
    /// Number of characters in the next transmit transfer.
    pub no_chars_for_tx: usize,
    /// RX FIFO state.
    pub rxfs: usize,
    /// First TX FIFO data register.
    pub tf: usize,
    /// First RX FIFO data register.
    pub rf: usize,
}

impl RegisterMap {
    /// Layout of UART_DM blocks behind a BLSP wrapper (MSM8974 and later).
    pub const BLSP: Self = RegisterMap {
        mr1: 0x00,
        mr2: 0x04,
        dmrx: 0x34,
        dmen: 0x3c,
        no_chars_for_tx: 0x40,
        rxfs: 0x50,
        csr: 0xa0,
        sr: 0xa4,
        cr: 0xa8,
        isr: 0xb4,
        tf: 0x100,
        rf: 0x140,
    };

    /// Layout of UART_DM blocks behind a GSBI wrapper.
    pub const GSBI: Self = RegisterMap {
        mr1: 0x00,
        mr2: 0x04,
        csr: 0x08,
        sr: 0x08,
        cr: 0x10,
        isr: 0x14,
        dmrx: 0x34,
        dmen: 0x3c,
        no_chars_for_tx: 0x40,
        rxfs: 0x50,
        tf: 0x70,
        rf: 0x70,
    };
}

impl Default for RegisterMap {
    fn default() -> Self {
        RegisterMap::BLSP
    }
}

/// `SR` bits.
pub mod sr {
    /// RX FIFO holds at least one full word.
    pub const RXRDY: u32 = 1 << 0;
    /// TX FIFO can take a word.
    pub const TXRDY: u32 = 1 << 2;
    /// TX FIFO and shift register are empty.
    pub const TXEMT: u32 = 1 << 3;
    /// A received character was lost.
    pub const OVERRUN: u32 = 1 << 4;
}

/// `ISR` bits.
pub mod isr {
    /// The previous transmit transfer has been taken by the FIFO.
    pub const TX_READY: u32 = 1 << 7;
}

/// `CR` command encodings.
pub mod cr {
    /// Channel command: reset receiver.
    pub const RESET_RX: u32 = 0x1 << 4;
    /// Channel command: reset transmitter.
    pub const RESET_TX: u32 = 0x2 << 4;
    /// Channel command: reset error status.
    pub const RESET_ERROR_STATUS: u32 = 0x3 << 4;
    /// Channel command: reset stale interrupt.
    pub const RESET_STALE_INT: u32 = 0x8 << 4;
    /// General command: reset TX_READY interrupt.
    pub const RESET_TX_READY: u32 = 0x3 << 8;
    /// General command: flush the RX packing buffer into the FIFO.
    pub const FORCE_STALE: u32 = 0x4 << 8;
}

/// `RXFS` fields.
pub mod rxfs {
    /// Extracts the number of characters in the RX packing buffer.
    #[inline]
    pub const fn buffer_count(rxfs: u32) -> u32 {
        (rxfs >> 7) & 0x7
    }
}

/// `MR1` bit enabling RX-ready hardware flow control.
pub const MR1_RX_RDY_CTL: u32 = 1 << 7;

/// `MR2` value for 8 data bits, no parity, one stop bit.
pub const MR2_8N1: u32 = (0x3 << 4) | (0x1 << 2);

/// `DMEN` value disabling data mover and single-character mode.
pub const DMEN_OFF: u32 = 0;

/// `CSR` value for 115200 baud on both RX and TX.
pub const CSR_115200: u32 = 0xff;

/// `DMRX` value re-arming single-word RX transfers.
pub const DMRX_WORD: u32 = 0x7;

/// GSBI wrapper control register.
pub mod gsbi {
    /// Offset of the control register.
    pub const CTRL: usize = 0x00;
    /// Protocol code selecting I2C on two ports and UART on the other two.
    pub const PROTOCOL_I2C_UART: u32 = 0x6;
    /// Shift of the protocol code field.
    pub const PROTOCOL_CODE_SHIFT: u32 = 4;
}

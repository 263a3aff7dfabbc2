//! Stream adapters over a single port.

use core::fmt;

use embedded_io::ErrorKind;

use crate::Error;
use crate::bus::Bus;
use crate::driver::UartDm;
use crate::port::PortId;

/// A registered port borrowed from its [`UartDm`].
///
/// Implements [`embedded_io::Read`], [`embedded_io::Write`] and
/// [`core::fmt::Write`], so the console can be handed to code that is generic
/// over byte streams or used with `write!`.
pub struct Port<'a, B, const N: usize> {
    uart: &'a mut UartDm<B, N>,
    id: PortId,
}

impl<'a, B: Bus, const N: usize> Port<'a, B, N> {
    pub(crate) fn new(uart: &'a mut UartDm<B, N>, id: PortId) -> Self {
        Port { uart, id }
    }

    /// Id of the borrowed port.
    pub fn id(&self) -> PortId {
        self.id
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument => ErrorKind::InvalidInput,
            Error::Uninitialized => ErrorKind::NotConnected,
            Error::RxNotReady => ErrorKind::Other,
            Error::Timeout => ErrorKind::TimedOut,
        }
    }
}

impl<B: Bus, const N: usize> embedded_io::ErrorType for Port<'_, B, N> {
    type Error = Error;
}

impl<B: Bus, const N: usize> embedded_io::Write for Port<'_, B, N> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.uart.write(self.id, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.uart.flush(self.id)
    }
}

impl<B: Bus, const N: usize> embedded_io::Read for Port<'_, B, N> {
    /// Blocks for the first character, then takes whatever else is already
    /// available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let Some((first, rest)) = buf.split_first_mut() else {
            return Ok(0);
        };
        *first = self.uart.get_char(self.id, true)?;

        let mut n = 1;
        for slot in rest {
            match self.uart.get_char(self.id, false) {
                Ok(byte) => *slot = byte,
                Err(Error::RxNotReady) => break,
                Err(e) => return Err(e),
            }
            n += 1;
        }
        Ok(n)
    }
}

impl<B: Bus, const N: usize> fmt::Write for Port<'_, B, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        self.uart.write(self.id, s.as_bytes()).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod test {
    use embedded_io::{Read, Write};

    use super::*;
    use crate::config::Config;
    use crate::mock::MockUart;
    use crate::regs::RegisterMap;

    const BASE: usize = 0x3000;

    fn driver() -> UartDm<MockUart> {
        let config = Config::new().with_banner(None);
        UartDm::new(MockUart::new(BASE, RegisterMap::BLSP), config)
    }

    #[test]
    fn port_requires_registration() {
        let mut uart = driver();
        assert!(matches!(uart.port(PortId(0)), Err(Error::Uninitialized)));
    }

    #[test]
    fn io_write_transcodes() {
        let mut uart = driver();
        let id = uart.init(&mut (), 0, None, BASE).unwrap();
        let mut port = uart.port(id).unwrap();
        assert_eq!(port.write(b"ok\n"), Ok(3));
        assert_eq!(port.write(b""), Ok(0));
        port.flush().unwrap();
        assert_eq!(uart.bus().tx_bytes(), b"ok\r\n");
    }

    #[test]
    fn fmt_write_formats_into_the_fifo() {
        let mut uart = driver();
        let id = uart.init(&mut (), 0, None, BASE).unwrap();
        let mut port = uart.port(id).unwrap();
        fmt::Write::write_fmt(&mut port, format_args!("{}+{}={}\n", 1, 2, 1 + 2)).unwrap();
        assert_eq!(uart.bus().tx_bytes(), b"1+2=3\r\n");
    }

    #[test]
    fn io_read_drains_what_is_available() {
        let mut uart = driver();
        let id = uart.init(&mut (), 0, None, BASE).unwrap();
        uart.bus_mut().push_rx(b"hello");

        let mut buf = [0; 8];
        let n = uart.port(id).unwrap().read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert_eq!(uart.port(id).unwrap().read(&mut []), Ok(0));
    }

    #[test]
    fn error_kinds() {
        use embedded_io::Error as _;
        assert_eq!(Error::Timeout.kind(), ErrorKind::TimedOut);
        assert_eq!(Error::InvalidArgument.kind(), ErrorKind::InvalidInput);
    }
}

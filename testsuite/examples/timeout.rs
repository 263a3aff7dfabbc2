//! A transmitter that never becomes ready is reported instead of hanging.

#![no_std]
#![no_main]

use core::fmt::Write;

use msm_uart_dm::{Config, Error, InitError, PollPolicy, UartDm};
use testsuite::{BASE, EmulatedUartDm, entry, exit_failure, exit_success, uart};

struct HostSerial;

impl Write for HostSerial {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        uart::write_bytes(s.as_bytes());
        Ok(())
    }
}

#[entry]
fn main() -> ! {
    let config = Config::new().with_poll(PollPolicy::Budget(100));
    let mut dm: UartDm<EmulatedUartDm> = UartDm::new(EmulatedUartDm::stuck(config.registers), config);

    match dm.init(&mut (), 0, None, BASE) {
        Err(e @ InitError::Transmit(Error::Timeout)) => {
            let _ = writeln!(HostSerial, "{e}");
        }
        other => {
            defmt::error!("unexpected init result: {}", other);
            exit_failure();
        }
    }
    if !dm.ports().is_empty() {
        exit_failure();
    }
    exit_success();
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    defmt::error!("{}", defmt::Display2Format(info));
    exit_failure();
}

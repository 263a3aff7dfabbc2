//! Received characters come back out in order, including the tail that is
//! shorter than a FIFO word.

#![no_std]
#![no_main]

use msm_uart_dm::Error;
use testsuite::{BASE, emulated_driver, entry, exit_failure, exit_success, quiet_config};

#[entry]
fn main() -> ! {
    let mut uart = emulated_driver(quiet_config());
    let Ok(port) = uart.init(&mut (), 0, None, BASE) else {
        exit_failure();
    };

    if uart.get_char(port, false) != Err(Error::RxNotReady) {
        defmt::error!("empty FIFO produced a character");
        exit_failure();
    }

    uart.bus_mut().inject(b"echo: 0123456789\n");
    let mut echoed = 0;
    loop {
        match uart.get_char(port, false) {
            Ok(c) => {
                if uart.put_char(port, c).is_err() {
                    exit_failure();
                }
                echoed += 1;
            }
            Err(Error::RxNotReady) => break,
            Err(e) => {
                defmt::error!("read failed: {}", e);
                exit_failure();
            }
        }
    }
    defmt::info!("echoed {} characters", echoed);
    exit_success();
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    defmt::error!("{}", defmt::Display2Format(info));
    exit_failure();
}

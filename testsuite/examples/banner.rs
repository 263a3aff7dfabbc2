//! Initializing a port prints the init banner with a CRLF line ending.

#![no_std]
#![no_main]

use msm_uart_dm::Config;
use testsuite::{BASE, emulated_driver, entry, exit_failure, exit_success};

#[entry]
fn main() -> ! {
    let mut uart = emulated_driver(Config::new());
    match uart.init(&mut (), 0, None, BASE) {
        Ok(port) => defmt::info!("banner sent, console is port {}", port),
        Err(e) => {
            defmt::error!("init failed: {}", e);
            exit_failure();
        }
    }
    exit_success();
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    defmt::error!("{}", defmt::Display2Format(info));
    exit_failure();
}

//! Slices, single characters and formatted output all leave with `\r\n`
//! line endings, on both register layouts.

#![no_std]
#![no_main]

use core::fmt::Write;

use msm_uart_dm::RegisterMap;
use testsuite::{BASE, emulated_driver, entry, exit_failure, exit_success, quiet_config};

#[entry]
fn main() -> ! {
    for map in [RegisterMap::BLSP, RegisterMap::GSBI] {
        let mut uart = emulated_driver(quiet_config().with_registers(map));
        let Ok(port) = uart.init(&mut (), 0, None, BASE) else {
            exit_failure();
        };

        let line = *b"line one\nline two\n";
        if uart.write(port, &line).is_err() || line != *b"line one\nline two\n" {
            exit_failure();
        }
        for &c in b"abc\n" {
            if uart.put_char(port, c).is_err() {
                exit_failure();
            }
        }
        let Ok(mut console) = uart.port(port) else {
            exit_failure();
        };
        if writeln!(console, "{} + {} = {}", 2, 2, 2 + 2).is_err() {
            exit_failure();
        }
        defmt::info!("done with {}", map);
    }
    exit_success();
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    defmt::error!("{}", defmt::Display2Format(info));
    exit_failure();
}

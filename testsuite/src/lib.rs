#![no_std]

pub mod emulated;
pub mod uart;

use cortex_m_semihosting::debug::{self, EXIT_FAILURE, EXIT_SUCCESS};
use defmt_semihosting as _;
use msm_uart_dm::{Config, PollPolicy, UartDm};

pub use cortex_m_rt::entry;
pub use emulated::{BASE, EmulatedUartDm};

pub fn exit_success() -> ! {
    debug::exit(EXIT_SUCCESS);
    #[allow(clippy::empty_loop)]
    loop {}
}

pub fn exit_failure() -> ! {
    debug::exit(EXIT_FAILURE);
    #[allow(clippy::empty_loop)]
    loop {}
}

/// Driver configuration used by the examples: no banner, short poll budget.
pub const fn quiet_config() -> Config {
    Config::new()
        .with_banner(None)
        .with_poll(PollPolicy::Budget(1_000))
}

/// A driver over one emulated block, not yet initialized.
pub fn emulated_driver(config: Config) -> UartDm<EmulatedUartDm> {
    UartDm::new(EmulatedUartDm::new(config.registers), config)
}

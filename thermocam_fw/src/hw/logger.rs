// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend printing to the debug USART.
//!
//! Every record is written as one `[LEVEL] message` line with CRLF terminator. Output happens
//! inside a critical section so records from interrupt context do not interleave.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use stm32f7xx_hal::pac::USART1;

use super::Usart;

static PORT: Mutex<RefCell<Option<Usart<USART1>>>> = Mutex::new(RefCell::new(None));
static LOGGER: SerialLogger = SerialLogger;

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(port, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                port.flush();
            }
        });
    }
}

/// Hand `port` to the logger and install it. Only the first call installs; later calls just
/// swap the port.
pub fn init(port: Usart<USART1>, level: LevelFilter) {
    interrupt::free(|cs| {
        *PORT.borrow(cs).borrow_mut() = Some(port);
    });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

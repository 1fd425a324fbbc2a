//! Fuzz target: inbound command lines (console and HTTP reply bodies).
//!
//! Any text the display node or the server sends must parse to a command,
//! no command, or an error. Never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartbin::app::commands::AppCommand;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        let _ = AppCommand::parse(text);
    }
});

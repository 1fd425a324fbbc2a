//! HC-SR04 style trigger/echo pulse timer.
//!
//! Sends the trigger pulse (LOW 2 µs, HIGH 10 µs, LOW) and measures how
//! long the echo line stays HIGH.  The whole measurement, waiting for the
//! rising edge included, is bounded by `timeout_us`; the caller gets
//! `None` instead of a stuck loop.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Fire one ranging cycle and return the echo pulse width in µs.
///
/// `clock` is a free-running microsecond counter.  A pin error ends the
/// measurement as a timeout.
pub fn measure_pulse_us<T, E, D>(
    trig: &mut T,
    echo: &mut E,
    delay: &mut D,
    clock: impl Fn() -> u64,
    timeout_us: u32,
) -> Option<u32>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
{
    trig.set_low().ok()?;
    delay.delay_us(2);
    trig.set_high().ok()?;
    delay.delay_us(10);
    trig.set_low().ok()?;

    let timeout = u64::from(timeout_us);
    let start = clock();

    while !echo.is_high().ok()? {
        if clock().saturating_sub(start) > timeout {
            return None;
        }
    }

    let rise = clock();
    while echo.is_high().ok()? {
        if clock().saturating_sub(start) > timeout {
            return None;
        }
    }

    let width = clock().saturating_sub(rise);
    u32::try_from(width).ok()
}

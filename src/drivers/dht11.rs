//! DHT11 single-wire temperature / humidity probe.
//!
//! ```text
//!  host  ──┐ 18 ms ┌─────────────
//!          └───────┘
//!  probe                ┐80µs┌80µs┐ 40 bits: 50µs LOW + 26µs (0) / 70µs (1) HIGH
//!                       └────┘    └──...
//! ```
//!
//! Frame: humidity int, humidity dec, temperature int, temperature dec,
//! checksum (low byte of the sum of the first four).  Bit 7 of the
//! temperature decimal byte is the sign on newer parts.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::ClimateReading;
use crate::error::SensorError;

/// Longest any single level is allowed to last during the handshake or a bit.
const LEVEL_TIMEOUT_US: u64 = 100;
/// HIGH longer than this encodes a `1`.
const ONE_THRESHOLD_US: u64 = 40;

/// Validate the checksum and convert a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ProbeChecksum);
    }

    let humidity = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) * 0.1;
    let temperature_c = if frame[3] & 0x80 != 0 { -magnitude } else { magnitude };

    Ok(ClimateReading { temperature_c, humidity })
}

/// Spin until the line reaches `high`, returning how long it took.
fn wait_for<P: InputPin>(
    pin: &mut P,
    high: bool,
    clock: &impl Fn() -> u64,
) -> Result<u64, SensorError> {
    let start = clock();
    loop {
        let level = pin.is_high().map_err(|_| SensorError::ProbeTimeout)?;
        let elapsed = clock().saturating_sub(start);
        if level == high {
            return Ok(elapsed);
        }
        if elapsed > LEVEL_TIMEOUT_US {
            return Err(SensorError::ProbeTimeout);
        }
    }
}

/// Run one full transaction on an open-drain line.
///
/// Blocks for the 18 ms start signal plus roughly 5 ms of frame.
pub fn read<P, D>(
    pin: &mut P,
    delay: &mut D,
    clock: impl Fn() -> u64,
) -> Result<ClimateReading, SensorError>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pin.set_low().map_err(|_| SensorError::ProbeTimeout)?;
    delay.delay_ms(18);
    pin.set_high().map_err(|_| SensorError::ProbeTimeout)?;

    // Response: probe pulls LOW, then HIGH, then LOW to start bit 0.
    wait_for(pin, false, &clock)?;
    wait_for(pin, true, &clock)?;
    wait_for(pin, false, &clock)?;

    let mut frame = [0u8; 5];
    for bit in 0..40 {
        wait_for(pin, true, &clock)?;
        let high_us = wait_for(pin, false, &clock)?;
        if high_us > ONE_THRESHOLD_US {
            frame[bit / 8] |= 0x80 >> (bit % 8);
        }
    }

    decode_frame(frame)
}

/// Same as [`read`], folding failures into NaN for the sensor port.
pub fn read_or_nan<P, D>(pin: &mut P, delay: &mut D, clock: impl Fn() -> u64) -> ClimateReading
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    match read(pin, delay, clock) {
        Ok(reading) => reading,
        Err(e) => {
            log::debug!("DHT11: {}", e);
            ClimateReading::FAILED
        }
    }
}

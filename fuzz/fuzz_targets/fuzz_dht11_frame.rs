//! Fuzz target: DHT11 frame decoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartbin::drivers::dht11::decode_frame;

fuzz_target!(|frame: [u8; 5]| {
    if let Ok(reading) = decode_frame(frame) {
        assert!(reading.humidity >= 0.0);
        assert!(reading.temperature_c.abs() <= 255.0 + 12.7);
    }
});

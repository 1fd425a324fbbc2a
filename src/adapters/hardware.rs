//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns every pin of the principal board plus a delay provider, exposing
//! them through [`SensorPort`] and [`CoilPort`].  This is the only module
//! in the system that touches actual hardware.  On non-espidf targets,
//! the underlying GPIO/ADC helpers are cfg-gated simulation stubs.
//!
//! The three bounded blocking points of the control loop all live here:
//! the echo wait, the probe transaction and the debounce settle.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, PinState};

use crate::app::ports::{ClimateReading, CoilPort, DigitalInput, SensorPort};
use crate::drivers::gpio::GpioPin;
use crate::drivers::stepper::{CoilPattern, GpioCoils};
use crate::drivers::{dht11, echo, hw_init};
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D: DelayNs> {
    trig: GpioPin,
    echo: GpioPin,
    probe: GpioPin,
    flame: GpioPin,
    infrared: GpioPin,
    button: GpioPin,
    battery_channel: u32,
    coils: GpioCoils<GpioPin>,
    delay: D,
}

impl<D: DelayNs> HardwareAdapter<D> {
    /// Wire the board pin map.  Pins must already be configured by
    /// [`hw_init::init_peripherals`].
    pub fn new(delay: D) -> Self {
        Self {
            trig: GpioPin::new(pins::TRIG_GPIO),
            echo: GpioPin::new(pins::ECHO_GPIO),
            probe: GpioPin::new(pins::DHT_GPIO),
            flame: GpioPin::new(pins::FLAME_GPIO),
            infrared: GpioPin::new(pins::IR_GPIO),
            button: GpioPin::new(pins::BUTTON_GPIO),
            battery_channel: pins::BATTERY_ADC1_CHANNEL,
            coils: GpioCoils::new(pins::MOTOR_COIL_GPIOS.map(GpioPin::new)),
            delay,
        }
    }

    pub fn coil_pattern(&self) -> CoilPattern {
        self.coils.current()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn measure_echo_us(&mut self, timeout_us: u32) -> Option<u32> {
        echo::measure_pulse_us(
            &mut self.trig,
            &mut self.echo,
            &mut self.delay,
            hw_init::now_us,
            timeout_us,
        )
    }

    fn read_climate(&mut self) -> ClimateReading {
        dht11::read_or_nan(&mut self.probe, &mut self.delay, hw_init::now_us)
    }

    fn read_battery_raw(&mut self) -> Option<u16> {
        hw_init::adc1_read(self.battery_channel)
    }

    fn read_level(&mut self, input: DigitalInput) -> PinState {
        let pin = match input {
            DigitalInput::Button => &mut self.button,
            DigitalInput::Infrared => &mut self.infrared,
            DigitalInput::Flame => &mut self.flame,
        };
        // Idle level on a read error: released / no flame.
        PinState::from(pin.is_high().unwrap_or(true))
    }

    fn settle_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

// ── CoilPort implementation ───────────────────────────────────

impl<D: DelayNs> CoilPort for HardwareAdapter<D> {
    fn energize(&mut self, pattern: CoilPattern) {
        self.coils.energize(pattern);
    }
}

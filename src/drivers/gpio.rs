//! `embedded-hal` digital pins over the raw GPIO helpers in [`hw_init`].
//!
//! Direction is fixed by [`hw_init::init_peripherals`]; this type only
//! reads and writes levels, so it implements both pin traits and the
//! drivers pick the one they need.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::hw_init;

/// A GPIO number, already configured at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin {
    num: i32,
}

impl GpioPin {
    pub const fn new(num: i32) -> Self {
        Self { num }
    }

    pub fn num(&self) -> i32 {
        self.num
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(hw_init::gpio_read(self.num))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!hw_init::gpio_read(self.num))
    }
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.num, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.num, true);
        Ok(())
    }
}

//! GPIO / peripheral pin assignments for the SmartBin principal board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Numbers are ESP32 GPIO numbers.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger (fill level)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a ranging cycle.
pub const TRIG_GPIO: i32 = 5;
/// Digital input: HIGH for the round-trip time of the echo.
/// Fed through a 5 V → 3.3 V divider.
pub const ECHO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// DHT11 temperature / humidity probe (single-wire, open-drain)
// ---------------------------------------------------------------------------

pub const DHT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Digital inputs (all active-low with pull-up)
// ---------------------------------------------------------------------------

/// Flame sensor module DO.  LOW = flame detected.
pub const FLAME_GPIO: i32 = 13;
/// Infrared break-beam across the flap opening.  LOW = beam broken (deposit).
pub const IR_GPIO: i32 = 14;
/// Momentary push-button (BOOT button on DevKit boards).
pub const BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Battery monitor (ADC1)
// ---------------------------------------------------------------------------

/// Battery voltage through the divider network.  GPIO34 = ADC1 channel 6.
pub const BATTERY_ADC_GPIO: i32 = 34;
pub const BATTERY_ADC1_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// 28BYJ-48 stepper via ULN2003 (flap motor)
// ---------------------------------------------------------------------------

/// Coil outputs IN1..IN4, in energization-table column order.
pub const MOTOR_COIL_GPIOS: [i32; 4] = [25, 26, 27, 33];

// ---------------------------------------------------------------------------
// UART link to the display node
// ---------------------------------------------------------------------------

pub const DISPLAY_UART_TX_GPIO: i32 = 17;
pub const DISPLAY_UART_RX_GPIO: i32 = 16;
pub const DISPLAY_UART_BAUD: u32 = 115_200;

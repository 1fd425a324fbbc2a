//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                  |
//! |------------|---------------------|------------------------------|
//! | `hardware` | SensorPort          | ESP32 GPIO, ADC1, DHT11      |
//! |            | CoilPort            | ULN2003 coil outputs         |
//! | `network`  | NetworkPort         | ESP-IDF WiFi STA + HTTP      |
//! | `console`  | ConsolePort         | UART link to display node    |
//! | `log_sink` | EventSink           | Serial log output            |
//! | `time`     | (loop clock)        | ESP32 high-resolution timer  |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod network;
pub mod time;

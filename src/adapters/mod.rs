//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to                   |
//! |-------------|-------------------------|-------------------------------|
//! | `hardware`  | every hardware port     | the drivers below, bundled    |
//! |             | + `DelayNs`             |                               |
//! | `lcd`       | DisplayPort             | HD44780 via PCF8574 (I2C)     |
//! | `log_sink`  | EventSink               | Serial log output             |
//! | `max30102`  | SampleSource            | MAX30102 PPG sensor (I2C)     |
//! | `time`      | ClockPort               | ESP32 high-resolution timer   |

pub mod hardware;
pub mod lcd;
pub mod log_sink;
pub mod max30102;
pub mod time;

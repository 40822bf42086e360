//! GPIO / peripheral pin assignments for the pulse oximeter board.
//!
//! Single source of truth: every adapter references this module rather
//! than hard-coding pin numbers.
//!
//! Target is the ESP32-S3: GPIO 0-21 and 26-48 exist, 19/20 carry USB.

// ---------------------------------------------------------------------------
// PPG sensor (MAX30102 on I2C0)
// ---------------------------------------------------------------------------

pub const SENSOR_I2C_SDA_GPIO: i32 = 8;
pub const SENSOR_I2C_SCL_GPIO: i32 = 9;
/// 400 kHz fast mode; the FIFO drains six bytes per sample.
pub const SENSOR_I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// Character LCD (HD44780 behind a PCF8574 backpack on I2C1)
// ---------------------------------------------------------------------------

pub const LCD_I2C_SDA_GPIO: i32 = 4;
pub const LCD_I2C_SCL_GPIO: i32 = 5;
pub const LCD_I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Active piezo buzzer, driven HIGH for tone.
pub const BUZZER_GPIO: i32 = 16;

/// Status LED, active HIGH.
pub const STATUS_LED_GPIO: i32 = 2;

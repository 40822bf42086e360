//! Pulse oximeter firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Max30102 (I2C0)   Lcd1602 (I2C1)   Buzzer   StatusLed         │
//! │  Esp32TimeAdapter  Delay            LogEventSink               │
//! │        └──────────── HardwareAdapter ──────────┘               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Window · FSM · Alerts · Display · Status LED          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::Delay;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info};

use pulseox::adapters::hardware::HardwareAdapter;
use pulseox::adapters::lcd::Lcd1602;
use pulseox::adapters::log_sink::LogEventSink;
use pulseox::adapters::max30102::Max30102;
use pulseox::adapters::time::Esp32TimeAdapter;
use pulseox::app::service::AppService;
use pulseox::config::MonitorConfig;
use pulseox::drivers::buzzer::Buzzer;
use pulseox::drivers::status_led::StatusLed;
use pulseox::pins;
use pulseox::sensors::estimator::PeakRatioEstimator;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PulseOx v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = MonitorConfig::default();
    let peripherals = Peripherals::take()?;
    let mut delay = Delay::new_default();

    // ── 2. Buses and GPIO ─────────────────────────────────────
    // SAFETY: each GPIO number is claimed exactly once, here.
    let (sensor_sda, sensor_scl, lcd_sda, lcd_scl, buzzer_pin, led_pin) = unsafe {
        (
            AnyIOPin::new(pins::SENSOR_I2C_SDA_GPIO),
            AnyIOPin::new(pins::SENSOR_I2C_SCL_GPIO),
            AnyIOPin::new(pins::LCD_I2C_SDA_GPIO),
            AnyIOPin::new(pins::LCD_I2C_SCL_GPIO),
            AnyOutputPin::new(pins::BUZZER_GPIO),
            AnyOutputPin::new(pins::STATUS_LED_GPIO),
        )
    };

    let sensor_bus = I2cDriver::new(
        peripherals.i2c0,
        sensor_sda,
        sensor_scl,
        &I2cConfig::new().baudrate(Hertz(pins::SENSOR_I2C_FREQ_HZ)),
    )?;
    let lcd_bus = I2cDriver::new(
        peripherals.i2c1,
        lcd_sda,
        lcd_scl,
        &I2cConfig::new().baudrate(Hertz(pins::LCD_I2C_FREQ_HZ)),
    )?;

    let buzzer = Buzzer::new(PinDriver::output(buzzer_pin)?);
    let mut led = StatusLed::new(PinDriver::output(led_pin)?);
    led.off();

    // ── 3. Collaborator setup (first failure wins) ────────────
    let mut sensor = Max30102::new(sensor_bus);
    let mut lcd = Lcd1602::new(lcd_bus, delay);

    let sensor_setup = sensor.init(&mut delay);
    let lcd_setup = lcd.init();
    let setup = sensor_setup.and(lcd_setup);
    if let Err(e) = setup {
        error!("Setup failed: {e}");
    }

    let mut hw = HardwareAdapter::new(
        sensor,
        lcd,
        buzzer,
        led,
        delay,
        Esp32TimeAdapter::new(),
    );
    let mut sink = LogEventSink::new();

    // ── 4. Application core ───────────────────────────────────
    let estimator = PeakRatioEstimator::new(config.sample_rate_hz);
    let mut app = AppService::new(config, estimator);
    app.start(setup, &mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(&mut hw, &mut sink);
    }
}

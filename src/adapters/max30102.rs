//! MAX30102 PPG sensor adapter.
//!
//! Implements [`SampleSource`] over any `embedded_hal` I2C bus. The chip
//! is configured once for SpO2 mode (red + IR), 100 sps with 4× on-chip
//! averaging, giving 25 effective samples per second at 18-bit resolution.
//!
//! ## FIFO handling
//!
//! `is_sample_available()` compares the FIFO write and read pointers and,
//! when they differ, pops one 6-byte sample into a pending slot.
//! `read_pair()` returns the pending sample and `advance()` drops it.
//! A failed transfer reads as "nothing available", so a dead bus turns
//! into a bounded poll timeout upstream rather than a hang.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

use crate::app::ports::SampleSource;
use crate::error::{self, SensorError, SetupFailure};
use crate::sensors::SamplePair;

/// 7-bit I2C address.
pub const ADDRESS: u8 = 0x57;

// ── Register map (subset) ─────────────────────────────────────
const REG_FIFO_WR_PTR: u8 = 0x04;
const REG_OVF_COUNTER: u8 = 0x05;
const REG_FIFO_RD_PTR: u8 = 0x06;
const REG_FIFO_DATA: u8 = 0x07;
const REG_FIFO_CONFIG: u8 = 0x08;
const REG_MODE_CONFIG: u8 = 0x09;
const REG_SPO2_CONFIG: u8 = 0x0A;
const REG_LED1_PA: u8 = 0x0C;
const REG_LED2_PA: u8 = 0x0D;
const REG_PART_ID: u8 = 0xFF;

const EXPECTED_PART_ID: u8 = 0x15;

const MODE_RESET: u8 = 0x40;
const MODE_SPO2: u8 = 0x03;
/// 4-sample averaging, FIFO rollover, almost-full at 17 free.
const FIFO_CONFIG: u8 = 0x5F;
/// ADC range 4096 nA, 100 sps, 411 µs pulse (18-bit).
const SPO2_CONFIG: u8 = 0x27;
/// ~7 mA per LED.
const LED_CURRENT: u8 = 0x24;

/// Bytes per FIFO sample (3 red + 3 IR).
const SAMPLE_BYTES: usize = 6;
const SAMPLE_MASK: u32 = 0x3FFFF;

pub struct Max30102<I2C> {
    i2c: I2C,
    pending: Option<SamplePair>,
}

impl<I2C: I2c> Max30102<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c, pending: None }
    }

    /// Verify the part id, reset, and apply the fixed configuration.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> error::Result<()> {
        let part_id = self.read_reg(REG_PART_ID).map_err(|_| {
            warn!("MAX30102: no response at 0x{ADDRESS:02X}");
            SetupFailure::Sensor
        })?;
        if part_id != EXPECTED_PART_ID {
            warn!("MAX30102: unexpected part id 0x{part_id:02X}");
            return Err(SetupFailure::Sensor.into());
        }

        self.configure(delay).map_err(|e| {
            warn!("MAX30102: configuration failed: {e}");
            SetupFailure::Sensor
        })?;

        info!("MAX30102: SpO2 mode, 25 sps effective");
        Ok(())
    }

    fn configure(&mut self, delay: &mut impl DelayNs) -> Result<(), SensorError> {
        self.write_reg(REG_MODE_CONFIG, MODE_RESET)?;
        delay.delay_ms(10);

        self.write_reg(REG_FIFO_WR_PTR, 0)?;
        self.write_reg(REG_OVF_COUNTER, 0)?;
        self.write_reg(REG_FIFO_RD_PTR, 0)?;
        self.write_reg(REG_FIFO_CONFIG, FIFO_CONFIG)?;
        self.write_reg(REG_MODE_CONFIG, MODE_SPO2)?;
        self.write_reg(REG_SPO2_CONFIG, SPO2_CONFIG)?;
        self.write_reg(REG_LED1_PA, LED_CURRENT)?;
        self.write_reg(REG_LED2_PA, LED_CURRENT)?;
        self.pending = None;
        Ok(())
    }

    /// Pop one sample from the FIFO if the chip has one queued.
    fn pop_fifo(&mut self) -> Result<Option<SamplePair>, SensorError> {
        let wr = self.read_reg(REG_FIFO_WR_PTR)?;
        let rd = self.read_reg(REG_FIFO_RD_PTR)?;
        if wr == rd {
            return Ok(None);
        }

        let mut raw = [0u8; SAMPLE_BYTES];
        self.i2c
            .write_read(ADDRESS, &[REG_FIFO_DATA], &mut raw)
            .map_err(|_| SensorError::Bus)?;

        Ok(Some(SamplePair::new(
            decode_channel(&raw[0..3]),
            decode_channel(&raw[3..6]),
        )))
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(ADDRESS, &[reg, value])
            .map_err(|_| SensorError::Bus)
    }
}

fn decode_channel(bytes: &[u8]) -> u32 {
    let raw = (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);
    raw & SAMPLE_MASK
}

impl<I2C: I2c> SampleSource for Max30102<I2C> {
    fn is_sample_available(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        match self.pop_fifo() {
            Ok(sample) => {
                self.pending = sample;
                sample.is_some()
            }
            Err(e) => {
                debug!("MAX30102: FIFO poll failed: {e}");
                false
            }
        }
    }

    fn read_pair(&mut self) -> SamplePair {
        self.pending.unwrap_or_default()
    }

    fn advance(&mut self) {
        self.pending = None;
    }
}

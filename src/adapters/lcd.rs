//! 16×2 character LCD adapter (HD44780 behind a PCF8574 I2C backpack).
//!
//! Implements [`DisplayPort`]. `clear`, `set_cursor` and `print` only edit
//! an in-memory frame; `commit` pushes rows that changed since the last
//! flush. Rows are always written in full (space padded), so the slow
//! HD44780 clear command is only issued at init.
//!
//! ## Backpack wiring
//!
//! ```text
//!  PCF8574 bit:  7   6   5   4   3    2   1   0
//!  HD44780:      D7  D6  D5  D4  BL   EN  RW  RS
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::DisplayPort;
use crate::error::{self, SetupFailure};

/// Common PCF8574 backpack address.
pub const ADDRESS: u8 = 0x27;

pub const COLS: usize = 16;
pub const ROWS: usize = 2;

const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0x04;
const REGISTER_SELECT: u8 = 0x01;

// ── HD44780 commands ──────────────────────────────────────────
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

type Frame = [[u8; COLS]; ROWS];

const BLANK_FRAME: Frame = [[b' '; COLS]; ROWS];

pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    frame: Frame,
    /// What the glass currently shows; `None` forces a full redraw.
    shown: Option<Frame>,
    col: usize,
    row: usize,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            frame: BLANK_FRAME,
            shown: None,
            col: 0,
            row: 0,
        }
    }

    /// Run the 4-bit initialisation sequence and clear the glass.
    pub fn init(&mut self) -> error::Result<()> {
        self.init_sequence().map_err(|()| {
            warn!("LCD: no ACK from backpack at 0x{ADDRESS:02X}");
            SetupFailure::Display
        })?;
        self.shown = Some(BLANK_FRAME);
        info!("LCD: 16x2 ready");
        Ok(())
    }

    fn init_sequence(&mut self) -> Result<(), ()> {
        self.delay.delay_ms(50);
        self.expander_write(BACKLIGHT)?;

        // Force 8-bit mode three times, then drop to 4-bit.
        for wait_us in [4_500, 4_500, 150] {
            self.write_nibble(0x30, 0)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x20, 0)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.command(CMD_ENTRY_MODE_INC)
    }

    fn command(&mut self, cmd: u8) -> Result<(), ()> {
        self.write_byte(cmd, 0)
    }

    fn write_byte(&mut self, value: u8, mode: u8) -> Result<(), ()> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble((value << 4) & 0xF0, mode)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), ()> {
        let bits = nibble | mode | BACKLIGHT;
        self.expander_write(bits | ENABLE)?;
        self.delay.delay_us(1);
        self.expander_write(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), ()> {
        self.i2c.write(ADDRESS, &[bits]).map_err(|_| ())
    }

    fn flush_row(&mut self, row: usize) -> Result<(), ()> {
        self.command(CMD_SET_DDRAM | ROW_OFFSETS[row])?;
        let bytes = self.frame[row];
        for b in bytes {
            self.write_byte(b, REGISTER_SELECT)?;
        }
        Ok(())
    }

    /// Current frame contents, for inspection.
    pub fn frame_row(&self, row: usize) -> &[u8; COLS] {
        &self.frame[row.min(ROWS - 1)]
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for Lcd1602<I2C, D> {
    fn clear(&mut self) {
        self.frame = BLANK_FRAME;
        self.col = 0;
        self.row = 0;
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.col = (col as usize).min(COLS);
        self.row = (row as usize).min(ROWS - 1);
    }

    fn print(&mut self, text: &str) {
        for ch in text.chars() {
            if self.col >= COLS {
                break;
            }
            self.frame[self.row][self.col] = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            self.col += 1;
        }
    }

    fn commit(&mut self) {
        for row in 0..ROWS {
            if self.shown.is_some_and(|s| s[row] == self.frame[row]) {
                continue;
            }
            if self.flush_row(row).is_err() {
                warn!("LCD: write failed on row {row}");
                self.shown = None;
                return;
            }
            if let Some(shown) = self.shown.as_mut() {
                shown[row] = self.frame[row];
            }
        }
        if self.shown.is_none() {
            self.shown = Some(self.frame);
        }
    }
}

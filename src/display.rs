//! Status display rendering.
//!
//! The original appliance painted a status bar onto a framebuffer while a
//! separate video player owned the rest of the screen. Here the render target
//! is the terminal: a colored status area with two text lines, right-aligned
//! clock and host details, and a bar graph for the detector signal ratio.

use std::io::{Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
#[cfg(test)]
use mockall::automock;

use crate::error::{Error, Result};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
        }
    }
}

/// Everything needed to paint one refresh of the status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Background color, driven by the alarm status.
    pub background: Rgb,
    /// First status line.
    pub line1: String,
    /// Right-aligned text on the first line (wall-clock time).
    pub line1_right: String,
    /// Second status line.
    pub line2: String,
    /// Right-aligned text on the second line (hostname and IP).
    pub line2_right: String,
    /// Bar-graph fill percentage, already clamped to `0..=100`.
    pub bar_percent: u8,
}

/// Height of the ratio bar in drawing units.
const BAR_UNITS: u16 = 40;

/// Minimum visible fill so the bar outline never vanishes entirely.
const BAR_MIN_FILL: u16 = 2;

/// Convert a fill percentage into bar units, flooring at the minimum
/// visible height.
pub(crate) fn bar_fill_units(percent: u8) -> u16 {
    let fill = BAR_UNITS * u16::from(percent) / 100;
    fill.max(BAR_MIN_FILL)
}

/// Render target for the status area.
///
/// Renders are idempotent: painting the same frame twice leaves the same
/// visible surface.
#[cfg_attr(test, automock)]
pub trait StatusDisplay: Send {
    /// Paint one frame.
    fn render(&mut self, frame: &DisplayFrame) -> Result<()>;
}

/// Terminal-backed status display.
pub struct TerminalDisplay {
    stdout: Stdout,
    width: u16,
    height: u16,
}

impl TerminalDisplay {
    /// Initialize the terminal render target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisplayInit`] if the terminal size cannot be
    /// determined, e.g. when stdout is not attached to a terminal. This is
    /// fatal: the process cannot run without a render target.
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().map_err(|e| Error::DisplayInit {
            reason: e.to_string(),
        })?;
        Ok(Self {
            stdout: std::io::stdout(),
            width,
            height,
        })
    }

    fn status_row(&self) -> u16 {
        self.height.saturating_sub(3)
    }
}

impl StatusDisplay for TerminalDisplay {
    fn render(&mut self, frame: &DisplayFrame) -> Result<()> {
        let row = self.status_row();
        let right1_col = self.width.saturating_sub(frame.line1_right.len() as u16);
        let right2_col = self.width.saturating_sub(frame.line2_right.len() as u16);

        queue!(
            self.stdout,
            SetBackgroundColor(frame.background.into()),
            SetForegroundColor(Color::White),
            MoveTo(0, row),
            Clear(ClearType::FromCursorDown),
            Print(&frame.line1),
            MoveTo(right1_col, row),
            Print(&frame.line1_right),
            MoveTo(0, row + 1),
            Print(&frame.line2),
            MoveTo(right2_col, row + 1),
            Print(&frame.line2_right),
        )?;

        // Ratio bar, drawn horizontally at half scale (one cell per two units).
        let filled = bar_fill_units(frame.bar_percent) / 2;
        queue!(
            self.stdout,
            MoveTo(0, row + 2),
            SetForegroundColor(Color::Red),
            Print("█".repeat(filled as usize)),
            SetForegroundColor(Color::DarkGrey),
            Print("░".repeat((BAR_UNITS / 2 - filled) as usize)),
            ResetColor,
        )?;

        self.stdout.flush()?;
        Ok(())
    }
}

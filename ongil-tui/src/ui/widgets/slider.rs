//! Dual-handle slider track.
//!
//! One row of cells: the selected span is drawn heavy, the rest light, and a
//! handle sits on the cell nearest its value. The same column arithmetic is
//! used to turn mouse columns back into pointer positions.

use ongil_core::slider::{DualRangeSlider, Handle, Track};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::theme;

const TRACK: &str = "─";
const SPAN: &str = "━";
const HANDLE: &str = "●";

/// Pointer geometry for a track drawn in `rect`: the first cell is fraction
/// 0, the last cell fraction 1.
pub fn track_for(rect: Rect) -> Track {
    Track::new(f64::from(rect.x), f64::from(rect.width.saturating_sub(1)))
}

/// Cell a fraction is drawn on.
pub fn handle_column(rect: Rect, fraction: f64) -> u16 {
    let span = f64::from(rect.width.saturating_sub(1));
    rect.x + (fraction.clamp(0.0, 1.0) * span).round() as u16
}

pub struct DualSlider<'a> {
    slider: &'a DualRangeSlider,
    /// Handle tied to the focused text field.
    focused: Option<Handle>,
}

impl<'a> DualSlider<'a> {
    pub fn new(slider: &'a DualRangeSlider) -> Self {
        Self {
            slider,
            focused: None,
        }
    }

    pub fn focused(mut self, handle: Option<Handle>) -> Self {
        self.focused = handle;
        self
    }

    fn handle_style(&self, handle: Handle) -> Style {
        let palette = theme::palette();
        let lit = self.slider.active_handle() == Some(handle) || self.focused == Some(handle);
        if lit {
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.accent)
        }
    }
}

impl Widget for DualSlider<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };
        let low_col = handle_column(row, self.slider.fraction(Handle::Low));
        let high_col = handle_column(row, self.slider.fraction(Handle::High));

        for x in row.x..row.right() {
            let (symbol, style) = if (low_col..=high_col).contains(&x) {
                (SPAN, theme::accent())
            } else {
                (TRACK, theme::muted())
            };
            buf[(x, row.y)].set_symbol(symbol).set_style(style);
        }

        if self.slider.is_single_value() {
            buf[(low_col, row.y)]
                .set_symbol(HANDLE)
                .set_style(self.handle_style(Handle::Low));
            return;
        }
        // High first so a collapsed pair shows the low handle on top.
        buf[(high_col, row.y)]
            .set_symbol(HANDLE)
            .set_style(self.handle_style(Handle::High));
        buf[(low_col, row.y)]
            .set_symbol(HANDLE)
            .set_style(self.handle_style(Handle::Low));
    }
}

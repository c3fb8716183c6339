//! Color tokens and shared styles for the Ongil TUI.
//!
//! # Color Palette
//! - **Background**: deep navy (base layer)
//! - **Accent**: sky blue (focus, active handle, selected rows)
//! - **Positive**: mint (high scores, success tips)
//! - **Negative**: coral (low scores, errors)
//! - **Warning**: amber (warnings, disabled apply)
//! - **Neutral**: lavender (partner board, secondary info)
//! - **Muted**: slate (hints, unfilled rows, inactive track)

use ongil_core::analysis::TipLevel;
use ongil_services::community::Board;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::night()
    }
}

impl Theme {
    pub const fn night() -> Self {
        Self {
            background: Color::Rgb(16, 20, 32),
            accent: Color::Rgb(86, 180, 255),
            positive: Color::Rgb(72, 219, 160),
            negative: Color::Rgb(255, 107, 107),
            warning: Color::Rgb(255, 184, 77),
            neutral: Color::Rgb(168, 148, 235),
            muted: Color::Rgb(112, 128, 150),
            text_primary: Color::White,
            text_secondary: Color::Rgb(176, 184, 196),
        }
    }

    /// Color for a 0-100 fit score.
    pub fn score_color(&self, score: f64) -> Color {
        match score {
            s if s >= 80.0 => self.positive,
            s if s >= 60.0 => self.accent,
            s if s >= 40.0 => self.warning,
            _ => self.negative,
        }
    }

    pub fn tip_color(&self, level: TipLevel) -> Color {
        match level {
            TipLevel::Success => self.positive,
            TipLevel::Warning => self.warning,
            TipLevel::Info => self.accent,
            TipLevel::Other => self.text_secondary,
        }
    }

    pub fn board_color(&self, board: Board) -> Color {
        match board {
            Board::Free => self.accent,
            Board::Partner => self.neutral,
        }
    }
}

const THEME: Theme = Theme::night();

pub fn palette() -> Theme {
    THEME
}

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn positive() -> Style {
    Style::default().fg(THEME.positive)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn secondary() -> Style {
    Style::default().fg(THEME.text_secondary)
}

/// Highlight for the row under the cursor.
pub fn selected() -> Style {
    Style::default()
        .fg(THEME.background)
        .bg(THEME.accent)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        secondary()
    }
}

/// Button look; disabled buttons are muted and crossed out.
pub fn button(enabled: bool) -> Style {
    if enabled {
        selected()
    } else {
        muted().add_modifier(Modifier::CROSSED_OUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_night() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(16, 20, 32));
        assert_eq!(theme.accent, palette().accent);
    }

    #[test]
    fn score_bands() {
        let theme = Theme::default();
        assert_eq!(theme.score_color(92.0), theme.positive);
        assert_eq!(theme.score_color(80.0), theme.positive);
        assert_eq!(theme.score_color(65.0), theme.accent);
        assert_eq!(theme.score_color(41.0), theme.warning);
        assert_eq!(theme.score_color(12.0), theme.negative);
    }

    #[test]
    fn tip_and_board_colors() {
        let theme = Theme::default();
        assert_eq!(theme.tip_color(TipLevel::Warning), theme.warning);
        assert_eq!(theme.tip_color(TipLevel::Other), theme.text_secondary);
        assert_eq!(theme.board_color(Board::Partner), theme.neutral);
    }

    #[test]
    fn disabled_button_is_not_highlighted() {
        assert_ne!(button(false), button(true));
        assert_eq!(panel_border(true), accent());
    }
}

//! Top-level UI layout: top bar, active screen, status bar, overlays.
//!
//! Every clickable region is computed by a layout function in this module
//! tree. Drawing and mouse hit-testing both call the same functions, so a
//! click always lands on what was drawn.

pub mod analysis;
pub mod community;
pub mod overlays;
pub mod sheets;
pub mod status_bar;
pub mod top_bar;
pub mod widgets;
pub mod wizard;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Screen};
use crate::theme;

/// Bottom sheets never grow wider than this.
pub const SHEET_WIDTH: u16 = 64;

pub fn draw(f: &mut Frame, app: &AppState) {
    let area = f.area();
    let frame = frame_layout(area);

    top_bar::render(f, frame.top, app);
    draw_screen(f, frame.main, app);
    status_bar::render(f, frame.status, app);

    match app.overlay {
        Overlay::RangeSheet => sheets::render_range(f, area, app),
        Overlay::ChoiceSheet => sheets::render_choice(f, area, app),
        Overlay::ExitConfirm => overlays::render_exit_confirm(f, frame.main),
        Overlay::Search => overlays::render_search(f, frame.main, app),
        Overlay::Compose => overlays::render_compose(f, frame.main, app),
        Overlay::Help => overlays::render_help(f, frame.main),
        Overlay::ConfirmDelete(id) => overlays::render_confirm_delete(f, frame.main, app, id),
        Overlay::ErrorHistory => overlays::render_error_history(f, frame.main, app),
        Overlay::None => {}
    }
}

fn draw_screen(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(app.overlay == Overlay::None));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.screen {
        Screen::Place => wizard::render_place(f, inner, app),
        Screen::Category => wizard::render_category(f, inner, app),
        Screen::Conditions => wizard::render_conditions(f, inner, app),
        Screen::Loading => wizard::render_loading(f, inner, app),
        Screen::Report => analysis::render(f, inner, app),
        Screen::Community => community::render_board(f, inner, app),
        Screen::PostDetail => community::render_post(f, inner, app),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub top: Rect,
    pub main: Rect,
    pub status: Rect,
}

/// One-line top bar, the screen, one-line status bar.
pub fn frame_layout(area: Rect) -> FrameLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    FrameLayout {
        top: chunks[0],
        main: chunks[1],
        status: chunks[2],
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A sheet of `height` rows docked to the bottom of the screen, just above
/// the status bar, horizontally centered.
pub fn bottom_sheet_rect(area: Rect, height: u16) -> Rect {
    let width = area.width.min(SHEET_WIDTH);
    let height = height.min(area.height.saturating_sub(1));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + area.height.saturating_sub(height + 1);
    Rect::new(x, y, width, height)
}

/// Does `rect` contain the cell at `(column, row)`?
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

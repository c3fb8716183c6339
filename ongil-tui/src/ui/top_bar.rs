//! Top bar: back button, screen title, close button. Clicks become `ShellEvent`s.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::shell::ShellEvent;
use crate::theme;

const BACK_LABEL: &str = " < Back ";
const CLOSE_LABEL: &str = " [x] ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopBarLayout {
    pub back: Rect,
    pub title: Rect,
    pub close: Rect,
}

pub fn layout(area: Rect) -> TopBarLayout {
    let back_w = (BACK_LABEL.len() as u16).min(area.width);
    let close_w = (CLOSE_LABEL.len() as u16).min(area.width - back_w);
    let back = Rect::new(area.x, area.y, back_w, area.height.min(1));
    let close = Rect::new(area.right() - close_w, area.y, close_w, area.height.min(1));
    let title = Rect::new(
        back.right(),
        area.y,
        area.width.saturating_sub(back_w + close_w),
        area.height.min(1),
    );
    TopBarLayout { back, title, close }
}

/// Which shell event a click at `(column, row)` stands for.
pub fn event_at(area: Rect, column: u16, row: u16) -> Option<ShellEvent> {
    let bar = layout(area);
    if super::hit(bar.back, column, row) {
        Some(ShellEvent::Back)
    } else if super::hit(bar.close, column, row) {
        Some(ShellEvent::Close)
    } else {
        None
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let bar = layout(area);
    f.render_widget(Paragraph::new(Span::styled(BACK_LABEL, theme::accent())), bar.back);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("ongil", theme::accent_bold()),
            Span::styled("  ", theme::muted()),
            Span::styled(app.screen.title(), theme::text()),
        ]))
        .alignment(Alignment::Center),
        bar.title,
    );
    f.render_widget(Paragraph::new(Span::styled(CLOSE_LABEL, theme::negative())), bar.close);
}

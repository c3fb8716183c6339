//! Bottom status bar: key hints for the current screen, then the last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Overlay, Screen, StatusLevel};
use crate::theme;

pub fn hints(app: &AppState) -> &'static str {
    match app.overlay {
        Overlay::RangeSheet | Overlay::ChoiceSheet => return " sheet open",
        Overlay::None => {}
        _ => return " Esc close",
    }
    match app.screen {
        Screen::Place => " type lat,lng  Enter next  Tab community  ? help  q quit",
        Screen::Category => " Enter choose  n next  Esc back  Tab community",
        Screen::Conditions => " ↑/↓ row  Enter edit  s analyze  Esc back  Tab community",
        Screen::Loading => " Esc back",
        Screen::Report => " ↑/↓ scroll  n new analysis  Tab community",
        Screen::Community => " ←/→ tab  Enter open  / search  f filter  w write  d delete  Tab wizard",
        Screen::PostDetail => " c comment  d delete  Esc back",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(hints(app), theme::muted())];

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! The three wizard steps and the loading screen.

use ongil_core::conditions::{ConditionRow, PLACEHOLDER};
use ongil_core::wizard::category_options;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Header line, blank line, then one row per condition.
pub fn condition_rows(inner: Rect) -> Vec<Rect> {
    ConditionRow::ALL
        .iter()
        .enumerate()
        .map(|(i, _)| Rect::new(inner.x, inner.y + 2 + i as u16, inner.width, 1))
        .filter(|r| r.bottom() <= inner.bottom())
        .collect()
}

/// Row the category picker occupies on the category screen.
pub fn category_button(inner: Rect) -> Rect {
    Rect::new(inner.x, inner.y + 2, inner.width, 1).intersection(inner)
}

fn progress(step: usize) -> Line<'static> {
    let dots: Vec<Span> = (1..=3)
        .map(|n| {
            if n <= step {
                Span::styled("● ", theme::accent())
            } else {
                Span::styled("○ ", theme::muted())
            }
        })
        .collect();
    Line::from(dots)
}

pub fn render_place(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines = vec![
        progress(1),
        Line::raw(""),
        Line::from(Span::styled(
            "Where do you want to open your store?",
            theme::accent_bold(),
        )),
        Line::from(Span::styled(
            "Enter coordinates as \"lat,lng\" (default: Seoul City Hall).",
            theme::secondary(),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Location  ", theme::panel_title(true)),
            Span::styled("[ ", theme::accent()),
            Span::styled(app.place_input.as_str(), theme::text()),
            Span::styled("_", theme::accent_bold()),
            Span::styled(" ]", theme::accent()),
        ]),
    ];
    if let Some(place) = app.wizard.place {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" Saved: ", theme::muted()),
            Span::styled(place.to_string(), theme::positive()),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

pub fn render_category(f: &mut Frame, area: Rect, app: &AppState) {
    let chosen = app.wizard.category_label();
    let mut lines = vec![
        progress(2),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Category  ", theme::panel_title(true)),
            match &chosen {
                Some(label) => Span::styled(label.clone(), theme::accent_bold()),
                None => Span::styled(PLACEHOLDER, theme::muted()),
            },
            Span::styled("   (Enter to choose)", theme::muted()),
        ]),
        Line::raw(""),
    ];
    for item in category_options() {
        let style = if app.wizard.category.as_deref() == Some(item.key.as_str()) {
            theme::accent()
        } else {
            theme::secondary()
        };
        lines.push(Line::from(Span::styled(format!("   · {}", item.label), style)));
    }
    f.render_widget(Paragraph::new(lines), area);
}

pub fn render_conditions(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.wizard.conditions;
    let header = Line::from(vec![
        Span::styled("Store conditions  ", theme::accent_bold()),
        Span::styled(
            format!(
                "{} · {}",
                app.wizard
                    .place
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".into()),
                app.wizard.category_label().unwrap_or_else(|| "-".into())
            ),
            theme::muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(header), Rect { height: 1, ..area });

    for (i, rect) in condition_rows(area).into_iter().enumerate() {
        let row = ConditionRow::ALL[i];
        let set = form.is_set(row);
        let title_style = if i == app.conditions_cursor {
            theme::selected()
        } else {
            theme::text()
        };
        let value_style = if set { theme::accent() } else { theme::muted() };
        let kind = if row.is_range() { "range" } else { "choice" };
        let line = Line::from(vec![
            Span::styled(format!(" {:<24}", row.title()), title_style),
            Span::styled(format!(" {:<32}", form.value_text(row)), value_style),
            Span::styled(kind, theme::muted()),
        ]);
        f.render_widget(Paragraph::new(line), rect);
    }

    let footer_y = area.y + 2 + ConditionRow::ALL.len() as u16 + 1;
    if footer_y < area.bottom() {
        let (text, style) = if form.can_submit() {
            ("Ready. Press s to analyze.", theme::positive())
        } else {
            ("Fill in every row to analyze.", theme::warning())
        };
        let mut lines = vec![Line::from(Span::styled(text, style))];
        if let Some(err) = &app.analysis.error {
            lines.push(Line::from(Span::styled(
                format!("Last attempt failed: {err}"),
                theme::negative(),
            )));
        }
        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }),
            Rect::new(area.x, footer_y, area.width, area.bottom() - footer_y),
        );
    }
}

pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let frame = SPINNER[(app.tick / 3) as usize % SPINNER.len()];
    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled(frame, theme::accent_bold()),
            Span::styled("  Analyzing your location...", theme::text()),
        ]),
        Line::raw(""),
        Line::from(Span::styled(app.wizard.conditions.summary(), theme::muted())),
        Line::raw(""),
        Line::from(Span::styled("Esc to go back", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_stop_at_the_bottom() {
        assert_eq!(condition_rows(Rect::new(0, 0, 40, 20)).len(), 6);
        let short = condition_rows(Rect::new(0, 0, 40, 5));
        assert_eq!(short.len(), 3);
        assert_eq!(short[0].y, 2);
    }
}

//! Range and choice bottom sheets.

use ongil_core::numeric::format_amount;
use ongil_core::sheet::{BottomSheet, ChoiceSheet, Field};
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::widgets::DualSlider;
use super::{bottom_sheet_rect, hit};
use crate::app::AppState;
use crate::theme;

const RANGE_HEIGHT: u16 = 9;
const BUTTON_WIDTH: u16 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSheetLayout {
    pub popup: Rect,
    pub low_field: Rect,
    pub high_field: Rect,
    pub track: Rect,
    pub scale: Rect,
    pub reset: Rect,
    pub apply: Rect,
    pub hint: Rect,
}

/// Rows inside the border: fields, gap, track, scale, gap, buttons, hint.
pub fn range_layout(area: Rect) -> RangeSheetLayout {
    let popup = bottom_sheet_rect(area, RANGE_HEIGHT);
    let inner = popup.inner(Margin::new(1, 1));
    let row = |i: u16| {
        if i < inner.height {
            Rect::new(inner.x, inner.y + i, inner.width, 1)
        } else {
            Rect::new(inner.x, inner.bottom(), inner.width, 0)
        }
    };
    let fields = row(0);
    let half = fields.width / 2;
    let buttons = row(5);
    let inset = |r: Rect| Rect::new(r.x + 1, r.y, r.width.saturating_sub(2), r.height);
    RangeSheetLayout {
        popup,
        low_field: Rect::new(fields.x, fields.y, half, fields.height),
        high_field: Rect::new(fields.x + half, fields.y, fields.width - half, fields.height),
        track: inset(row(2)),
        scale: inset(row(3)),
        reset: Rect::new(
            buttons.x + 1,
            buttons.y,
            BUTTON_WIDTH.min(buttons.width),
            buttons.height,
        ),
        apply: Rect::new(
            buttons.right().saturating_sub(BUTTON_WIDTH + 1).max(buttons.x),
            buttons.y,
            BUTTON_WIDTH.min(buttons.width),
            buttons.height,
        ),
        hint: row(6),
    }
}

pub fn render_range(f: &mut Frame, area: Rect, app: &AppState) {
    let sheet = &app.range_sheet;
    let Some(slider) = sheet.slider() else {
        return;
    };
    let layout = range_layout(area);
    let unit = sheet.unit().unwrap_or_default();
    let active = sheet.active_field();

    f.render_widget(Clear, layout.popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" {} ", sheet.title().unwrap_or_default()))
        .title_style(theme::accent_bold());
    f.render_widget(block, layout.popup);

    let field_line = |label: &str, field: Field| {
        let focused = active == Some(field);
        let value = if sheet.has_value(field) {
            Span::styled(sheet.display_text(field), theme::text())
        } else {
            Span::styled("-", theme::muted())
        };
        let mut spans = vec![
            Span::styled(format!(" {label} "), theme::panel_title(focused)),
            Span::styled("[ ", theme::panel_border(focused)),
            value,
        ];
        if focused {
            spans.push(Span::styled("_", theme::accent_bold()));
        }
        spans.push(Span::styled(" ] ", theme::panel_border(focused)));
        spans.push(Span::styled(unit.to_string(), theme::muted()));
        Line::from(spans)
    };

    if sheet.is_single_value() {
        f.render_widget(
            Paragraph::new(field_line("Value", Field::Low)),
            Rect { width: layout.low_field.width + layout.high_field.width, ..layout.low_field },
        );
    } else {
        f.render_widget(Paragraph::new(field_line("Min", Field::Low)), layout.low_field);
        f.render_widget(Paragraph::new(field_line("Max", Field::High)), layout.high_field);
    }

    f.render_widget(
        DualSlider::new(slider).focused(active.map(Into::into)),
        layout.track,
    );

    let domain = slider.domain();
    f.render_widget(
        Paragraph::new(Span::styled(format_amount(domain.min()), theme::muted())),
        layout.scale,
    );
    f.render_widget(
        Paragraph::new(Span::styled(format_amount(domain.max()), theme::muted()))
            .alignment(Alignment::Right),
        layout.scale,
    );

    render_buttons(f, layout.reset, layout.apply, sheet.can_apply());
    f.render_widget(
        Paragraph::new(Span::styled(
            "Tab field  0-9 type  ←/→ step  drag track  r reset  Enter apply  Esc close",
            theme::muted(),
        ))
        .alignment(Alignment::Center),
        layout.hint,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSheetLayout {
    pub popup: Rect,
    pub items: Rect,
    pub reset: Rect,
    pub apply: Rect,
    pub hint: Rect,
}

/// Border, one row per item (clipped to the screen), gap, buttons, hint.
pub fn choice_layout(area: Rect, item_count: usize) -> ChoiceSheetLayout {
    let wanted = u16::try_from(item_count).unwrap_or(u16::MAX).saturating_add(5);
    let popup = bottom_sheet_rect(area, wanted);
    let inner = popup.inner(Margin::new(1, 1));
    let items_h = inner.height.saturating_sub(3);
    let items = Rect::new(inner.x, inner.y, inner.width, items_h);
    let buttons_y = inner.y + items_h + 1;
    let line = |y: u16| {
        if y < inner.bottom() {
            Rect::new(inner.x, y, inner.width, 1)
        } else {
            Rect::new(inner.x, inner.bottom(), inner.width, 0)
        }
    };
    let buttons = line(buttons_y);
    ChoiceSheetLayout {
        popup,
        items,
        reset: Rect::new(
            buttons.x + 1,
            buttons.y,
            BUTTON_WIDTH.min(buttons.width),
            buttons.height,
        ),
        apply: Rect::new(
            buttons.right().saturating_sub(BUTTON_WIDTH + 1).max(buttons.x),
            buttons.y,
            BUTTON_WIDTH.min(buttons.width),
            buttons.height,
        ),
        hint: line(buttons_y + 1),
    }
}

/// First visible item so the cursor stays on screen.
pub fn choice_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    cursor.saturating_sub(visible - 1)
}

/// Item under a click, if any.
pub fn choice_index_at(layout: &ChoiceSheetLayout, sheet: &ChoiceSheet, column: u16, row: u16) -> Option<usize> {
    if !hit(layout.items, column, row) {
        return None;
    }
    let offset = choice_offset(sheet.cursor(), usize::from(layout.items.height));
    let idx = offset + usize::from(row - layout.items.y);
    (idx < sheet.items().len()).then_some(idx)
}

pub fn render_choice(f: &mut Frame, area: Rect, app: &AppState) {
    let sheet = &app.choice_sheet;
    if !sheet.is_open() {
        return;
    }
    let layout = choice_layout(area, sheet.items().len());

    f.render_widget(Clear, layout.popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" {} ", sheet.title().unwrap_or_default()))
        .title_style(theme::accent_bold());
    f.render_widget(block, layout.popup);

    let visible = usize::from(layout.items.height);
    let offset = choice_offset(sheet.cursor(), visible);
    let lines: Vec<Line> = sheet
        .items()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, item)| {
            let chosen = sheet.selected() == Some(item.key.as_str());
            let marker = if chosen { "(•) " } else { "( ) " };
            let style = if i == sheet.cursor() {
                theme::selected()
            } else if chosen {
                theme::accent()
            } else {
                theme::text()
            };
            Line::from(vec![
                Span::styled(format!(" {marker}{}", item.label), style),
                Span::styled(format!("  {}", item.key), theme::muted()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), layout.items);

    render_buttons(f, layout.reset, layout.apply, sheet.can_apply());
    f.render_widget(
        Paragraph::new(Span::styled(
            "↑/↓ move  Space select  Enter apply  r reset  Esc close",
            theme::muted(),
        ))
        .alignment(Alignment::Center),
        layout.hint,
    );
}

fn render_buttons(f: &mut Frame, reset: Rect, apply: Rect, can_apply: bool) {
    f.render_widget(
        Paragraph::new(Span::styled(" Reset ", theme::secondary())).alignment(Alignment::Center),
        reset,
    );
    f.render_widget(
        Paragraph::new(Span::styled(" Apply ", theme::button(can_apply))).alignment(Alignment::Center),
        apply,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ongil_core::sheet::{ChoiceItem, ChoiceRequest};

    #[test]
    fn range_layout_rows_are_stacked_inside_the_border() {
        let layout = range_layout(Rect::new(0, 0, 80, 30));
        let p = layout.popup;
        assert_eq!(p.height, RANGE_HEIGHT);
        assert_eq!(layout.low_field.y, p.y + 1);
        assert_eq!(layout.track.y, p.y + 3);
        assert_eq!(layout.reset.y, p.y + 6);
        assert!(layout.track.x > p.x && layout.track.right() < p.right());
        assert!(layout.apply.x > layout.reset.right());
    }

    #[test]
    fn choice_clicks_map_to_items() {
        let mut sheet = ChoiceSheet::new();
        sheet.open(ChoiceRequest::new(
            "Floor",
            vec![ChoiceItem::new("1층", "1st"), ChoiceItem::new("2층", "2nd")],
        ));
        let layout = choice_layout(Rect::new(0, 0, 80, 30), sheet.items().len());
        assert_eq!(layout.items.height, 2);
        let x = layout.items.x + 2;
        assert_eq!(choice_index_at(&layout, &sheet, x, layout.items.y + 1), Some(1));
        assert_eq!(choice_index_at(&layout, &sheet, x, layout.items.y + 2), None);
    }

    #[test]
    fn offset_keeps_cursor_visible() {
        assert_eq!(choice_offset(2, 5), 0);
        assert_eq!(choice_offset(7, 5), 3);
        assert_eq!(choice_offset(3, 0), 0);
    }
}

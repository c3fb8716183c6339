//! Centered overlays: help, exit confirmation, search, compose, delete, error history.

use ongil_services::community::{shorten, Board, DEFAULT_NICK, PREVIEW_CHARS};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, ComposeField};
use crate::theme;
use crate::ui::centered_rect;

fn framed(title: String, border: ratatui::style::Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
        .title_style(border.add_modifier(Modifier::BOLD))
}

/// First-run help overlay, also opened with `?`.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::accent()),
            Span::styled(what, theme::secondary()),
        ])
    };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Find out how well a location fits your store.", theme::accent_bold())),
        Line::from(""),
        key("Enter", "confirm / open the highlighted row"),
        key("Esc", "back (same as the top-bar < Back)"),
        key("q", "quit (same as the top-bar [x])"),
        key("Tab", "switch between the wizard and the community"),
        key("e", "error history"),
        Line::from(""),
        Line::from(Span::styled("Range sheets", theme::accent_bold())),
        key("0-9", "type into the focused field"),
        key("Tab", "switch min / max"),
        key("←/→", "step the focused handle (Shift: x10)"),
        key("mouse", "drag a handle, click Apply or Reset"),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text)
        .block(framed(" Welcome to ongil ".into(), theme::accent()))
        .wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

pub fn render_exit_confirm(f: &mut Frame, area: Rect) {
    let popup = centered_rect(40, 25, area);
    f.render_widget(Clear, popup);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Leave ongil?", theme::text())),
        Line::from(Span::styled("Your answers are kept for next time.", theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y ", theme::selected()),
            Span::styled(" quit   ", theme::secondary()),
            Span::styled(" n ", theme::button(true)),
            Span::styled(" stay", theme::secondary()),
        ]),
    ];
    f.render_widget(
        Paragraph::new(text).block(framed(" Exit ".into(), theme::warning())),
        popup,
    );
}

pub fn render_confirm_delete(f: &mut Frame, area: Rect, app: &AppState, id: u64) {
    let popup = centered_rect(50, 25, area);
    f.render_widget(Clear, popup);
    let title = app
        .store
        .post(id)
        .map(|p| shorten(&p.title, 36))
        .unwrap_or_else(|| format!("#{id}"));
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("Delete \"{title}\" and its comments?"), theme::text())),
        Line::from(""),
        Line::from(Span::styled(" y delete   n keep", theme::secondary())),
    ];
    f.render_widget(
        Paragraph::new(text)
            .block(framed(" Delete post ".into(), theme::negative()))
            .wrap(Wrap { trim: true }),
        popup,
    );
}

pub fn render_search(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);
    let search = &app.search;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", search.field.label()), theme::neutral()),
            Span::styled("> ", theme::accent()),
            Span::styled(search.input.as_str(), theme::text()),
            Span::styled("_", theme::accent_bold()),
        ]),
        Line::from(""),
    ];

    match &search.results {
        Some(ids) => {
            lines.push(Line::from(Span::styled(
                format!("{} result(s)", ids.len()),
                theme::accent_bold(),
            )));
            if ids.is_empty() {
                lines.push(Line::from(Span::styled("  No posts found.", theme::muted())));
            }
            for (i, post) in ids.iter().filter_map(|&id| app.store.post(id)).enumerate() {
                let style = if i == search.cursor { theme::selected() } else { theme::text() };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {} ", shorten(&post.title, 48)), style),
                    Span::styled(format!(" {}", post.nick), theme::muted()),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", shorten(&post.content, PREVIEW_CHARS)),
                    theme::secondary(),
                )));
            }
        }
        None => {
            let history = app.store.history_matching(&search.input);
            let candidates = app.search_candidates();
            let label = if search.input.trim().is_empty() {
                "Recent searches"
            } else {
                "Suggestions"
            };
            lines.push(Line::from(Span::styled(label, theme::accent_bold())));
            if candidates.is_empty() {
                lines.push(Line::from(Span::styled("  Nothing yet.", theme::muted())));
            }
            for (i, text) in candidates.iter().enumerate() {
                let is_history = history.contains(&text.as_str());
                let style = if search.picking && i == search.cursor {
                    theme::selected()
                } else if is_history {
                    theme::secondary()
                } else {
                    theme::text()
                };
                let icon = if is_history { "↺ " } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {icon}"), theme::muted()),
                    Span::styled(shorten(text, PREVIEW_CHARS), style),
                ]));
            }
        }
    }

    let block = framed(
        " Search [Tab]field [↑/↓]pick [Enter]go [Del]forget [Ctrl-L]clear [Esc]close ".into(),
        theme::accent(),
    );
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_compose(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(70, 50, area);
    f.render_widget(Clear, popup);
    let c = &app.compose;

    let field = |label: &'static str, which: ComposeField, value: String| {
        let focused = c.focus == which;
        let mut spans = vec![
            Span::styled(format!(" {label:<8}"), theme::panel_title(focused)),
            Span::styled(value, theme::text()),
        ];
        if focused && which != ComposeField::Board {
            spans.push(Span::styled("_", theme::accent_bold()));
        }
        Line::from(spans)
    };
    let board = match c.board {
        Board::Free => "< Free board >",
        Board::Partner => "< Partner board >",
    };
    let nick = if c.nick.is_empty() && c.focus != ComposeField::Nick {
        DEFAULT_NICK.to_string()
    } else {
        c.nick.clone()
    };
    let text = vec![
        Line::from(""),
        field("Board", ComposeField::Board, board.to_string()),
        field("Title", ComposeField::Title, c.title.clone()),
        field("Body", ComposeField::Content, c.content.clone()),
        field("Tags", ComposeField::Tags, c.tags.clone()),
        field("Nick", ComposeField::Nick, nick),
        Line::from(""),
        Line::from(Span::styled(
            " Tab next field  ←/→ board  tags are comma separated  Enter publish  Esc cancel",
            theme::muted(),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .block(framed(" New post ".into(), theme::accent()))
            .wrap(Wrap { trim: false }),
        popup,
    );
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let lines: Vec<Line> = if app.error_history.is_empty() {
        vec![Line::from(Span::styled("  No errors.", theme::muted()))]
    } else {
        app.error_history
            .iter()
            .rev()
            .map(|e| Line::from(Span::styled(format!("  {e}"), theme::negative())))
            .collect()
    };
    let block = framed(
        format!(" Error History ({}) [Esc]close ", app.error_history.len()),
        theme::negative(),
    );
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

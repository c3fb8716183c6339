//! Community board list and post detail.

use chrono::Utc;
use ongil_services::community::{relative_time, shorten, Board, BoardTab, Post};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

/// Rows above the post list: tabs, filter, hot post, gap.
const LIST_TOP: u16 = 4;
const TITLE_CHARS: usize = 40;

pub fn list_area(inner: Rect) -> Rect {
    let top = LIST_TOP.min(inner.height);
    Rect::new(inner.x, inner.y + top, inner.width, inner.height - top)
}

/// First visible post so the cursor stays on screen.
pub fn list_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    cursor.saturating_sub(visible - 1)
}

/// Index into the visible posts under a click.
pub fn post_index_at(inner: Rect, cursor: usize, count: usize, column: u16, row: u16) -> Option<usize> {
    let list = list_area(inner);
    if !super::hit(list, column, row) {
        return None;
    }
    let idx = list_offset(cursor, usize::from(list.height)) + usize::from(row - list.y);
    (idx < count).then_some(idx)
}

fn post_row(post: &Post, comments: usize, selected: bool) -> Line<'static> {
    let palette = theme::palette();
    let now = Utc::now();
    let title_style = if selected { theme::selected() } else { theme::text() };
    Line::from(vec![
        Span::styled(
            format!(" [{}] ", short_board(post)),
            theme::text().fg(palette.board_color(post.board)),
        ),
        Span::styled(format!("{:<width$}", shorten(&post.title, TITLE_CHARS), width = TITLE_CHARS + 1), title_style),
        Span::styled(
            format!("  {} · {}", post.nick, relative_time(post.created_at, now)),
            theme::muted(),
        ),
        Span::styled(format!("  💬{comments} 👁{}", post.views), theme::secondary()),
    ])
}

fn short_board(post: &Post) -> &'static str {
    match post.board {
        Board::Free => "Free",
        Board::Partner => "Partner",
    }
}

pub fn render_board(f: &mut Frame, area: Rect, app: &AppState) {
    let tabs: Vec<Span> = BoardTab::ALL
        .iter()
        .flat_map(|&tab| {
            let style = if tab == app.board.tab {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            [Span::styled(format!(" {} ", tab.label()), style), Span::raw("|")]
        })
        .collect();
    let filter = Line::from(vec![
        Span::styled(" Filter: ", theme::panel_title(app.board.filter_editing)),
        Span::styled(app.board.filter.as_str(), theme::text()),
        Span::styled(
            if app.board.filter_editing { "_" } else { "" },
            theme::accent_bold(),
        ),
    ]);
    let hot = match app.store.hot_post(app.board.tab) {
        Some(post) => Line::from(vec![
            Span::styled(" HOT ", theme::warning()),
            Span::styled(shorten(&post.title, TITLE_CHARS), theme::text()),
            Span::styled(
                format!("  ({} comments)", app.store.comment_count(post.id)),
                theme::muted(),
            ),
        ]),
        None => Line::from(Span::styled(" No posts yet", theme::muted())),
    };
    f.render_widget(Paragraph::new(vec![Line::from(tabs), filter, hot]), area);

    let list = list_area(area);
    let posts = app.visible_posts();
    if posts.is_empty() {
        let msg = if app.board.filter.trim().is_empty() {
            " Nothing here yet. Press w to write the first post."
        } else {
            " No posts match the filter."
        };
        f.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), list);
        return;
    }
    let visible = usize::from(list.height);
    let offset = list_offset(app.board.cursor, visible);
    let lines: Vec<Line> = posts
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, post)| post_row(post, app.store.comment_count(post.id), i == app.board.cursor))
        .collect();
    f.render_widget(Paragraph::new(lines), list);
}

pub fn render_post(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(post) = app.detail.post_id.and_then(|id| app.store.post(id)) else {
        f.render_widget(
            Paragraph::new(Span::styled("This post no longer exists.", theme::muted())),
            area,
        );
        return;
    };
    let palette = theme::palette();
    let now = Utc::now();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", post.board.label()),
                theme::text().fg(palette.board_color(post.board)),
            ),
            Span::styled(post.title.as_str(), theme::accent_bold()),
        ]),
        Line::from(Span::styled(
            format!(
                "{} · {} · {} views",
                post.nick,
                relative_time(post.created_at, now),
                post.views
            ),
            theme::muted(),
        )),
    ];
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{t}")).collect();
        lines.push(Line::from(Span::styled(tags.join(" "), theme::neutral())));
    }
    lines.push(Line::raw(""));
    lines.extend(post.content.lines().map(|l| Line::from(Span::styled(l, theme::text()))));
    lines.push(Line::raw(""));

    let comments = app.store.comments(post.id);
    lines.push(Line::from(Span::styled(
        format!("Comments ({})", comments.len()),
        theme::accent_bold(),
    )));
    for c in comments {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", c.nick), theme::secondary()),
            Span::styled(relative_time(c.created_at, now), theme::muted()),
        ]));
        lines.push(Line::from(Span::styled(format!("    {}", c.content), theme::text())));
    }

    let input_h = 1u16.min(area.height);
    let body = Rect::new(area.x, area.y, area.width, area.height - input_h);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.detail.scroll, 0)),
        body,
    );

    let input = if app.detail.editing {
        Line::from(vec![
            Span::styled(" Comment: ", theme::accent_bold()),
            Span::styled(app.detail.comment.as_str(), theme::text()),
            Span::styled("_", theme::accent_bold()),
        ])
    } else {
        Line::from(Span::styled(
            " c comment  d delete post  ↑/↓ scroll  Esc back",
            theme::muted(),
        ))
    };
    f.render_widget(
        Paragraph::new(input),
        Rect::new(area.x, body.bottom(), area.width, input_h),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_below_header_pick_posts() {
        let inner = Rect::new(1, 2, 60, 12);
        assert_eq!(post_index_at(inner, 0, 3, 5, 2 + LIST_TOP), Some(0));
        assert_eq!(post_index_at(inner, 0, 3, 5, 2 + LIST_TOP + 2), Some(2));
        assert_eq!(post_index_at(inner, 0, 3, 5, 2 + LIST_TOP + 3), None);
        assert_eq!(post_index_at(inner, 0, 3, 5, 2), None);
    }

    #[test]
    fn scrolled_list_offsets_clicks() {
        let inner = Rect::new(0, 0, 60, LIST_TOP + 2);
        assert_eq!(post_index_at(inner, 5, 10, 0, LIST_TOP), Some(4));
    }
}

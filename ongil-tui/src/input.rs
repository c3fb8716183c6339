//! Input dispatch: overlays → text entry → global keys → screen handlers.
//!
//! Mouse hit-testing uses the same layout functions as `ui`, given the full
//! terminal area.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ongil_core::sheet::{BottomSheet, Field};
use ratatui::layout::{Margin, Rect};

use crate::app::{AppState, ComposeField, Overlay, Screen, MOUSE};
use crate::shell::ShellEvent;
use crate::ui::{self, community, sheets, top_bar, widgets::slider, wizard};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.confirm_exit();
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.help_seen = true;
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('e') | KeyCode::Char('q')) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ExitConfirm => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => app.confirm_exit(),
                KeyCode::Char('n') | KeyCode::Esc => app.overlay = Overlay::None,
                _ => {}
            }
            return;
        }
        Overlay::ConfirmDelete(_) => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => app.overlay = Overlay::None,
                _ => {}
            }
            return;
        }
        Overlay::RangeSheet => {
            handle_range_sheet(app, key);
            return;
        }
        Overlay::ChoiceSheet => {
            handle_choice_sheet(app, key);
            return;
        }
        Overlay::Search => {
            handle_search(app, key);
            return;
        }
        Overlay::Compose => {
            handle_compose(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Screens with a text field take printable keys before global keys.
    if handle_text_entry(app, key) {
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.emit_shell(ShellEvent::Close);
            return;
        }
        KeyCode::Esc => {
            app.emit_shell(ShellEvent::Back);
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_section();
            return;
        }
        _ => {}
    }

    // 4. Screen-specific keys.
    match app.screen {
        Screen::Place | Screen::Loading => {}
        Screen::Category => match key.code {
            KeyCode::Enter => app.open_category_sheet(),
            KeyCode::Char('n') | KeyCode::Right => app.advance_wizard(),
            _ => {}
        },
        Screen::Conditions => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_conditions_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_conditions_cursor(1),
            KeyCode::Enter => app.open_row_sheet(app.selected_row()),
            KeyCode::Char('s') => app.submit_analysis(),
            _ => {}
        },
        Screen::Report => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.analysis.scroll = app.analysis.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.analysis.scroll = app.analysis.scroll.saturating_add(1);
            }
            KeyCode::PageUp => app.analysis.scroll = app.analysis.scroll.saturating_sub(10),
            KeyCode::PageDown => app.analysis.scroll = app.analysis.scroll.saturating_add(10),
            KeyCode::Char('n') => app.restart_wizard(),
            _ => {}
        },
        Screen::Community => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_board_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_board_cursor(1),
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                app.cycle_tab();
                if matches!(key.code, KeyCode::Left | KeyCode::Char('h')) {
                    app.cycle_tab();
                }
            }
            KeyCode::Enter => app.open_selected_post(),
            KeyCode::Char('/') => app.open_search(),
            KeyCode::Char('f') => app.board.filter_editing = true,
            KeyCode::Char('w') => app.open_compose(),
            KeyCode::Char('d') => {
                if let Some(id) = app.selected_post_id() {
                    app.request_delete(id);
                }
            }
            _ => {}
        },
        Screen::PostDetail => match key.code {
            KeyCode::Char('c') | KeyCode::Char('i') => app.detail.editing = true,
            KeyCode::Char('d') => {
                if let Some(id) = app.detail.post_id {
                    app.request_delete(id);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => app.detail.scroll = app.detail.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => app.detail.scroll = app.detail.scroll.saturating_add(1),
            _ => {}
        },
    }
}

/// Returns true when the key was consumed by a text field.
fn handle_text_entry(app: &mut AppState, key: KeyEvent) -> bool {
    match app.screen {
        Screen::Place => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | ' ') => {
                app.place_input.push(c);
                true
            }
            KeyCode::Backspace => {
                app.place_input.pop();
                true
            }
            KeyCode::Enter => {
                app.confirm_place();
                true
            }
            _ => false,
        },
        Screen::Community if app.board.filter_editing => {
            match key.code {
                KeyCode::Char(c) => app.board.filter.push(c),
                KeyCode::Backspace => {
                    app.board.filter.pop();
                }
                KeyCode::Enter | KeyCode::Esc => app.board.filter_editing = false,
                _ => return false,
            }
            app.board.cursor = 0;
            true
        }
        Screen::PostDetail if app.detail.editing => {
            match key.code {
                KeyCode::Char(c) => app.detail.comment.push(c),
                KeyCode::Backspace => {
                    app.detail.comment.pop();
                }
                KeyCode::Enter => app.submit_comment(),
                KeyCode::Esc => app.detail.editing = false,
                _ => return false,
            }
            true
        }
        _ => false,
    }
}

fn handle_range_sheet(app: &mut AppState, key: KeyEvent) {
    let sheet = &mut app.range_sheet;
    let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc => app.close_sheets(),
        KeyCode::Enter => app.apply_sheet(),
        KeyCode::Tab | KeyCode::BackTab => sheet.cycle_focus(),
        KeyCode::Char(c) if c.is_ascii_digit() => sheet.push_digit(c),
        KeyCode::Backspace => sheet.backspace(),
        KeyCode::Delete => {
            if let Some(field) = sheet.active_field() {
                sheet.set_text(field, "");
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            sheet.nudge(if coarse { -10 } else { -1 });
        }
        KeyCode::Right | KeyCode::Char('l') => {
            sheet.nudge(if coarse { 10 } else { 1 });
        }
        KeyCode::Up => sheet.focus(Field::Low),
        KeyCode::Down => sheet.focus(Field::High),
        KeyCode::Char('r') => sheet.reset(),
        _ => {}
    }
}

fn handle_choice_sheet(app: &mut AppState, key: KeyEvent) {
    let sheet = &mut app.choice_sheet;
    match key.code {
        KeyCode::Esc => app.close_sheets(),
        KeyCode::Up | KeyCode::Char('k') => sheet.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => sheet.move_cursor(1),
        KeyCode::Char(' ') => sheet.select_cursor(),
        KeyCode::Enter => {
            sheet.select_cursor();
            app.apply_sheet();
        }
        KeyCode::Char('r') => sheet.reset(),
        _ => {}
    }
}

fn handle_search(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Tab => {
            app.search.field = app.search.field.next();
            if app.search.results.is_some() {
                app.submit_search();
            }
        }
        KeyCode::Up => app.move_search_cursor(-1),
        KeyCode::Down => app.move_search_cursor(1),
        KeyCode::Enter => app.search_enter(),
        KeyCode::Delete => app.remove_highlighted_history(),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search_history();
        }
        KeyCode::Backspace => app.edit_search(|s| {
            s.pop();
        }),
        KeyCode::Char(c) => app.edit_search(|s| s.push(c)),
        _ => {}
    }
}

fn handle_compose(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Tab => app.compose.focus = app.compose.focus.next(),
        KeyCode::Enter => app.submit_compose(),
        KeyCode::Left | KeyCode::Right if app.compose.focus == ComposeField::Board => {
            app.compose.toggle_board();
        }
        KeyCode::Backspace => {
            if let Some(text) = app.compose.focused_text() {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = app.compose.focused_text() {
                text.push(c);
            }
        }
        _ => {}
    }
}

/// `area` is the whole terminal.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent, area: Rect) {
    let (col, row) = (mouse.column, mouse.row);
    match app.overlay {
        Overlay::RangeSheet => range_sheet_mouse(app, mouse, area),
        Overlay::ChoiceSheet => {
            if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                return;
            }
            let layout = sheets::choice_layout(area, app.choice_sheet.items().len());
            if let Some(idx) = sheets::choice_index_at(&layout, &app.choice_sheet, col, row) {
                let delta = idx as isize - app.choice_sheet.cursor() as isize;
                app.choice_sheet.move_cursor(delta);
                app.choice_sheet.select_cursor();
            } else if ui::hit(layout.apply, col, row) {
                app.apply_sheet();
            } else if ui::hit(layout.reset, col, row) {
                app.choice_sheet.reset();
            } else if !ui::hit(layout.popup, col, row) {
                app.close_sheets();
            }
        }
        Overlay::None => screen_mouse(app, mouse, area),
        _ => {}
    }
}

fn range_sheet_mouse(app: &mut AppState, mouse: MouseEvent, area: Rect) {
    let layout = sheets::range_layout(area);
    let (col, row) = (mouse.column, mouse.row);
    let x = f64::from(col);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.range_sheet.set_track(slider::track_for(layout.track));
            if ui::hit(layout.track, col, row) {
                app.range_sheet.pointer_down(MOUSE, x);
            } else if ui::hit(layout.apply, col, row) {
                app.apply_sheet();
            } else if ui::hit(layout.reset, col, row) {
                app.range_sheet.reset();
            } else if ui::hit(layout.low_field, col, row) {
                app.range_sheet.focus(Field::Low);
            } else if ui::hit(layout.high_field, col, row) {
                app.range_sheet.focus(Field::High);
            } else if !ui::hit(layout.popup, col, row) {
                app.close_sheets();
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.range_sheet.pointer_move(MOUSE, x),
        MouseEventKind::Up(MouseButton::Left) => {
            app.range_sheet.pointer_up(MOUSE);
        }
        _ => {}
    }
}

fn screen_mouse(app: &mut AppState, mouse: MouseEvent, area: Rect) {
    let frame = ui::frame_layout(area);
    let inner = frame.main.inner(Margin::new(1, 1));
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(event) = top_bar::event_at(frame.top, col, row) {
                app.emit_shell(event);
                return;
            }
            match app.screen {
                Screen::Category => {
                    if ui::hit(wizard::category_button(inner), col, row) {
                        app.open_category_sheet();
                    }
                }
                Screen::Conditions => {
                    let hit_row = wizard::condition_rows(inner)
                        .iter()
                        .position(|r| ui::hit(*r, col, row));
                    if let Some(i) = hit_row {
                        app.conditions_cursor = i;
                        app.open_row_sheet(app.selected_row());
                    }
                }
                Screen::Community => {
                    let count = app.visible_posts().len();
                    if let Some(i) = community::post_index_at(inner, app.board.cursor, count, col, row) {
                        if i == app.board.cursor {
                            app.open_selected_post();
                        } else {
                            app.board.cursor = i;
                        }
                    }
                }
                _ => {}
            }
        }
        MouseEventKind::ScrollUp => scroll(app, -1),
        MouseEventKind::ScrollDown => scroll(app, 1),
        _ => {}
    }
}

fn scroll(app: &mut AppState, delta: i32) {
    match app.screen {
        Screen::Conditions => app.move_conditions_cursor(delta as isize),
        Screen::Community => app.move_board_cursor(delta as isize),
        Screen::Report => {
            app.analysis.scroll = app.analysis.scroll.saturating_add_signed(delta as i16);
        }
        Screen::PostDetail => {
            app.detail.scroll = app.detail.scroll.saturating_add_signed(delta as i16);
        }
        _ => {}
    }
}

/// The terminal lost focus mid-drag: drop the gesture.
pub fn handle_focus_lost(app: &mut AppState) {
    app.cancel_gesture();
}

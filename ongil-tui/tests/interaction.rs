//! Drive `AppState` through real key and mouse events on a fixed 100x30 terminal.
//!
//! Geometry for that size:
//! - top bar on row 0, `< Back` at columns 0..8, `[x]` at 95..100
//! - condition rows start at row 4 (average price) and end at row 9 (floor)
//! - range sheet track on row 23, columns 20..80; Apply button at 71..80 on row 26

use std::sync::mpsc::{self, Receiver, Sender};

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ongil_core::conditions::ConditionRow;
use ongil_core::range::Range;
use ongil_core::sheet::{BottomSheet, Field};
use ongil_services::community::CommunityStore;
use ongil_tui::app::{AppState, Overlay, Screen};
use ongil_tui::input;
use ongil_tui::worker::{WorkerCommand, WorkerResponse};
use ratatui::layout::Rect;

const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 30,
};
const TRACK_ROW: u16 = 23;
const TRACK_LEFT: u16 = 20;
const TRACK_RIGHT: u16 = 79;

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn app() -> (AppState, Receiver<WorkerCommand>, Sender<WorkerResponse>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let store = CommunityStore::in_memory();
    (AppState::new(cmd_tx, resp_rx, store), cmd_rx, resp_tx)
}

fn press(app: &mut AppState, code: KeyCode) {
    input::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn mouse(app: &mut AppState, kind: MouseEventKind, column: u16, row: u16) {
    let event = MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };
    input::handle_mouse(app, event, AREA);
}

fn click(app: &mut AppState, column: u16, row: u16) {
    mouse(app, MouseEventKind::Down(MouseButton::Left), column, row);
    mouse(app, MouseEventKind::Up(MouseButton::Left), column, row);
}

/// Place (default coordinates) → first category → conditions screen.
fn reach_conditions(app: &mut AppState) {
    press(app, KeyCode::Enter);
    assert_eq!(app.screen, Screen::Category);
    press(app, KeyCode::Enter);
    assert_eq!(app.overlay, Overlay::ChoiceSheet);
    press(app, KeyCode::Enter);
    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(app.wizard.category.as_deref(), Some("카페/디저트"));
    press(app, KeyCode::Char('n'));
    assert_eq!(app.screen, Screen::Conditions);
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[test]
fn keyboard_only_wizard_reaches_report() {
    let (mut app, cmd_rx, resp_tx) = app();
    reach_conditions(&mut app);

    // Average price: type both ends.
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.overlay, Overlay::RangeSheet);
    type_str(&mut app, "8000");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "12000");
    assert_eq!(app.range_sheet.display_text(Field::High), "12,000");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(
        app.wizard.conditions.value_text(ConditionRow::AveragePrice),
        "8,000~12,000 won"
    );

    // Choice rows take the first option; rent is typed.
    for row in 1..ConditionRow::ALL.len() {
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_row(), ConditionRow::ALL[row]);
        press(&mut app, KeyCode::Enter);
        if ConditionRow::ALL[row].is_range() {
            type_str(&mut app, "500000");
            press(&mut app, KeyCode::Tab);
            type_str(&mut app, "900000");
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Overlay::None, "row {row} did not apply");
    }
    assert!(app.wizard.conditions.can_submit());

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.screen, Screen::Loading);
    let Ok(WorkerCommand::Analyze { id, request }) = cmd_rx.try_recv() else {
        panic!("no analysis request was sent");
    };
    assert_eq!(request.category, "카페/디저트");
    assert_eq!(request.budget.min, 50);
    assert_eq!(request.budget.max, 90);

    resp_tx
        .send(WorkerResponse::AnalysisDone {
            id,
            report: Box::default(),
            elapsed_ms: 12,
        })
        .unwrap();
    while let Ok(resp) = app.worker_rx.try_recv() {
        app.handle_worker_response(resp);
    }
    assert_eq!(app.screen, Screen::Report);
    assert!(app.analysis.report.is_some());
}

#[test]
fn dragging_the_rent_track_updates_the_fields_once_per_frame() {
    let (mut app, _rx, _tx) = app();
    reach_conditions(&mut app);

    // Rent is the fourth condition row.
    click(&mut app, 10, 7);
    assert_eq!(app.overlay, Overlay::RangeSheet);
    assert_eq!(app.range_sheet.title(), Some("Expected monthly rent"));

    // Grab the low handle at the left end and drag it to the middle.
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), TRACK_LEFT, TRACK_ROW);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 30, TRACK_ROW);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 49, TRACK_ROW);
    // Nothing reaches the fields until the frame boundary.
    assert_eq!(app.range_sheet.text(Field::Low), "");
    app.on_frame();
    assert_eq!(app.range_sheet.text(Field::Low), "740000");
    assert_eq!(app.range_sheet.text(Field::High), "1500000");
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 49, TRACK_ROW);

    // A click at the right end picks the high handle and pulls it in.
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), TRACK_RIGHT - 10, TRACK_ROW);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), TRACK_RIGHT - 10, TRACK_ROW);
    let slider = app.range_sheet.slider().unwrap();
    assert_eq!(slider.low(), 740_000.0);
    assert!(slider.high() < 1_500_000.0);
    let high = slider.high();

    assert!(app.range_sheet.can_apply());
    click(&mut app, 75, 26);
    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(
        app.wizard.conditions.rent,
        Range::between(740_000.0, high).unwrap()
    );
}

#[test]
fn focus_loss_mid_drag_keeps_the_last_position() {
    let (mut app, _rx, _tx) = app();
    reach_conditions(&mut app);
    click(&mut app, 10, 7);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), TRACK_LEFT, TRACK_ROW);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 49, TRACK_ROW);
    input::handle_focus_lost(&mut app);
    assert_eq!(app.range_sheet.text(Field::Low), "740000");

    // The gesture is over: further drags do nothing.
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 30, TRACK_ROW);
    app.on_frame();
    assert_eq!(app.range_sheet.text(Field::Low), "740000");
}

#[test]
fn clicking_outside_a_sheet_discards_the_draft() {
    let (mut app, _rx, _tx) = app();
    reach_conditions(&mut app);
    click(&mut app, 10, 7);
    type_str(&mut app, "300000");

    click(&mut app, 2, 2);
    assert_eq!(app.overlay, Overlay::None);
    assert!(!app.range_sheet.is_open());
    assert!(!app.wizard.conditions.is_set(ConditionRow::Rent));
}

#[test]
fn top_bar_buttons_map_to_back_and_close() {
    let (mut app, _rx, _tx) = app();
    reach_conditions(&mut app);

    click(&mut app, 2, 0);
    assert_eq!(app.screen, Screen::Category);

    click(&mut app, 97, 0);
    assert_eq!(app.overlay, Overlay::ExitConfirm);
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.overlay, Overlay::None);
    assert!(app.running);

    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Char('y'));
    assert!(!app.running);
}

#[test]
fn community_compose_and_comment_round_trip() {
    let (mut app, _rx, _tx) = app();
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.screen, Screen::Community);

    press(&mut app, KeyCode::Char('w'));
    assert_eq!(app.overlay, Overlay::Compose);
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "Rent near the station");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "Is 900k fair for 15 pyeong?");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(app.visible_posts().len(), 1);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.screen, Screen::PostDetail);
    press(&mut app, KeyCode::Char('c'));
    type_str(&mut app, "Sounds about right");
    press(&mut app, KeyCode::Enter);
    let id = app.detail.post_id.unwrap();
    assert_eq!(app.store.comment_count(id), 1);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.screen, Screen::Community);
}

//! Range sheet scenarios as a host drives them: open, edit, drag, apply or close.

use ongil_core::numeric::{snap, to_number_or_null};
use ongil_core::sheet::Field;
use ongil_core::{
    BottomSheet, Domain, DualRangeSlider, PointerId, Range, RangePair, RangeSheet, SheetRequest,
    Track,
};

fn price_domain() -> Domain {
    Domain::new(0.0, 50_000.0, 100.0).unwrap()
}

fn request(initial: Range) -> SheetRequest {
    SheetRequest::new("Average menu price", "won", price_domain()).initial(initial)
}

#[test]
fn reopening_discards_an_unapplied_draft() {
    let initial = Range::between(1000.0, 2000.0).unwrap();
    let mut sheet = RangeSheet::new();
    sheet.open(request(initial));
    sheet.set_text(Field::Low, "1500");
    sheet.set_text(Field::High, "1800");
    assert_eq!(sheet.draft_values(), (Some(1500.0), Some(1800.0)));
    assert!(sheet.close());

    sheet.open(request(initial));
    assert_eq!(sheet.draft_values(), (Some(1000.0), Some(2000.0)));
    let slider = sheet.slider().unwrap();
    assert_eq!((slider.low(), slider.high()), (1000.0, 2000.0));
}

#[test]
fn apply_is_gated_on_a_valid_pair() {
    let mut sheet = RangeSheet::new();
    sheet.open(request(Range::unset()));

    sheet.set_text(Field::High, "2000");
    assert!(!sheet.can_apply(), "low unset");

    sheet.set_text(Field::Low, "1000");
    sheet.set_text(Field::High, "");
    assert!(!sheet.can_apply(), "high unset");

    sheet.set_text(Field::Low, "2000");
    sheet.set_text(Field::High, "1000");
    assert!(!sheet.can_apply(), "inverted");
    assert_eq!(sheet.apply(), None);

    sheet.set_text(Field::Low, "1000");
    sheet.set_text(Field::High, "2000");
    assert!(sheet.can_apply());
    assert_eq!(sheet.apply(), Some(RangePair::new(1000.0, 2000.0).unwrap()));
}

#[test]
fn snapping_rounds_to_nearest_step() {
    assert_eq!(snap(1030.0, 100.0, 0.0, 50_000.0), 1000.0);
    assert_eq!(snap(1070.0, 100.0, 0.0, 50_000.0), 1100.0);
}

#[test]
fn out_of_range_text_is_clamped_then_snapped() {
    assert_eq!(to_number_or_null("999999", 0.0, 50_000.0, 100.0), Some(50_000.0));
    assert_eq!(to_number_or_null("", 0.0, 50_000.0, 100.0), None);
    assert_eq!(to_number_or_null("abc", 0.0, 50_000.0, 100.0), None);

    let mut sheet = RangeSheet::new();
    sheet.open(request(Range::unset()));
    sheet.set_text(Field::High, "999999");
    assert_eq!(sheet.draft_values().1, Some(50_000.0));
}

#[test]
fn single_value_drag_reports_equal_ends() {
    let domain = Domain::new(0.0, 100.0, 1.0).unwrap();
    let mut slider = DualRangeSlider::new(domain, RangePair::single(0.0)).single_value(true);
    slider.set_track(Track::new(0.0, 100.0));
    slider.pointer_down(PointerId(1), 42.0);
    assert_eq!(slider.on_frame(), Some(RangePair::single(42.0)));

    let mut sheet = RangeSheet::new();
    sheet.open(SheetRequest::new("Threshold", "", domain).single_value(true));
    sheet.set_track(Track::new(0.0, 100.0));
    sheet.pointer_down(PointerId(1), 90.0);
    sheet.pointer_move(PointerId(1), 42.0);
    assert_eq!(sheet.pointer_up(PointerId(1)), Some(RangePair::single(42.0)));
    assert_eq!(sheet.text(Field::Low), "42");
    assert_eq!(sheet.text(Field::High), "42");
}

#[test]
fn many_moves_in_one_frame_coalesce() {
    let mut sheet = RangeSheet::new();
    sheet.open(request(Range::between(0.0, 50_000.0).unwrap()));
    sheet.set_track(Track::new(0.0, 500.0));
    sheet.pointer_down(PointerId(7), 400.0);
    for x in [410.0, 420.0, 430.0, 440.0] {
        sheet.pointer_move(PointerId(7), x);
    }
    assert_eq!(sheet.on_frame(), Some(RangePair::new(0.0, 44_000.0).unwrap()));
    assert_eq!(sheet.on_frame(), None);
    assert_eq!(sheet.text(Field::High), "44000");
}

#[test]
fn moves_from_another_pointer_are_ignored() {
    let mut sheet = RangeSheet::new();
    sheet.open(request(Range::between(0.0, 50_000.0).unwrap()));
    sheet.set_track(Track::new(0.0, 500.0));
    sheet.pointer_down(PointerId(1), 0.0);
    sheet.on_frame();
    sheet.pointer_move(PointerId(2), 250.0);
    assert_eq!(sheet.on_frame(), None);
    assert_eq!(sheet.pointer_up(PointerId(2)), None);
    assert!(sheet.slider().unwrap().is_dragging());
    sheet.pointer_cancel(PointerId(1));
    assert!(!sheet.slider().unwrap().is_dragging());
}

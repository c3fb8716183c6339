//! Range input sheet: two numeric text fields paired with a dual-range slider.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BottomSheet;
use crate::numeric::{format_value, format_with_thousands_separator, parse_digits};
use crate::range::{Domain, Range, RangePair};
use crate::slider::{DualRangeSlider, Handle, PointerId, Track};

/// Text field of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Low,
    High,
}

impl From<Field> for Handle {
    fn from(field: Field) -> Self {
        match field {
            Field::Low => Handle::Low,
            Field::High => Handle::High,
        }
    }
}

/// What a host supplies when opening the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRequest {
    pub title: String,
    pub unit: String,
    pub domain: Domain,
    pub initial: Range,
    pub single_value: bool,
    /// Screen-specific cap on the domain maximum.
    pub ceiling: Option<f64>,
}

impl SheetRequest {
    pub fn new(title: impl Into<String>, unit: impl Into<String>, domain: Domain) -> Self {
        Self {
            title: title.into(),
            unit: unit.into(),
            domain,
            initial: Range::unset(),
            single_value: false,
            ceiling: None,
        }
    }

    pub fn initial(mut self, initial: Range) -> Self {
        self.initial = initial;
        self
    }

    pub fn single_value(mut self, enabled: bool) -> Self {
        self.single_value = enabled;
        self
    }

    pub fn ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Domain the sheet actually validates against.
    pub fn effective_domain(&self) -> Domain {
        match self.ceiling {
            Some(c) => self.domain.with_ceiling(c),
            None => self.domain,
        }
    }
}

#[derive(Debug, Clone)]
struct Draft {
    request: SheetRequest,
    domain: Domain,
    low_text: String,
    high_text: String,
    active_field: Option<Field>,
    slider: DualRangeSlider,
}

impl Draft {
    fn seed(request: SheetRequest) -> Self {
        let domain = request.effective_domain();
        let text = |v: Option<f64>| v.map(format_value).unwrap_or_default();
        let (low_text, high_text) = if request.single_value {
            let shared = text(request.initial.low().or(request.initial.high()));
            (shared.clone(), shared)
        } else {
            (text(request.initial.low()), text(request.initial.high()))
        };
        let slider = DualRangeSlider::new(domain, RangePair::sorted(domain.min(), domain.max()))
            .single_value(request.single_value);
        let mut draft = Self {
            request,
            domain,
            low_text,
            high_text,
            active_field: None,
            slider,
        };
        draft.sync_slider();
        draft
    }

    fn value(&self, field: Field) -> Option<f64> {
        self.domain.parse(self.text(field))
    }

    fn text(&self, field: Field) -> &str {
        match field {
            Field::Low => &self.low_text,
            Field::High => &self.high_text,
        }
    }

    fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Low => &mut self.low_text,
            Field::High => &mut self.high_text,
        }
    }

    fn is_valid(&self) -> bool {
        match (self.value(Field::Low), self.value(Field::High)) {
            (Some(low), Some(high)) => {
                self.domain.contains(low) && self.domain.contains(high) && low <= high
            }
            _ => false,
        }
    }

    /// Push the text values into the slider.
    ///
    /// Unset ends sit on the domain bounds. An inverted draft pins the high
    /// handle onto the low one, since the slider cannot show `low > high`.
    fn sync_slider(&mut self) {
        let low = self.value(Field::Low);
        let high = self.value(Field::High);
        let pair = if self.request.single_value {
            RangePair::single(low.or(high).unwrap_or(self.domain.min()))
        } else {
            let low = low.unwrap_or(self.domain.min());
            let high = high.unwrap_or(self.domain.max()).max(low);
            RangePair::sorted(low, high)
        };
        self.slider.set_values(pair);
    }

    /// Write a slider change back into the text fields.
    fn write_pair(&mut self, pair: RangePair) {
        if self.request.single_value {
            let shared = format_value(pair.low());
            self.low_text = shared.clone();
            self.high_text = shared;
        } else {
            self.low_text = format_value(pair.low());
            self.high_text = format_value(pair.high());
        }
    }

    fn edit(&mut self, field: Field, digits: String) {
        if self.request.single_value {
            self.low_text = digits.clone();
            self.high_text = digits;
        } else {
            *self.text_mut(field) = digits;
        }
        self.sync_slider();
    }
}

/// The range sheet. Closed until [`RangeSheet::open`] is called.
#[derive(Debug, Clone, Default)]
pub struct RangeSheet {
    draft: Option<Draft>,
}

impl RangeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) with a fresh draft seeded from `request.initial`.
    pub fn open(&mut self, request: SheetRequest) {
        debug!(title = %request.title, "range sheet open");
        self.draft = Some(Draft::seed(request));
    }

    pub fn request(&self) -> Option<&SheetRequest> {
        self.draft.as_ref().map(|d| &d.request)
    }

    pub fn unit(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.request.unit.as_str())
    }

    pub fn domain(&self) -> Option<Domain> {
        self.draft.as_ref().map(|d| d.domain)
    }

    pub fn is_single_value(&self) -> bool {
        self.draft.as_ref().is_some_and(|d| d.request.single_value)
    }

    pub fn slider(&self) -> Option<&DualRangeSlider> {
        self.draft.as_ref().map(|d| &d.slider)
    }

    /// Raw digits of a field.
    pub fn text(&self, field: Field) -> &str {
        self.draft.as_ref().map_or("", |d| d.text(field))
    }

    /// Field text with thousands separators, for display only.
    pub fn display_text(&self, field: Field) -> String {
        format_with_thousands_separator(self.text(field))
    }

    pub fn has_value(&self, field: Field) -> bool {
        !self.text(field).trim().is_empty()
    }

    /// Parsed draft values (`None` = unset).
    pub fn draft_values(&self) -> (Option<f64>, Option<f64>) {
        match &self.draft {
            Some(d) => (d.value(Field::Low), d.value(Field::High)),
            None => (None, None),
        }
    }

    pub fn active_field(&self) -> Option<Field> {
        self.draft.as_ref().and_then(|d| d.active_field)
    }

    pub fn focus(&mut self, field: Field) {
        if let Some(d) = &mut self.draft {
            d.active_field = Some(if d.request.single_value { Field::Low } else { field });
        }
    }

    /// Low → High → Low. Single-value sheets only have the low field.
    pub fn cycle_focus(&mut self) {
        if let Some(d) = &mut self.draft {
            d.active_field = match (d.active_field, d.request.single_value) {
                (_, true) => Some(Field::Low),
                (None, false) | (Some(Field::High), false) => Some(Field::Low),
                (Some(Field::Low), false) => Some(Field::High),
            };
        }
    }

    /// Replace a field's text. Only its digits are kept.
    pub fn set_text(&mut self, field: Field, text: &str) {
        if let Some(d) = &mut self.draft {
            d.edit(field, parse_digits(text));
        }
    }

    /// Append a character to the focused field (focusing low if none is).
    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let Some(d) = &mut self.draft else {
            return;
        };
        let field = *d.active_field.get_or_insert(Field::Low);
        let mut digits = d.text(field).to_string();
        digits.push(c);
        d.edit(field, digits);
    }

    pub fn backspace(&mut self) {
        let Some(d) = &mut self.draft else {
            return;
        };
        let Some(field) = d.active_field else {
            return;
        };
        let mut digits = d.text(field).to_string();
        digits.pop();
        d.edit(field, digits);
    }

    pub fn set_track(&mut self, track: Track) {
        if let Some(d) = &mut self.draft {
            d.slider.set_track(track);
        }
    }

    pub fn pointer_down(&mut self, pointer: PointerId, x: f64) {
        if let Some(d) = &mut self.draft {
            d.slider.pointer_down(pointer, x);
        }
    }

    pub fn pointer_move(&mut self, pointer: PointerId, x: f64) {
        if let Some(d) = &mut self.draft {
            d.slider.pointer_move(pointer, x);
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId) -> Option<RangePair> {
        let d = self.draft.as_mut()?;
        let change = d.slider.pointer_up(pointer)?;
        d.write_pair(change);
        Some(change)
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<RangePair> {
        let d = self.draft.as_mut()?;
        let change = d.slider.pointer_cancel(pointer)?;
        d.write_pair(change);
        Some(change)
    }

    /// Once per frame: fold the slider's coalesced change into the text fields.
    pub fn on_frame(&mut self) -> Option<RangePair> {
        let d = self.draft.as_mut()?;
        let change = d.slider.on_frame()?;
        d.write_pair(change);
        Some(change)
    }

    /// Step the handle of the focused field (low when nothing is focused).
    pub fn nudge(&mut self, steps: i32) -> Option<RangePair> {
        let d = self.draft.as_mut()?;
        let handle = d.active_field.unwrap_or(Field::Low).into();
        d.slider.nudge(handle, steps);
        let change = d.slider.on_frame()?;
        d.write_pair(change);
        Some(change)
    }
}

impl BottomSheet for RangeSheet {
    type Output = RangePair;

    fn title(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.request.title.as_str())
    }

    fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    fn can_apply(&self) -> bool {
        self.draft.as_ref().is_some_and(Draft::is_valid)
    }

    fn reset(&mut self) {
        if let Some(d) = &mut self.draft {
            d.low_text.clear();
            d.high_text.clear();
            d.active_field = None;
            d.sync_slider();
        }
    }

    fn apply(&mut self) -> Option<RangePair> {
        let d = self.draft.as_ref()?;
        if !d.is_valid() {
            return None;
        }
        let low = d.value(Field::Low)?;
        let high = d.value(Field::High)?;
        let pair = RangePair::new(low, high).ok()?;
        debug!(title = %d.request.title, low, high, "range sheet applied");
        self.draft = None;
        Some(pair)
    }

    fn close(&mut self) -> bool {
        let was_open = self.draft.take().is_some();
        if was_open {
            debug!("range sheet closed without apply");
        }
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> Domain {
        Domain::new(0.0, 50_000.0, 100.0).unwrap()
    }

    fn open_with(initial: Range) -> RangeSheet {
        let mut sheet = RangeSheet::new();
        sheet.open(SheetRequest::new("Average price", "won", budget()).initial(initial));
        sheet
    }

    #[test]
    fn opens_with_initial_text() {
        let sheet = open_with(Range::between(1000.0, 2000.0).unwrap());
        assert_eq!(sheet.text(Field::Low), "1000");
        assert_eq!(sheet.text(Field::High), "2000");
        assert_eq!(sheet.display_text(Field::Low), "1,000");
        let slider = sheet.slider().unwrap();
        assert_eq!((slider.low(), slider.high()), (1000.0, 2000.0));
    }

    #[test]
    fn unset_initial_puts_slider_on_bounds() {
        let sheet = open_with(Range::unset());
        assert!(!sheet.has_value(Field::Low));
        let slider = sheet.slider().unwrap();
        assert_eq!((slider.low(), slider.high()), (0.0, 50_000.0));
        assert!(!sheet.can_apply());
    }

    #[test]
    fn typing_strips_non_digits_and_syncs_slider() {
        let mut sheet = open_with(Range::unset());
        sheet.set_text(Field::Low, "1,5a00");
        assert_eq!(sheet.text(Field::Low), "1500");
        assert_eq!(sheet.slider().unwrap().low(), 1500.0);
        sheet.focus(Field::High);
        for c in "3000x".chars() {
            sheet.push_digit(c);
        }
        assert_eq!(sheet.text(Field::High), "3000");
        assert_eq!(sheet.slider().unwrap().high(), 3000.0);
        sheet.backspace();
        assert_eq!(sheet.text(Field::High), "300");
    }

    #[test]
    fn push_digit_focuses_low_when_nothing_focused() {
        let mut sheet = open_with(Range::unset());
        sheet.push_digit('7');
        assert_eq!(sheet.active_field(), Some(Field::Low));
        assert_eq!(sheet.text(Field::Low), "7");
    }

    #[test]
    fn overlong_digit_entry_clamps_to_the_ceiling() {
        let mut sheet = open_with(Range::unset());
        sheet.set_text(Field::Low, "1000");
        sheet.focus(Field::High);
        for _ in 0..400 {
            sheet.push_digit('9');
        }
        assert_eq!(sheet.text(Field::High).len(), 400);
        assert_eq!(sheet.slider().unwrap().high(), 50_000.0);
        assert!(sheet.can_apply());
        let pair = sheet.apply().unwrap();
        assert_eq!((pair.low(), pair.high()), (1000.0, 50_000.0));
    }

    #[test]
    fn inverted_draft_pins_slider_and_disables_apply() {
        let mut sheet = open_with(Range::unset());
        sheet.set_text(Field::Low, "2000");
        sheet.set_text(Field::High, "1000");
        assert!(!sheet.can_apply());
        let slider = sheet.slider().unwrap();
        assert_eq!((slider.low(), slider.high()), (2000.0, 2000.0));
        assert_eq!(sheet.apply(), None);
        assert!(sheet.is_open());
    }

    #[test]
    fn drag_updates_text_on_frame() {
        let mut sheet = open_with(Range::between(0.0, 50_000.0).unwrap());
        sheet.set_track(Track::new(0.0, 500.0));
        sheet.pointer_down(PointerId(0), 100.0);
        sheet.pointer_move(PointerId(0), 120.0);
        assert_eq!(sheet.text(Field::Low), "0");
        let change = sheet.on_frame().unwrap();
        assert_eq!(change.low(), 12_000.0);
        assert_eq!(sheet.text(Field::Low), "12000");
        assert_eq!(sheet.text(Field::High), "50000");
        assert_eq!(sheet.pointer_up(PointerId(0)), None);
    }

    #[test]
    fn reset_clears_draft_but_stays_open() {
        let mut sheet = open_with(Range::between(1000.0, 2000.0).unwrap());
        sheet.focus(Field::High);
        sheet.reset();
        assert!(sheet.is_open());
        assert_eq!(sheet.text(Field::Low), "");
        assert_eq!(sheet.active_field(), None);
        assert!(!sheet.can_apply());
    }

    #[test]
    fn apply_returns_pair_and_closes() {
        let mut sheet = open_with(Range::between(1000.0, 2000.0).unwrap());
        let pair = sheet.apply().unwrap();
        assert_eq!((pair.low(), pair.high()), (1000.0, 2000.0));
        assert!(!sheet.is_open());
        assert_eq!(sheet.apply(), None);
    }

    #[test]
    fn close_reports_whether_open() {
        let mut sheet = open_with(Range::unset());
        assert!(sheet.close());
        assert!(!sheet.close());
    }

    #[test]
    fn single_value_edits_both_fields() {
        let mut sheet = RangeSheet::new();
        sheet.open(
            SheetRequest::new("Threshold", "", Domain::new(0.0, 100.0, 1.0).unwrap())
                .single_value(true),
        );
        sheet.focus(Field::High);
        assert_eq!(sheet.active_field(), Some(Field::Low));
        sheet.set_text(Field::High, "35");
        assert_eq!(sheet.text(Field::Low), "35");
        assert_eq!(sheet.text(Field::High), "35");
        let pair = sheet.apply().unwrap();
        assert_eq!((pair.low(), pair.high()), (35.0, 35.0));
    }

    #[test]
    fn ceiling_caps_effective_domain() {
        let mut sheet = RangeSheet::new();
        let rent = Domain::new(0.0, 1_500_000.0, 10_000.0).unwrap();
        sheet.open(SheetRequest::new("Rent", "won", rent).ceiling(50_000.0));
        sheet.set_text(Field::Low, "0");
        sheet.set_text(Field::High, "900000");
        assert_eq!(sheet.draft_values(), (Some(0.0), Some(50_000.0)));
    }

    #[test]
    fn nudge_moves_focused_handle() {
        let mut sheet = open_with(Range::between(1000.0, 2000.0).unwrap());
        sheet.focus(Field::High);
        let change = sheet.nudge(2).unwrap();
        assert_eq!(change.high(), 2200.0);
        assert_eq!(sheet.text(Field::High), "2200");
    }
}

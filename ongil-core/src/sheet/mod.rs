//! Modal bottom sheets.
//!
//! A sheet is opened by a host with its current committed value, keeps a
//! private draft while open, and hands a value back only through
//! [`BottomSheet::apply`]. Closing discards the draft; the host's value is
//! never touched by the sheet itself.

pub mod choice;
pub mod range;

pub use choice::{ChoiceItem, ChoiceRequest, ChoiceSheet};
pub use range::{Field, RangeSheet, SheetRequest};

/// Lifecycle shared by every sheet.
pub trait BottomSheet {
    /// Payload handed to the host on a successful apply.
    type Output;

    /// Title of the open sheet, `None` while closed.
    fn title(&self) -> Option<&str>;

    fn is_open(&self) -> bool;

    /// Whether the apply action is currently available.
    fn can_apply(&self) -> bool;

    /// Clear the draft. The sheet stays open.
    fn reset(&mut self);

    /// Validate the draft and close. `None` (sheet untouched) while apply is unavailable.
    fn apply(&mut self) -> Option<Self::Output>;

    /// Discard the draft and close. Returns false if the sheet was not open.
    fn close(&mut self) -> bool;
}

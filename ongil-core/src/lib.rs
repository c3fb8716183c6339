//! Ongil Core: interaction logic for the site-analysis wizard.
//!
//! This crate holds everything that can be tested without a terminal or a network:
//! - Numeric text parsing, snapping, and thousands formatting
//! - Domain and range value types
//! - Dual-range slider state machine with per-frame change coalescing
//! - Bottom sheets (range input and single choice) behind one trait
//! - Store-conditions form, wizard steps, and analysis wire types

pub mod analysis;
pub mod conditions;
pub mod numeric;
pub mod range;
pub mod sheet;
pub mod slider;
pub mod wizard;

pub use range::{format_range, Domain, Range, RangeError, RangePair};
pub use sheet::{BottomSheet, ChoiceSheet, RangeSheet, SheetRequest};
pub use slider::{DualRangeSlider, Handle, PointerId, Track};

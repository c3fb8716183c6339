//! Ongil TUI - terminal front end for the site-analysis wizard and community board.
//!
//! - Three-step wizard (place, category, store conditions)
//! - Range and choice bottom sheets driven by keyboard and mouse
//! - Analysis report view
//! - Community board with search, suggestions and history

pub mod app;
pub mod input;
pub mod persistence;
pub mod shell;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;

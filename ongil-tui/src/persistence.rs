//! Session persistence: JSON save/load of the wizard across restarts.
//!
//! Community data has its own file and is saved by the store itself.

use std::path::Path;

use ongil_core::wizard::{Wizard, DEFAULT_COORDINATES};
use ongil_services::community::{BoardTab, SearchField};
use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Screen};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSession {
    pub wizard: Wizard,
    pub place_input: String,
    pub community_tab: BoardTab,
    pub search_field: SearchField,
    pub help_seen: bool,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            wizard: Wizard::default(),
            place_input: DEFAULT_COORDINATES.to_string(),
            community_tab: BoardTab::All,
            search_field: SearchField::All,
            help_seen: false,
        }
    }
}

/// Returns defaults if the file is missing or corrupt.
pub fn load(path: &Path) -> PersistedSession {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedSession::default(),
    }
}

/// Creates parent directories if needed.
pub fn save(path: &Path, session: &PersistedSession) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedSession {
    PersistedSession {
        wizard: app.wizard.clone(),
        place_input: app.place_input.clone(),
        community_tab: app.board.tab,
        search_field: app.search.field,
        help_seen: app.help_seen || app.overlay == Overlay::Help,
    }
}

/// Restore a session. First launches open on the help overlay.
pub fn apply(app: &mut AppState, session: PersistedSession) {
    app.wizard = session.wizard;
    app.place_input = session.place_input;
    app.board.tab = session.community_tab;
    app.search.field = session.search_field;
    app.help_seen = session.help_seen;
    app.screen = Screen::for_step(app.wizard.step);
    if !app.help_seen {
        app.overlay = Overlay::Help;
    }
}

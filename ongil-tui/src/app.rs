//! Application state. Single owner, main thread only.
//!
//! Screens, overlays, the open sheets and the community board all live here;
//! input handlers mutate it and `ui::draw` reads it.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use ongil_core::analysis::AnalysisResponse;
use ongil_core::conditions::{ConditionRow, RowSheet};
use ongil_core::sheet::{BottomSheet, ChoiceSheet, RangeSheet};
use ongil_core::slider::PointerId;
use ongil_core::wizard::{Coordinates, Step, Wizard, DEFAULT_COORDINATES};
use ongil_services::community::{
    Board, BoardTab, CommunityStore, NewPost, Post, PostId, SearchField,
};
use tracing::{debug, info, warn};

use crate::shell::{Propagation, Shell, ShellEvent};
use crate::worker::{WorkerCommand, WorkerResponse};

const MAX_ERROR_HISTORY: usize = 50;

/// The only pointer a terminal has.
pub const MOUSE: PointerId = PointerId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Place,
    Category,
    Conditions,
    Loading,
    Report,
    Community,
    PostDetail,
}

impl Screen {
    pub fn for_step(step: Step) -> Self {
        match step {
            Step::Place => Screen::Place,
            Step::Category => Screen::Category,
            Step::Conditions => Screen::Conditions,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Place => "Step 1 / 3  Choose a place",
            Screen::Category => "Step 2 / 3  Business category",
            Screen::Conditions => "Step 3 / 3  Store conditions",
            Screen::Loading => "Analyzing",
            Screen::Report => "Analysis report",
            Screen::Community => "Community",
            Screen::PostDetail => "Post",
        }
    }

    pub fn is_community(self) -> bool {
        matches!(self, Screen::Community | Screen::PostDetail)
    }
}

/// What an open sheet writes back into on apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTarget {
    Category,
    Row(ConditionRow),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    RangeSheet,
    ChoiceSheet,
    ExitConfirm,
    Search,
    Compose,
    Help,
    ConfirmDelete(PostId),
    ErrorHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Default)]
pub struct AnalysisState {
    next_id: u64,
    pub pending: Option<u64>,
    pub report: Option<AnalysisResponse>,
    pub error: Option<String>,
    pub elapsed_ms: Option<u128>,
    pub scroll: u16,
}

#[derive(Debug, Default)]
pub struct BoardView {
    pub tab: BoardTab,
    pub cursor: usize,
    pub filter: String,
    pub filter_editing: bool,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub field: SearchField,
    /// Results of the last submitted query. Cleared while typing.
    pub results: Option<Vec<PostId>>,
    pub cursor: usize,
    /// The cursor is on a candidate row rather than the typed text.
    pub picking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Board,
    Title,
    Content,
    Tags,
    Nick,
}

impl ComposeField {
    pub fn next(self) -> Self {
        match self {
            ComposeField::Board => ComposeField::Title,
            ComposeField::Title => ComposeField::Content,
            ComposeField::Content => ComposeField::Tags,
            ComposeField::Tags => ComposeField::Nick,
            ComposeField::Nick => ComposeField::Board,
        }
    }
}

#[derive(Debug)]
pub struct ComposeState {
    pub board: Board,
    pub title: String,
    pub content: String,
    pub tags: String,
    pub nick: String,
    pub focus: ComposeField,
}

impl Default for ComposeState {
    fn default() -> Self {
        Self {
            board: Board::Free,
            title: String::new(),
            content: String::new(),
            tags: String::new(),
            nick: String::new(),
            focus: ComposeField::default(),
        }
    }
}

impl ComposeState {
    /// Text buffer behind the focused field; the board selector has none.
    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            ComposeField::Board => None,
            ComposeField::Title => Some(&mut self.title),
            ComposeField::Content => Some(&mut self.content),
            ComposeField::Tags => Some(&mut self.tags),
            ComposeField::Nick => Some(&mut self.nick),
        }
    }

    pub fn toggle_board(&mut self) {
        self.board = match self.board {
            Board::Free => Board::Partner,
            Board::Partner => Board::Free,
        };
    }

    fn to_new_post(&self) -> NewPost {
        let nick = self.nick.trim();
        let post = NewPost::new(self.board, self.title.as_str(), self.content.as_str())
            .tags(self.tags.split(',').map(str::trim).filter(|t| !t.is_empty()));
        if nick.is_empty() {
            post
        } else {
            post.nick(nick)
        }
    }
}

#[derive(Debug, Default)]
pub struct DetailState {
    pub post_id: Option<PostId>,
    pub comment: String,
    pub editing: bool,
    pub scroll: u16,
}

pub struct AppState {
    pub running: bool,
    pub screen: Screen,
    pub overlay: Overlay,

    // Wizard
    pub wizard: Wizard,
    pub place_input: String,
    pub conditions_cursor: usize,
    pub range_sheet: RangeSheet,
    pub choice_sheet: ChoiceSheet,
    pub sheet_target: Option<SheetTarget>,
    pub analysis: AnalysisState,

    // Community
    pub store: CommunityStore,
    pub board: BoardView,
    pub search: SearchState,
    pub compose: ComposeState,
    pub detail: DetailState,

    pub shell: Shell<AppState>,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<String>,
    pub help_seen: bool,
    /// Frames drawn so far, for the loading spinner.
    pub tick: u64,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        store: CommunityStore,
    ) -> Self {
        let mut app = Self {
            running: true,
            screen: Screen::Place,
            overlay: Overlay::None,
            wizard: Wizard::new(),
            place_input: DEFAULT_COORDINATES.to_string(),
            conditions_cursor: 0,
            range_sheet: RangeSheet::new(),
            choice_sheet: ChoiceSheet::new(),
            sheet_target: None,
            analysis: AnalysisState::default(),
            store,
            board: BoardView::default(),
            search: SearchState::default(),
            compose: ComposeState::default(),
            detail: DetailState::default(),
            shell: Shell::new(),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::new(),
            help_seen: false,
            tick: 0,
        };
        app.install_shell_handlers();
        app
    }

    /// Layout handler first so the screen handler gets the first look at `Back`.
    fn install_shell_handlers(&mut self) {
        self.shell.subscribe(|app: &mut AppState, event| {
            match event {
                ShellEvent::Close => app.request_exit(),
                ShellEvent::Back => app.set_status("Already at the first step"),
            }
            Propagation::Handled
        });
        self.shell.subscribe(|app: &mut AppState, event| match event {
            ShellEvent::Back if app.go_back() => Propagation::Handled,
            _ => Propagation::Ignored,
        });
    }

    /// Send a top-bar event through the shell. Handlers cannot subscribe
    /// while an event is being dispatched.
    pub fn emit_shell(&mut self, event: ShellEvent) -> bool {
        let mut shell = std::mem::take(&mut self.shell);
        let handled = shell.emit(self, event);
        self.shell = shell;
        handled
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn push_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!(error = %msg, "surfaced to user");
        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(msg.clone());
        self.status_message = Some((msg, StatusLevel::Error));
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn request_exit(&mut self) {
        self.cancel_gesture();
        self.close_sheets();
        self.overlay = Overlay::ExitConfirm;
    }

    pub fn confirm_exit(&mut self) {
        info!("exit confirmed");
        self.running = false;
    }

    /// Screen-level back. Returns false when there is nowhere to go.
    pub fn go_back(&mut self) -> bool {
        match self.screen {
            Screen::Place => return false,
            Screen::Category | Screen::Conditions => {
                self.wizard.back();
                self.screen = Screen::for_step(self.wizard.step);
            }
            Screen::Loading => {
                self.cancel_analysis();
            }
            Screen::Report => self.screen = Screen::Conditions,
            Screen::Community => self.screen = self.wizard_screen(),
            Screen::PostDetail => {
                self.detail = DetailState::default();
                self.screen = Screen::Community;
            }
        }
        debug!(screen = ?self.screen, "back");
        true
    }

    /// Where the wizard side of the app currently is.
    pub fn wizard_screen(&self) -> Screen {
        if self.analysis.pending.is_some() {
            Screen::Loading
        } else if self.analysis.report.is_some() && self.wizard.step == Step::Conditions {
            Screen::Report
        } else {
            Screen::for_step(self.wizard.step)
        }
    }

    /// Switch between the wizard and the community board.
    pub fn toggle_section(&mut self) {
        self.screen = if self.screen.is_community() {
            self.wizard_screen()
        } else {
            self.clamp_board_cursor();
            Screen::Community
        };
    }

    // ── Wizard ───────────────────────────────────────────────────────

    pub fn confirm_place(&mut self) {
        match Coordinates::parse(&self.place_input) {
            Ok(place) => {
                self.wizard.set_place(place);
                self.advance_wizard();
            }
            Err(e) => self.set_warning(e.to_string()),
        }
    }

    pub fn advance_wizard(&mut self) {
        if self.wizard.advance() {
            self.screen = Screen::for_step(self.wizard.step);
            self.status_message = None;
        } else {
            self.set_warning(match self.wizard.step {
                Step::Place => "Enter a location first",
                Step::Category => "Choose a category first",
                Step::Conditions => "Fill in every condition first",
            });
        }
    }

    pub fn open_category_sheet(&mut self) {
        self.choice_sheet.open(self.wizard.category_sheet());
        self.sheet_target = Some(SheetTarget::Category);
        self.overlay = Overlay::ChoiceSheet;
    }

    pub fn open_row_sheet(&mut self, row: ConditionRow) {
        match self.wizard.conditions.sheet_for(row) {
            RowSheet::Range(request) => {
                self.range_sheet.open(request);
                self.overlay = Overlay::RangeSheet;
            }
            RowSheet::Choice(request) => {
                self.choice_sheet.open(request);
                self.overlay = Overlay::ChoiceSheet;
            }
        }
        self.sheet_target = Some(SheetTarget::Row(row));
    }

    pub fn selected_row(&self) -> ConditionRow {
        ConditionRow::ALL[self.conditions_cursor.min(ConditionRow::ALL.len() - 1)]
    }

    pub fn move_conditions_cursor(&mut self, delta: isize) {
        let last = ConditionRow::ALL.len() as isize - 1;
        self.conditions_cursor = (self.conditions_cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Apply whichever sheet is open. No-op while apply is disabled.
    pub fn apply_sheet(&mut self) {
        match (self.overlay, self.sheet_target) {
            (Overlay::RangeSheet, Some(SheetTarget::Row(row))) => {
                let Some(pair) = self.range_sheet.apply() else {
                    return;
                };
                self.wizard.conditions.apply_range(row, pair);
                info!(?row, low = pair.low(), high = pair.high(), "range applied");
            }
            (Overlay::ChoiceSheet, Some(target)) => {
                let Some(key) = self.choice_sheet.apply() else {
                    return;
                };
                match target {
                    SheetTarget::Category => self.wizard.set_category(&key),
                    SheetTarget::Row(row) => self.wizard.conditions.apply_choice(row, key),
                }
            }
            _ => return,
        }
        self.sheet_target = None;
        self.overlay = Overlay::None;
    }

    /// Dismiss without applying. The committed values stay as they were.
    pub fn close_sheets(&mut self) {
        self.range_sheet.close();
        self.choice_sheet.close();
        self.sheet_target = None;
        if matches!(self.overlay, Overlay::RangeSheet | Overlay::ChoiceSheet) {
            self.overlay = Overlay::None;
        }
    }

    pub fn submit_analysis(&mut self) {
        let request = match self.wizard.build_request() {
            Ok(r) => r,
            Err(e) => {
                self.set_warning(e.to_string());
                return;
            }
        };
        self.analysis.next_id += 1;
        let id = self.analysis.next_id;
        info!(id, summary = %self.wizard.conditions.summary(), "submitting analysis");
        if self
            .worker_tx
            .send(WorkerCommand::Analyze { id, request })
            .is_err()
        {
            self.push_error("Background worker is not running");
            return;
        }
        self.analysis.pending = Some(id);
        self.analysis.error = None;
        self.screen = Screen::Loading;
    }

    pub fn cancel_analysis(&mut self) {
        if let Some(id) = self.analysis.pending.take() {
            debug!(id, "analysis abandoned");
        }
        self.screen = Screen::Conditions;
    }

    /// Start a new analysis from step one. Community data is untouched.
    pub fn restart_wizard(&mut self) {
        self.wizard = Wizard::new();
        self.place_input = DEFAULT_COORDINATES.to_string();
        self.conditions_cursor = 0;
        self.analysis.report = None;
        self.analysis.error = None;
        self.analysis.scroll = 0;
        self.screen = Screen::Place;
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::AnalysisDone {
                id,
                report,
                elapsed_ms,
            } => {
                if self.analysis.pending != Some(id) {
                    debug!(id, "stale analysis dropped");
                    return;
                }
                self.analysis.pending = None;
                self.analysis.report = Some(*report);
                self.analysis.elapsed_ms = Some(elapsed_ms);
                self.analysis.scroll = 0;
                if self.screen == Screen::Loading {
                    self.screen = Screen::Report;
                }
                self.set_status(format!("Analysis ready ({elapsed_ms} ms)"));
            }
            WorkerResponse::AnalysisFailed { id, error } => {
                if self.analysis.pending != Some(id) {
                    return;
                }
                self.analysis.pending = None;
                self.analysis.error = Some(error.clone());
                if self.screen == Screen::Loading {
                    self.screen = Screen::Conditions;
                }
                self.push_error(format!("Analysis failed: {error}"));
            }
        }
    }

    /// Called once per frame after input has been drained.
    pub fn on_frame(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(pair) = self.range_sheet.on_frame() {
            debug!(low = pair.low(), high = pair.high(), "slider frame");
        }
    }

    /// Abort an in-progress drag, e.g. when the terminal loses focus.
    pub fn cancel_gesture(&mut self) {
        self.range_sheet.pointer_cancel(MOUSE);
    }

    // ── Community ────────────────────────────────────────────────────

    pub fn visible_posts(&self) -> Vec<&Post> {
        self.store.filter_tab(self.board.tab, &self.board.filter)
    }

    pub fn selected_post_id(&self) -> Option<PostId> {
        self.visible_posts().get(self.board.cursor).map(|p| p.id)
    }

    pub fn move_board_cursor(&mut self, delta: isize) {
        let len = self.visible_posts().len();
        if len == 0 {
            self.board.cursor = 0;
            return;
        }
        self.board.cursor = (self.board.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    fn clamp_board_cursor(&mut self) {
        let len = self.visible_posts().len();
        self.board.cursor = self.board.cursor.min(len.saturating_sub(1));
    }

    pub fn cycle_tab(&mut self) {
        self.board.tab = self.board.tab.next();
        self.board.cursor = 0;
    }

    pub fn open_post(&mut self, id: PostId) {
        match self.store.record_view(id) {
            Ok(views) => {
                debug!(id, views, "post opened");
                self.detail = DetailState {
                    post_id: Some(id),
                    ..DetailState::default()
                };
                self.overlay = Overlay::None;
                self.screen = Screen::PostDetail;
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    pub fn open_selected_post(&mut self) {
        if let Some(id) = self.selected_post_id() {
            self.open_post(id);
        }
    }

    pub fn submit_comment(&mut self) {
        let Some(post_id) = self.detail.post_id else {
            return;
        };
        match self.store.add_comment(post_id, None, &self.detail.comment) {
            Ok(_) => {
                self.detail.comment.clear();
                self.detail.editing = false;
                self.persist_store();
                self.set_status("Comment posted");
            }
            Err(e) => self.set_warning(e.to_string()),
        }
    }

    pub fn open_compose(&mut self) {
        self.compose = ComposeState {
            board: match self.board.tab {
                BoardTab::Partner => Board::Partner,
                _ => Board::Free,
            },
            ..ComposeState::default()
        };
        self.overlay = Overlay::Compose;
    }

    pub fn submit_compose(&mut self) {
        let new = self.compose.to_new_post();
        match self.store.create_post(new) {
            Ok(post) => {
                let id = post.id;
                self.overlay = Overlay::None;
                self.compose = ComposeState::default();
                self.persist_store();
                self.board.filter.clear();
                self.board.cursor = 0;
                self.set_status(format!("Post #{id} published"));
            }
            Err(e) => self.set_warning(e.to_string()),
        }
    }

    pub fn request_delete(&mut self, id: PostId) {
        self.overlay = Overlay::ConfirmDelete(id);
    }

    pub fn confirm_delete(&mut self) {
        let Overlay::ConfirmDelete(id) = self.overlay else {
            return;
        };
        self.overlay = Overlay::None;
        match self.store.delete_post(id) {
            Ok(post) => {
                self.persist_store();
                if self.detail.post_id == Some(id) {
                    self.detail = DetailState::default();
                    self.screen = Screen::Community;
                }
                self.clamp_board_cursor();
                self.set_status(format!("Deleted \"{}\"", post.title));
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    pub fn open_search(&mut self) {
        self.search.input.clear();
        self.search.results = None;
        self.search.cursor = 0;
        self.search.picking = false;
        self.overlay = Overlay::Search;
    }

    pub fn edit_search(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.search.input);
        self.search.results = None;
        self.search.cursor = 0;
        self.search.picking = false;
    }

    /// Run the typed query and remember it. A blank query shows nothing.
    pub fn submit_search(&mut self) {
        let query = self.search.input.trim().to_string();
        if query.is_empty() {
            return;
        }
        let ids: Vec<PostId> = self
            .store
            .search(&query, self.search.field)
            .iter()
            .map(|p| p.id)
            .collect();
        info!(query = %query, field = ?self.search.field, hits = ids.len(), "search");
        self.store.record_search(&query);
        self.persist_store();
        self.search.results = Some(ids);
        self.search.cursor = 0;
        self.search.picking = false;
    }

    /// Rows listed under the search box: results after a submit, otherwise
    /// matching history followed by suggestions.
    pub fn search_candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .store
            .history_matching(&self.search.input)
            .into_iter()
            .map(str::to_string)
            .collect();
        for s in self.store.suggestions(&self.search.input) {
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }

    pub fn move_search_cursor(&mut self, delta: isize) {
        let len = match &self.search.results {
            Some(ids) => ids.len(),
            None => self.search_candidates().len(),
        };
        if len == 0 {
            self.search.cursor = 0;
            self.search.picking = false;
            return;
        }
        if self.search.results.is_none() && !self.search.picking {
            self.search.picking = true;
            self.search.cursor = if delta < 0 { len - 1 } else { 0 };
            return;
        }
        self.search.cursor = (self.search.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    /// Enter in the search overlay: open the highlighted result, or pick the
    /// highlighted candidate and run it, or run the typed query.
    pub fn search_enter(&mut self) {
        if let Some(ids) = &self.search.results {
            if let Some(&id) = ids.get(self.search.cursor) {
                self.open_post(id);
            }
            return;
        }
        if self.search.picking {
            if let Some(text) = self.search_candidates().into_iter().nth(self.search.cursor) {
                self.search.input = text;
            }
        }
        self.submit_search();
    }

    /// Forget the highlighted history entry (only history rows qualify).
    pub fn remove_highlighted_history(&mut self) {
        if self.search.results.is_some() || !self.search.picking {
            return;
        }
        let history: Vec<String> = self
            .store
            .history_matching(&self.search.input)
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(entry) = history.get(self.search.cursor) {
            self.store.remove_search(entry);
            self.persist_store();
            self.move_search_cursor(0);
        }
    }

    pub fn clear_search_history(&mut self) {
        self.store.clear_search_history();
        self.persist_store();
        self.search.cursor = 0;
        self.set_status("Search history cleared");
    }

    fn persist_store(&mut self) {
        if let Err(e) = self.store.save() {
            self.push_error(format!("Could not save community data: {e}"));
        }
    }
}

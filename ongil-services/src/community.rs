//! File-backed community board: posts, comments, tags, and search history.
//!
//! The whole store is one JSON document rewritten on every save. One process
//! owns it at a time and the last writer wins. A missing or unreadable file
//! opens as an empty store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub type PostId = u64;
pub type CommentId = u64;

pub const DEFAULT_NICK: &str = "anonymous";
pub const MAX_SUGGESTIONS: usize = 8;
pub const MAX_HISTORY: usize = 10;
/// Preview length used for list rows and suggestions.
pub const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("post #{0} not found")]
    PostNotFound(PostId),

    #[error("comment #{0} not found")]
    CommentNotFound(CommentId),

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Board {
    Free,
    Partner,
}

impl Board {
    pub fn label(self) -> &'static str {
        match self {
            Board::Free => "Free board",
            Board::Partner => "Partner board",
        }
    }
}

/// List filter on the community main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoardTab {
    #[default]
    All,
    Free,
    Partner,
}

impl BoardTab {
    pub const ALL: [BoardTab; 3] = [BoardTab::All, BoardTab::Free, BoardTab::Partner];

    pub fn matches(self, board: Board) -> bool {
        match self {
            BoardTab::All => true,
            BoardTab::Free => board == Board::Free,
            BoardTab::Partner => board == Board::Partner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoardTab::All => "All posts",
            BoardTab::Free => Board::Free.label(),
            BoardTab::Partner => Board::Partner.label(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            BoardTab::All => BoardTab::Free,
            BoardTab::Free => BoardTab::Partner,
            BoardTab::Partner => BoardTab::All,
        }
    }
}

/// Which post fields a search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchField {
    #[default]
    All,
    Title,
    Nick,
    Content,
}

impl SearchField {
    pub fn label(self) -> &'static str {
        match self {
            SearchField::All => "All fields",
            SearchField::Title => "Title",
            SearchField::Nick => "Author",
            SearchField::Content => "Body",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SearchField::All => SearchField::Title,
            SearchField::Title => SearchField::Nick,
            SearchField::Nick => SearchField::Content,
            SearchField::Content => SearchField::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub board: Board,
    pub title: String,
    pub content: String,
    pub nick: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
    /// Business categories the post is about; on the partner board the
    /// author's own category comes first, the wanted partner's second.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Post {
    fn field_matches(&self, field: SearchField, query: &str) -> bool {
        match field {
            SearchField::All => {
                self.title.contains(query) || self.nick.contains(query) || self.content.contains(query)
            }
            SearchField::Title => self.title.contains(query),
            SearchField::Nick => self.nick.contains(query),
            SearchField::Content => self.content.contains(query),
        }
    }

    pub fn preview(&self) -> String {
        shorten(&self.content, PREVIEW_CHARS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub nick: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for a new post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub board: Board,
    pub title: String,
    pub content: String,
    pub nick: Option<String>,
    pub tags: Vec<String>,
}

impl NewPost {
    pub fn new(board: Board, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            board,
            title: title.into(),
            content: content.into(),
            nick: None,
            tags: Vec::new(),
        }
    }

    pub fn nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update of a post. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    search_history: Vec<String>,
    #[serde(default)]
    next_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CommunityStore {
    path: Option<PathBuf>,
    data: StoreData,
}

impl CommunityStore {
    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`. Missing or corrupt files yield an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<StoreData>(&text) {
                Ok(data) => {
                    debug!(path = %path.display(), posts = data.posts.len(), "community store loaded");
                    data
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt community store, starting empty");
                    StoreData::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable community store, starting empty");
                StoreData::default()
            }
        };
        let mut store = Self {
            path: Some(path),
            data,
        };
        store.repair_next_id();
        store
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Rewrite the whole file. In-memory stores do nothing.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, json).map_err(io_err)?;
        debug!(path = %path.display(), "community store saved");
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.data.posts.is_empty()
    }

    /// Ids must stay unique even if the counter in the file is stale.
    fn repair_next_id(&mut self) {
        let max_post = self.data.posts.iter().map(|p| p.id).max().unwrap_or(0);
        let max_comment = self.data.comments.iter().map(|c| c.id).max().unwrap_or(0);
        self.data.next_id = self.data.next_id.max(max_post.max(max_comment) + 1);
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.data.next_id.max(1);
        self.data.next_id = id + 1;
        id
    }

    // ── Posts ────────────────────────────────────────────────────────

    pub fn create_post(&mut self, new: NewPost) -> Result<&Post, StoreError> {
        self.create_post_at(new, Utc::now())
    }

    pub fn create_post_at(&mut self, new: NewPost, at: DateTime<Utc>) -> Result<&Post, StoreError> {
        let title = non_blank(&new.title, "title")?;
        let content = non_blank(&new.content, "content")?;
        let nick = new
            .nick
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_NICK)
            .to_string();
        let id = self.allocate_id();
        let post = Post {
            id,
            board: new.board,
            title,
            content,
            nick,
            created_at: at,
            views: 0,
            tags: normalize_tags(new.tags),
        };
        info!(id, board = ?post.board, "post created");
        self.data.posts.push(post);
        let idx = self.data.posts.len() - 1;
        Ok(&self.data.posts[idx])
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.data.posts.iter().find(|p| p.id == id)
    }

    fn post_mut(&mut self, id: PostId) -> Result<&mut Post, StoreError> {
        self.data
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PostNotFound(id))
    }

    pub fn update_post(&mut self, id: PostId, patch: PostPatch) -> Result<&Post, StoreError> {
        let title = patch.title.as_deref().map(|t| non_blank(t, "title")).transpose()?;
        let content = patch.content.as_deref().map(|c| non_blank(c, "content")).transpose()?;
        let post = self.post_mut(id)?;
        if let Some(title) = title {
            post.title = title;
        }
        if let Some(content) = content {
            post.content = content;
        }
        if let Some(tags) = patch.tags {
            post.tags = normalize_tags(tags);
        }
        info!(id, "post updated");
        Ok(&*post)
    }

    /// Remove a post together with its comments.
    pub fn delete_post(&mut self, id: PostId) -> Result<Post, StoreError> {
        let idx = self
            .data
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PostNotFound(id))?;
        let post = self.data.posts.remove(idx);
        let before = self.data.comments.len();
        self.data.comments.retain(|c| c.post_id != id);
        info!(id, comments = before - self.data.comments.len(), "post deleted");
        Ok(post)
    }

    /// Count a view and return the new total.
    pub fn record_view(&mut self, id: PostId) -> Result<u64, StoreError> {
        let post = self.post_mut(id)?;
        post.views += 1;
        Ok(post.views)
    }

    /// Posts on a tab, newest first.
    pub fn list_posts(&self, tab: BoardTab) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.data.posts.iter().filter(|p| tab.matches(p.board)).collect();
        newest_first(&mut posts);
        posts
    }

    /// The post with the most comments on a tab; the newer post wins a tie.
    pub fn hot_post(&self, tab: BoardTab) -> Option<&Post> {
        self.data
            .posts
            .iter()
            .filter(|p| tab.matches(p.board))
            .max_by(|a, b| {
                self.comment_count(a.id)
                    .cmp(&self.comment_count(b.id))
                    .then(a.created_at.cmp(&b.created_at))
                    .then(a.id.cmp(&b.id))
            })
    }

    /// Posts carrying `tag` (case-insensitive), newest first.
    pub fn posts_with_tag(&self, tag: &str) -> Vec<&Post> {
        let tag = tag.trim().to_lowercase();
        let mut posts: Vec<&Post> = self
            .data
            .posts
            .iter()
            .filter(|p| p.tags.iter().any(|t| t.to_lowercase() == tag))
            .collect();
        newest_first(&mut posts);
        posts
    }

    /// Every distinct tag with its post count, sorted by name.
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut counts: std::collections::BTreeMap<&str, usize> = Default::default();
        for tag in self.data.posts.iter().flat_map(|p| &p.tags) {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
        counts.into_iter().map(|(t, n)| (t.to_string(), n)).collect()
    }

    // ── Comments ─────────────────────────────────────────────────────

    pub fn add_comment(
        &mut self,
        post_id: PostId,
        nick: Option<&str>,
        content: &str,
    ) -> Result<&Comment, StoreError> {
        self.add_comment_at(post_id, nick, content, Utc::now())
    }

    pub fn add_comment_at(
        &mut self,
        post_id: PostId,
        nick: Option<&str>,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<&Comment, StoreError> {
        let content = non_blank(content, "comment")?;
        if self.post(post_id).is_none() {
            return Err(StoreError::PostNotFound(post_id));
        }
        let id = self.allocate_id();
        let nick = nick
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_NICK)
            .to_string();
        self.data.comments.push(Comment {
            id,
            post_id,
            nick,
            content,
            created_at: at,
        });
        info!(id, post_id, "comment added");
        let idx = self.data.comments.len() - 1;
        Ok(&self.data.comments[idx])
    }

    pub fn delete_comment(&mut self, id: CommentId) -> Result<Comment, StoreError> {
        let idx = self
            .data
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::CommentNotFound(id))?;
        let comment = self.data.comments.remove(idx);
        info!(id, post_id = comment.post_id, "comment deleted");
        Ok(comment)
    }

    /// Comments on a post, oldest first.
    pub fn comments(&self, post_id: PostId) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> =
            self.data.comments.iter().filter(|c| c.post_id == post_id).collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        comments
    }

    pub fn comment_count(&self, post_id: PostId) -> usize {
        self.data.comments.iter().filter(|c| c.post_id == post_id).count()
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Substring search, newest first. A blank query matches nothing.
    pub fn search(&self, query: &str, field: SearchField) -> Vec<&Post> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let mut posts: Vec<&Post> = self
            .data
            .posts
            .iter()
            .filter(|p| p.field_matches(field, query))
            .collect();
        newest_first(&mut posts);
        posts
    }

    /// Filter a tab's list in place of a full search (main-screen search bar).
    pub fn filter_tab(&self, tab: BoardTab, query: &str) -> Vec<&Post> {
        let query = query.trim();
        let posts = self.list_posts(tab);
        if query.is_empty() {
            return posts;
        }
        posts
            .into_iter()
            .filter(|p| p.field_matches(SearchField::All, query))
            .collect()
    }

    /// Autocomplete candidates: distinct texts from titles, bodies, nicks and
    /// board names containing `query`, ignoring case. At most [`MAX_SUGGESTIONS`].
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut posts: Vec<&Post> = self.data.posts.iter().collect();
        newest_first(&mut posts);
        let pool = posts
            .into_iter()
            .flat_map(|p| [p.title.as_str(), p.content.as_str(), p.nick.as_str(), p.board.label()]);
        let mut out: Vec<String> = Vec::new();
        for text in pool {
            if out.len() >= MAX_SUGGESTIONS {
                break;
            }
            if text.to_lowercase().contains(&needle) && !out.iter().any(|s| s == text) {
                out.push(text.to_string());
            }
        }
        out
    }

    /// Remember a submitted query: most recent first, no duplicates, capped.
    pub fn record_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let history = &mut self.data.search_history;
        history.retain(|h| h != query);
        history.insert(0, query.to_string());
        history.truncate(MAX_HISTORY);
    }

    pub fn search_history(&self) -> &[String] {
        &self.data.search_history
    }

    /// History entries containing `query`; the full history for a blank query.
    pub fn history_matching(&self, query: &str) -> Vec<&str> {
        let query = query.trim();
        self.data
            .search_history
            .iter()
            .map(String::as_str)
            .filter(|h| query.is_empty() || h.contains(query))
            .collect()
    }

    pub fn remove_search(&mut self, query: &str) -> bool {
        let before = self.data.search_history.len();
        self.data.search_history.retain(|h| h != query);
        before != self.data.search_history.len()
    }

    pub fn clear_search_history(&mut self) {
        self.data.search_history.clear();
    }
}

fn non_blank(text: &str, what: &'static str) -> Result<String, StoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Blank(what));
    }
    Ok(trimmed.to_string())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}

fn newest_first(posts: &mut [&Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Cut `text` to `max_chars` characters, marking the cut with `…`.
pub fn shorten(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

/// "N min ago" below an hour (never less than 1), otherwise "N h ago".
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes().max(1);
    if minutes < 60 {
        format!("{minutes} min ago")
    } else {
        format!("{} h ago", minutes / 60)
    }
}

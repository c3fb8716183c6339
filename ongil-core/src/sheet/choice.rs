//! Single-choice sheet (radio list / category grid).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BottomSheet;

/// One selectable option. `key` is what the host stores and sends; `label` is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceItem {
    pub key: String,
    pub label: String,
}

impl ChoiceItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceRequest {
    pub title: String,
    pub items: Vec<ChoiceItem>,
    pub initial: Option<String>,
}

impl ChoiceRequest {
    pub fn new(title: impl Into<String>, items: Vec<ChoiceItem>) -> Self {
        Self {
            title: title.into(),
            items,
            initial: None,
        }
    }

    pub fn initial(mut self, key: Option<String>) -> Self {
        self.initial = key;
        self
    }
}

#[derive(Debug, Clone)]
struct Draft {
    request: ChoiceRequest,
    selected: Option<String>,
    cursor: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ChoiceSheet {
    draft: Option<Draft>,
}

impl ChoiceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with a fresh draft. An initial key that is not among the items is dropped.
    pub fn open(&mut self, request: ChoiceRequest) {
        let selected = request
            .initial
            .clone()
            .filter(|k| request.items.iter().any(|it| &it.key == k));
        let cursor = selected
            .as_ref()
            .and_then(|k| request.items.iter().position(|it| &it.key == k))
            .unwrap_or(0);
        debug!(title = %request.title, "choice sheet open");
        self.draft = Some(Draft {
            request,
            selected,
            cursor,
        });
    }

    pub fn items(&self) -> &[ChoiceItem] {
        match &self.draft {
            Some(d) => &d.request.items,
            None => &[],
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.draft.as_ref().and_then(|d| d.selected.as_deref())
    }

    pub fn cursor(&self) -> usize {
        self.draft.as_ref().map_or(0, |d| d.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if let Some(d) = &mut self.draft {
            let len = d.request.items.len();
            if len == 0 {
                return;
            }
            d.cursor = (d.cursor as isize + delta).rem_euclid(len as isize) as usize;
        }
    }

    /// Select the item under the cursor.
    pub fn select_cursor(&mut self) {
        if let Some(d) = &mut self.draft {
            if let Some(item) = d.request.items.get(d.cursor) {
                d.selected = Some(item.key.clone());
            }
        }
    }

    /// Select by key. Unknown keys are ignored.
    pub fn select(&mut self, key: &str) {
        if let Some(d) = &mut self.draft {
            if let Some(pos) = d.request.items.iter().position(|it| it.key == key) {
                d.cursor = pos;
                d.selected = Some(key.to_string());
            }
        }
    }
}

impl BottomSheet for ChoiceSheet {
    type Output = String;

    fn title(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.request.title.as_str())
    }

    fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    fn can_apply(&self) -> bool {
        self.selected().is_some()
    }

    fn reset(&mut self) {
        if let Some(d) = &mut self.draft {
            d.selected = None;
        }
    }

    fn apply(&mut self) -> Option<String> {
        let key = self.draft.as_ref()?.selected.clone()?;
        debug!(%key, "choice sheet applied");
        self.draft = None;
        Some(key)
    }

    fn close(&mut self) -> bool {
        self.draft.take().is_some()
    }
}

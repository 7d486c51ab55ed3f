//! Incremental search list: filtering and a single selection cursor over
//! the visible rows.

use crate::entry::Entry;

/// Where an activated URL should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    /// Replace the location of the current tab.
    CurrentTab,
    /// Open a new tab without focusing it.
    BackgroundTab,
}

impl OpenTarget {
    /// Any of control, command/meta or shift held selects a background tab.
    pub fn from_modifiers(ctrl: bool, command: bool, shift: bool) -> Self {
        if ctrl || command || shift {
            OpenTarget::BackgroundTab
        } else {
            OpenTarget::CurrentTab
        }
    }
}

/// Result of committing the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Open { url: String, target: OpenTarget },
    /// Nothing matched; search the web for the raw query in the current tab.
    WebSearch { url: String },
}

/// Build a search engine URL for `query`, keeping its original case.
pub fn web_search_url(engine: &str, query: &str) -> String {
    format!("{engine}{}", urlencoding::encode(query))
}

/// A rendered row. Lowercase projections are computed once here rather
/// than on every keystroke.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub entry: Entry,
    title_lc: String,
    url_lc: String,
    pub visible: bool,
}

impl ListItem {
    fn new(entry: Entry) -> Self {
        Self {
            title_lc: entry.title.to_lowercase(),
            url_lc: entry.url.to_lowercase(),
            entry,
            visible: true,
        }
    }

    /// Visible when there are no terms, or when every term occurs in the
    /// title, or every term occurs in the URL.
    fn matches(&self, terms: &[String]) -> bool {
        terms.is_empty()
            || terms.iter().all(|t| self.title_lc.contains(t.as_str()))
            || terms.iter().all(|t| self.url_lc.contains(t.as_str()))
    }
}

/// Split a query into lowercase, whitespace separated terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

pub struct SearchList {
    items: Vec<ListItem>,
    /// Item indices passing the filter, in render order.
    visible: Vec<usize>,
    /// Item index of the selected row; always a member of `visible`.
    selected: Option<usize>,
    query: String,
    search_engine: String,
    scroll_pending: bool,
}

impl SearchList {
    pub fn new(entries: Vec<Entry>, search_engine: &str) -> Self {
        let mut list = Self {
            items: Vec::new(),
            visible: Vec::new(),
            selected: None,
            query: String::new(),
            search_engine: search_engine.to_string(),
            scroll_pending: false,
        };
        list.extend(entries);
        list
    }

    /// Append rows after the existing ones. The active query is re-applied
    /// and the selection reset to the first visible row.
    pub fn extend(&mut self, entries: Vec<Entry>) {
        self.items.extend(entries.into_iter().map(ListItem::new));
        let query = std::mem::take(&mut self.query);
        self.set_query(&query);
    }

    /// Recompute visibility of every row. The selection is left alone; call
    /// [`SearchList::select_first`] afterwards.
    pub fn filter(&mut self, query: &str) {
        self.query = query.to_string();
        let terms = query_terms(query);
        self.visible.clear();
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.visible = item.matches(&terms);
            if item.visible {
                self.visible.push(idx);
            }
        }
        // a hidden row cannot stay selected
        if self.selected.is_some_and(|i| !self.items[i].visible) {
            self.selected = None;
        }
    }

    /// Filter with `query` and select the first visible row.
    pub fn set_query(&mut self, query: &str) {
        self.filter(query);
        self.select_first();
    }

    pub fn select_first(&mut self) {
        self.select(self.visible.first().copied());
    }

    /// Select the next visible row, wrapping from the last to the first.
    pub fn move_down(&mut self) {
        if let Some(pos) = self.selected() {
            let next = if pos + 1 >= self.visible.len() { 0 } else { pos + 1 };
            self.select(Some(self.visible[next]));
        }
    }

    /// Select the previous visible row, wrapping from the first to the last.
    pub fn move_up(&mut self) {
        if let Some(pos) = self.selected() {
            let prev = if pos == 0 { self.visible.len() - 1 } else { pos - 1 };
            self.select(Some(self.visible[prev]));
        }
    }

    /// Select the row at `pos` within the visible rows. Out of range
    /// positions are ignored.
    pub fn select_visible(&mut self, pos: usize) {
        if let Some(&item) = self.visible.get(pos) {
            self.select(Some(item));
        }
    }

    fn select(&mut self, item: Option<usize>) {
        if item.is_some() && item != self.selected {
            self.scroll_pending = true;
        }
        self.selected = item;
    }

    /// Activate the selected row, or fall back to a web search when the
    /// filter hides everything and the query is not empty.
    pub fn commit(&self, target: OpenTarget) -> Option<Activation> {
        if let Some(entry) = self.selected_entry() {
            return Some(Activation::Open {
                url: entry.url.clone(),
                target,
            });
        }
        if self.visible.is_empty() && !self.query.is_empty() {
            return Some(Activation::WebSearch {
                url: web_search_url(&self.search_engine, &self.query),
            });
        }
        None
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Item indices of the visible rows.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> {
        self.visible.iter().map(|&i| &self.items[i].entry)
    }

    /// Position of the selection within the visible rows.
    pub fn selected(&self) -> Option<usize> {
        // `visible` is in ascending item order
        self.selected
            .and_then(|item| self.visible.binary_search(&item).ok())
    }

    /// Item index of the selected row.
    pub fn selected_item(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selected_item().map(|i| &self.items[i].entry)
    }

    pub fn is_selected(&self, item: usize) -> bool {
        self.selected_item() == Some(item)
    }

    /// True once after each selection change, so the view scrolls the
    /// selected row into range a single time.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}

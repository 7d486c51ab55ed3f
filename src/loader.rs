use crate::bookmarks::{load_bookmarks, BookmarkSource, ChromiumBookmarks};
use crate::entry::Entry;
use crate::history::{get_popular_entries, ChromiumHistory, HistorySource};
use crate::settings::Settings;
use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver};

/// Entries on success, the formatted failure otherwise.
pub type LoadOutcome = Result<Vec<Entry>, String>;

/// Bookmarks followed by popular history URLs that are not bookmarked.
pub fn load_entries(
    bookmarks: &dyn BookmarkSource,
    history: Option<&dyn HistorySource>,
) -> anyhow::Result<Vec<Entry>> {
    let mut entries = load_bookmarks(bookmarks)?;
    if let Some(history) = history {
        let bookmarked: HashSet<String> = entries.iter().map(|e| e.url.clone()).collect();
        entries.extend(get_popular_entries(&bookmarked, history)?);
    }
    Ok(entries)
}

/// Text shown in place of the loading line when the fetch fails.
pub fn error_message(detail: &str) -> String {
    format!("Error loading bookmarks: {detail}")
}

/// Fetch entries on a background thread. Exactly one outcome is sent.
pub fn spawn_loader(settings: &Settings) -> Receiver<LoadOutcome> {
    let (tx, rx) = channel();
    let bookmarks = ChromiumBookmarks::new(settings.bookmarks_path());
    let history = settings
        .include_history
        .then(|| ChromiumHistory::new(settings.history_path()));
    std::thread::spawn(move || {
        let outcome = load_entries(
            &bookmarks,
            history.as_ref().map(|h| h as &dyn HistorySource),
        )
        .map_err(|e| {
            tracing::error!("failed to load entries: {e:#}");
            format!("{e:#}")
        });
        if let Ok(entries) = &outcome {
            tracing::info!(count = entries.len(), "entries loaded");
        }
        let _ = tx.send(outcome);
    });
    rx
}

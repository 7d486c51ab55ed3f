use crate::entry::Entry;
use anyhow::Context;
use rusqlite::{params, Connection, OpenFlags};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Maximum number of records requested from the history source.
pub const HISTORY_QUERY_CAP: usize = 10_000;
/// Maximum number of history entries appended after the bookmarks.
pub const POPULAR_LIMIT: usize = 50;
/// Breadcrumb shown in front of every history entry.
pub const HISTORY_PREFIX: &str = "History";

/// Seconds between 1601-01-01 and 1970-01-01.
const CHROME_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub url: String,
    pub title: String,
    pub visit_count: u32,
}

/// Provider of visited URLs. `start_time_ms` is a unix timestamp in
/// milliseconds; records last visited before it are skipped.
pub trait HistorySource {
    fn search(&self, max_results: usize, start_time_ms: i64) -> anyhow::Result<Vec<HistoryRecord>>;
}

/// Most visited URLs that are not already bookmarked, as list entries.
pub fn get_popular_entries(
    ignored_urls: &HashSet<String>,
    source: &dyn HistorySource,
) -> anyhow::Result<Vec<Entry>> {
    let mut records = source.search(HISTORY_QUERY_CAP, 0)?;
    // stable: equal counts keep source order
    records.sort_by_key(|r| Reverse(r.visit_count));
    let entries: Vec<Entry> = records
        .into_iter()
        .filter(|r| !ignored_urls.contains(&r.url))
        .take(POPULAR_LIMIT)
        .map(|r| Entry::with_prefix(HISTORY_PREFIX, &r.title, &r.url))
        .collect();
    tracing::debug!(count = entries.len(), "selected popular history entries");
    Ok(entries)
}

static COPY_SEQ: AtomicUsize = AtomicUsize::new(0);

/// History stored in a Chromium profile `History` SQLite database.
pub struct ChromiumHistory {
    pub path: PathBuf,
}

impl ChromiumHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistorySource for ChromiumHistory {
    fn search(&self, max_results: usize, start_time_ms: i64) -> anyhow::Result<Vec<HistoryRecord>> {
        // The browser keeps the live database locked; read a private copy.
        let copy = std::env::temp_dir().join(format!(
            "bookmark-popup-history-{}-{}.db",
            std::process::id(),
            COPY_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::copy(&self.path, &copy)
            .with_context(|| format!("failed to copy {}", self.path.display()))?;
        let result = query_history(&copy, max_results, start_time_ms);
        if let Err(e) = std::fs::remove_file(&copy) {
            tracing::warn!("failed to remove {}: {e}", copy.display());
        }
        result.with_context(|| format!("failed to read history from {}", self.path.display()))
    }
}

fn query_history(
    db: &Path,
    max_results: usize,
    start_time_ms: i64,
) -> anyhow::Result<Vec<HistoryRecord>> {
    let conn = Connection::open_with_flags(db, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare(
        "SELECT url, title, visit_count FROM urls \
         WHERE last_visit_time >= ?1 \
         ORDER BY last_visit_time DESC \
         LIMIT ?2",
    )?;
    let limit = i64::try_from(max_results).unwrap_or(i64::MAX);
    let rows = stmt.query_map(params![to_chrome_time(start_time_ms), limit], |row| {
        Ok(HistoryRecord {
            url: row.get(0)?,
            title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            visit_count: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Convert unix milliseconds to Chromium's microseconds since 1601.
pub fn to_chrome_time(unix_ms: i64) -> i64 {
    (unix_ms + CHROME_EPOCH_OFFSET_SECS * 1000) * 1000
}

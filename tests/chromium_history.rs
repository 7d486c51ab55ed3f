use bookmark_popup::history::{get_popular_entries, to_chrome_time, ChromiumHistory, HistorySource};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;
use tempfile::tempdir;

fn write_db(path: &Path, rows: &[(&str, Option<&str>, u32, i64)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
         visit_count INTEGER DEFAULT 0 NOT NULL, last_visit_time INTEGER NOT NULL)",
    )
    .unwrap();
    for (url, title, visits, visited_ms) in rows {
        conn.execute(
            "INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES (?1, ?2, ?3, ?4)",
            params![url, title, visits, to_chrome_time(*visited_ms)],
        )
        .unwrap();
    }
}

#[test]
fn reads_records_from_copy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("History");
    write_db(
        &path,
        &[
            ("https://old.example/", Some("Old"), 9, 1_000),
            ("https://new.example/", None, 2, 5_000),
        ],
    );

    let records = ChromiumHistory::new(&path).search(10, 0).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].url, "https://new.example/");
    assert_eq!(records[0].title, "");
    assert_eq!(records[1].visit_count, 9);
    assert!(path.exists());
}

#[test]
fn respects_limit_and_start_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("History");
    write_db(
        &path,
        &[
            ("https://a/", Some("A"), 1, 1_000),
            ("https://b/", Some("B"), 1, 2_000),
            ("https://c/", Some("C"), 1, 3_000),
        ],
    );
    let source = ChromiumHistory::new(&path);
    assert_eq!(source.search(2, 0).unwrap().len(), 2);
    let recent = source.search(10, 2_000).unwrap();
    let urls: Vec<&str> = recent.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://c/", "https://b/"]);
}

#[test]
fn popular_entries_from_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("History");
    write_db(
        &path,
        &[
            ("https://bookmarked/", Some("Saved"), 50, 1_000),
            ("https://rare/", Some("Rare"), 1, 2_000),
            ("https://often/", Some("Often"), 20, 3_000),
        ],
    );
    let ignored: HashSet<String> = ["https://bookmarked/".to_string()].into_iter().collect();
    let entries = get_popular_entries(&ignored, &ChromiumHistory::new(&path)).unwrap();
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["History => Often", "History => Rare"]);
}

#[test]
fn missing_database_is_an_error() {
    let dir = tempdir().unwrap();
    let err = ChromiumHistory::new(dir.path().join("History"))
        .search(10, 0)
        .unwrap_err();
    assert!(format!("{err:#}").contains("History"));
}

use serde::{Deserialize, Serialize};

/// Separator placed between breadcrumb segments and the entry title.
pub const SEPARATOR: &str = " => ";

/// A flattened bookmark or history record shown as one row of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub url: String,
}

impl Entry {
    /// Build an entry whose title is `prefix => title`, falling back to the
    /// URL when `title` is empty and dropping the prefix when it is empty.
    pub fn with_prefix(prefix: &str, title: &str, url: &str) -> Self {
        let name = if title.is_empty() { url } else { title };
        let title = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}{SEPARATOR}{name}")
        };
        Self {
            title,
            url: url.to_string(),
        }
    }
}

use crate::entry::{Entry, SEPARATOR};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One node of a bookmark tree: a folder when `children` is present,
/// otherwise a bookmark when `url` is set.
///
/// Accepts both the browser API shape (`title`) and the Chromium profile
/// file shape (`name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn folder(title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            title: Some(title.to_string()),
            url: None,
            children: Some(children),
        }
    }

    pub fn bookmark(title: &str, url: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            children: None,
        }
    }

    /// Children win over `url`: a node carrying both is still a folder.
    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Flatten the top-level folders of a bookmark tree into entries, in
/// pre-order. Top-level folder names never appear in breadcrumbs.
pub fn flatten(roots: &[BookmarkNode]) -> Vec<Entry> {
    let mut out = Vec::new();
    for node in roots {
        visit(node, "", 0, &mut out);
    }
    out
}

fn visit(node: &BookmarkNode, prefix: &str, level: usize, out: &mut Vec<Entry>) {
    if let Some(children) = &node.children {
        let child_prefix = if level == 0 {
            String::new()
        } else if prefix.is_empty() {
            node.title_str().to_string()
        } else {
            format!("{prefix}{SEPARATOR}{}", node.title_str())
        };
        for child in children {
            visit(child, &child_prefix, level + 1, out);
        }
    } else if let Some(url) = node.url.as_deref().filter(|u| !u.is_empty()) {
        out.push(Entry::with_prefix(prefix, node.title_str(), url));
    }
}

/// Provider of the bookmark tree. The returned node is the root whose
/// children are flattened.
pub trait BookmarkSource {
    fn tree(&self) -> anyhow::Result<BookmarkNode>;
}

/// Fetch the tree from `source` and flatten it.
pub fn load_bookmarks(source: &dyn BookmarkSource) -> anyhow::Result<Vec<Entry>> {
    let root = source.tree()?;
    let entries = flatten(root.children.as_deref().unwrap_or_default());
    tracing::debug!(count = entries.len(), "flattened bookmarks");
    Ok(entries)
}

#[derive(Deserialize)]
struct ChromiumFile {
    roots: ChromiumRoots,
}

#[derive(Deserialize)]
struct ChromiumRoots {
    bookmark_bar: Option<BookmarkNode>,
    other: Option<BookmarkNode>,
    synced: Option<BookmarkNode>,
}

/// Bookmarks stored in a Chromium profile `Bookmarks` file.
pub struct ChromiumBookmarks {
    pub path: PathBuf,
}

impl ChromiumBookmarks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BookmarkSource for ChromiumBookmarks {
    fn tree(&self) -> anyhow::Result<BookmarkNode> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let file: ChromiumFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        let ChromiumRoots {
            bookmark_bar,
            other,
            synced,
        } = file.roots;
        let children = [bookmark_bar, other, synced].into_iter().flatten().collect();
        Ok(BookmarkNode {
            title: None,
            url: None,
            children: Some(children),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn top_level_folder_adds_no_prefix() {
        let tree = vec![BookmarkNode::folder(
            "A",
            vec![BookmarkNode::folder(
                "C",
                vec![BookmarkNode::bookmark("B", "https://two.example")],
            )],
        )];
        let entries = flatten(&tree);
        assert_eq!(titles(&entries), vec!["C => B"]);
        assert_eq!(entries[0].url, "https://two.example");
    }

    #[test]
    fn nested_folders_join_with_separator() {
        let tree = vec![BookmarkNode::folder(
            "Bookmarks Bar",
            vec![
                BookmarkNode::bookmark("Top", "https://top.example"),
                BookmarkNode::folder(
                    "Dev",
                    vec![BookmarkNode::folder(
                        "Rust",
                        vec![BookmarkNode::bookmark("", "https://doc.rust-lang.org")],
                    )],
                ),
            ],
        )];
        assert_eq!(
            titles(&flatten(&tree)),
            vec!["Top", "Dev => Rust => https://doc.rust-lang.org"]
        );
    }

    #[test]
    fn folder_with_url_is_still_a_folder() {
        let mut folder = BookmarkNode::folder(
            "Mixed",
            vec![BookmarkNode::bookmark("Inner", "https://inner.example")],
        );
        folder.url = Some("https://folder.example".into());
        let tree = vec![BookmarkNode::folder("root", vec![folder])];
        let entries = flatten(&tree);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Mixed => Inner");
    }

    #[test]
    fn duplicates_are_kept_in_traversal_order() {
        let tree = vec![
            BookmarkNode::folder("one", vec![BookmarkNode::bookmark("x", "https://x")]),
            BookmarkNode::folder("two", vec![BookmarkNode::bookmark("x", "https://x")]),
        ];
        let entries = flatten(&tree);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entries[1]);
    }

    #[test]
    fn nodes_without_url_or_children_are_skipped() {
        let tree = vec![BookmarkNode::folder(
            "root",
            vec![
                BookmarkNode::default(),
                BookmarkNode::folder("Empty", Vec::new()),
                BookmarkNode::bookmark("kept", "https://kept"),
            ],
        )];
        assert_eq!(titles(&flatten(&tree)), vec!["kept"]);
    }
}

//! Document discovery under the root folder.
//!
//! The index is rebuilt from disk on every call. Paths are always reported relative to the
//! root and joined with `/`, independent of the host separator.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tokio::fs;

pub const DOCUMENT_EXTENSION: &str = ".md";
pub const ALL_GROUP: &str = "All";
pub const ROOT_GROUP: &str = "Root";

/// Lists every `.md` file below `root`, sorted by relative path.
///
/// A missing or unreadable root yields an empty list. Unreadable subdirectories are skipped.
pub async fn list_documents(root: &Path) -> Vec<String> {
    let mut documents = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), String::new())];

    while let Some((directory, prefix)) = pending.pop() {
        let mut entries = match fs::read_dir(&directory).await {
            Ok(entries) => entries,
            Err(error) => {
                log::warn!("skipping unreadable directory {}: {error}", directory.display());
                continue;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(error) => {
                    log::warn!("stopped reading {}: {error}", directory.display());
                    break;
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                log::debug!("skipping non UTF-8 entry in {}", directory.display());
                continue;
            };
            let relative = format!("{prefix}{name}");

            // `metadata` follows symlinks, so linked directories are descended as well.
            let Ok(metadata) = fs::metadata(entry.path()).await else {
                continue;
            };

            if metadata.is_dir() {
                pending.push((entry.path(), format!("{relative}/")));
            } else if metadata.is_file() && name.ends_with(DOCUMENT_EXTENSION) {
                documents.push(relative);
            }
        }
    }

    documents.sort();
    documents
}

/// Borrowed view of one relative document path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef<'a>(&'a str);

impl<'a> DocumentRef<'a> {
    pub fn new(path: &'a str) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &'a str {
        self.0
    }

    pub fn file_name(&self) -> &'a str {
        self.0.rsplit('/').next().unwrap_or(self.0)
    }

    /// First path segment, or [`ROOT_GROUP`] for documents directly under the root.
    pub fn group(&self) -> &'a str {
        match self.0.split_once('/') {
            Some((group, _)) => group,
            None => ROOT_GROUP,
        }
    }
}

/// Documents grouped by top-level directory.
///
/// Iterates as `All`, `Root`, then the named groups in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentGroups {
    all: Vec<String>,
    root: Vec<String>,
    named: BTreeMap<String, Vec<String>>,
}

impl DocumentGroups {
    pub fn get(&self, group: &str) -> Option<&[String]> {
        match group {
            ALL_GROUP => Some(self.all.as_slice()),
            ROOT_GROUP => Some(self.root.as_slice()),
            _ => self.named.get(group).map(Vec::as_slice),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        [(ALL_GROUP, self.all.as_slice()), (ROOT_GROUP, self.root.as_slice())]
            .into_iter()
            .chain(
                self.named
                    .iter()
                    .map(|(name, paths)| (name.as_str(), paths.as_slice())),
            )
    }

    /// Number of groups, the synthetic ones included.
    pub fn group_count(&self) -> usize {
        2 + self.named.len()
    }

    pub fn document_count(&self) -> usize {
        self.all.len()
    }
}

pub fn group_by_top_level(paths: &[String]) -> DocumentGroups {
    let mut groups = DocumentGroups {
        all: paths.to_vec(),
        ..DocumentGroups::default()
    };

    for path in paths {
        match DocumentRef::new(path).group() {
            ROOT_GROUP => groups.root.push(path.clone()),
            // Only reachable through the synthetic group.
            ALL_GROUP => {}
            group => groups
                .named
                .entry(group.to_string())
                .or_default()
                .push(path.clone()),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use tempfile::TempDir;

    use super::*;

    fn docs_tree(files: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        for file in files {
            let path = root.path().join(file);
            create_dir_all(path.parent().unwrap()).unwrap();
            write(path, "# doc").unwrap();
        }
        root
    }

    #[rocket::async_test]
    async fn lists_nested_documents_sorted() {
        let root = docs_tree(&["README.md", "notes/ideas.md", "notes/draft/todo.md"]);

        assert_eq!(
            list_documents(root.path()).await,
            ["README.md", "notes/draft/todo.md", "notes/ideas.md"]
        );
    }

    #[rocket::async_test]
    async fn ignores_other_files() {
        let root = docs_tree(&["a.md", "b.txt", "c.md.bak", "img/logo.png", "img/d.md"]);

        assert_eq!(list_documents(root.path()).await, ["a.md", "img/d.md"]);
    }

    #[rocket::async_test]
    async fn missing_root_is_empty() {
        let root = TempDir::new().unwrap();

        assert!(list_documents(&root.path().join("nope")).await.is_empty());
    }

    #[rocket::async_test]
    async fn repeated_scans_agree() {
        let root = docs_tree(&["z.md", "b/a.md", "a/z/y.md", "a/b.md", "a-b/c.md"]);

        let first = list_documents(root.path()).await;
        let mut sorted = first.clone();
        sorted.sort();

        assert_eq!(first, sorted);
        assert_eq!(first, list_documents(root.path()).await);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn document_ref_parts() {
        let nested = DocumentRef::new("notes/draft/todo.md");
        let top = DocumentRef::new("README.md");

        assert_eq!(nested.file_name(), "todo.md");
        assert_eq!(nested.group(), "notes");
        assert_eq!(top.file_name(), "README.md");
        assert_eq!(top.group(), ROOT_GROUP);
    }

    #[test]
    fn groups_follow_first_segment() {
        let paths: Vec<String> = ["README.md", "notes/draft/todo.md", "notes/ideas.md"]
            .map(String::from)
            .into();
        let groups = group_by_top_level(&paths);

        assert_eq!(groups.get(ALL_GROUP).unwrap(), paths.as_slice());
        assert_eq!(groups.get(ROOT_GROUP).unwrap(), ["README.md"]);
        assert_eq!(
            groups.get("notes").unwrap(),
            ["notes/draft/todo.md", "notes/ideas.md"]
        );
        assert_eq!(
            groups.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            [ALL_GROUP, ROOT_GROUP, "notes"]
        );
    }

    #[test]
    fn empty_index_keeps_synthetic_groups() {
        let groups = group_by_top_level(&[]);

        assert_eq!(groups.document_count(), 0);
        assert_eq!(groups.group_count(), 2);
        assert_eq!(groups.get(ALL_GROUP).unwrap().len(), 0);
        assert_eq!(groups.get(ROOT_GROUP).unwrap().len(), 0);
    }
}

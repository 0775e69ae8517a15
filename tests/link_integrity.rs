use std::{
    collections::{HashMap, HashSet},
    fs::{create_dir_all, write},
    path::PathBuf,
};

use docs_browser::{build_rocket, config::SiteConfig};
use rocket::{http::Status, local::blocking::Client};
use scraper::{Html, Selector};
use tempfile::TempDir;

const REMOTE_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

const DOCUMENTS: &[(&str, &str)] = &[
    (
        "README.md",
        "# Welcome\n\nStart with [ideas](/doc/notes/ideas.md) or jump to [usage](#usage).\n\n## Usage\n\nSee https://example.com too.",
    ),
    ("notes/ideas.md", "# Ideas\n\n## Setup\n\n## Setup\n\n[Back](/)"),
    ("notes/draft/todo list.md", "# Todo\n\n- [ ] link [readme](/doc/README.md#welcome)"),
    ("guides/intro.md", "# Intro\n\n```rust\nfn main() {}\n```"),
];

struct LinkChecker {
    _docs: TempDir,
    client: Client,
    anchor: Selector,
    stylesheet: Selector,
    any: Selector,
}

impl LinkChecker {
    fn new() -> Self {
        let docs = TempDir::new().unwrap();
        for (path, content) in DOCUMENTS {
            let path = docs.path().join(path);
            create_dir_all(path.parent().unwrap()).unwrap();
            write(path, content).unwrap();
        }

        let config = SiteConfig {
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
            ..SiteConfig::new(docs.path())
        };

        Self {
            _docs: docs,
            client: Client::tracked(build_rocket(config)).unwrap(),
            anchor: Selector::parse("a[href]").unwrap(),
            stylesheet: Selector::parse("link[href]").unwrap(),
            any: Selector::parse("*").unwrap(),
        }
    }

    fn get(&self, path: &str) -> (Status, Option<Html>) {
        let response = self.client.get(path.to_string()).dispatch();
        let status = response.status();
        let html = (status == Status::Ok)
            .then(|| response.into_string())
            .flatten()
            .map(|body| Html::parse_document(&body));
        (status, html)
    }

    fn contains_id(&self, doc: &Html, id: &str) -> bool {
        doc.select(&self.any).any(|el| el.attr("id") == Some(id))
    }

    fn find_duplicate_ids(&self, doc: &Html, url: &str) -> Vec<String> {
        let mut seen = HashMap::new();
        for element in doc.select(&self.any) {
            if let Some(id) = element.attr("id") {
                *seen.entry(id.to_owned()).or_insert(0u32) += 1;
            }
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, count)| format!("[{url}] duplicate id '{id}' appears {count} times"))
            .collect()
    }

    fn local_links(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.anchor)
            .filter_map(|element| element.attr("href"))
            .filter(|href| !REMOTE_SCHEMES.iter().any(|scheme| href.starts_with(scheme)))
            .map(str::to_owned)
            .collect()
    }

    fn check_link(&self, from: &str, href: &str, current_doc: &Html) -> Option<String> {
        let err = |msg: &str| format!("[{from}] '{href}' -> {msg}");
        let (page, anchor) = match href.split_once('#') {
            Some(("", anchor)) => (None, Some(anchor)),
            Some((page, anchor)) => (Some(page), Some(anchor).filter(|a| !a.is_empty())),
            None => (Some(href), None),
        };

        let fetched;
        let doc = match page {
            Some(page) => match self.get(page) {
                (_, Some(doc)) => {
                    fetched = doc;
                    &fetched
                }
                (status, None) => return Some(err(&format!("page returned {status}"))),
            },
            None => current_doc,
        };

        anchor
            .filter(|id| !self.contains_id(doc, id))
            .map(|id| err(&format!("#{id} not found")))
    }

    /// Follows local links breadth first from `/`, returning every broken link found.
    fn crawl(&self) -> (Vec<String>, HashSet<String>) {
        let mut visited = HashSet::new();
        let mut queue = vec!["/".to_string()];
        let mut errors = Vec::new();

        while let Some(url) = queue.pop() {
            if !visited.insert(url.clone()) {
                continue;
            }

            let (status, doc) = self.get(&url);
            let Some(doc) = doc else {
                errors.push(format!("[{url}] page returned {status}"));
                continue;
            };

            errors.extend(self.find_duplicate_ids(&doc, &url));

            for element in doc.select(&self.stylesheet) {
                if let Some(href) = element.attr("href") {
                    let status = self.client.get(href.to_string()).dispatch().status();
                    if status != Status::Ok {
                        errors.push(format!("[{url}] '{href}' -> resource returned {status}"));
                    }
                }
            }

            for href in self.local_links(&doc) {
                errors.extend(self.check_link(&url, &href, &doc));
                if let Some(page) = href.split('#').next().filter(|page| !page.is_empty()) {
                    queue.push(page.to_string());
                }
            }
        }

        (errors, visited)
    }
}

#[test]
fn all_links_resolve() {
    let checker = LinkChecker::new();
    let (failures, visited) = checker.crawl();

    assert!(
        failures.is_empty(),
        "\n\n{} broken link(s):\n  - {}\n",
        failures.len(),
        failures.join("\n  - ")
    );
    // Index plus every document.
    assert_eq!(visited.len(), DOCUMENTS.len() + 1);
    assert!(visited.contains("/doc/notes/draft/todo%20list.md"));
}

//! Full HTML pages around the index and rendered documents.

use rocket::http::Status;

use crate::{
    html::{encode_path, escape_html},
    indexer::{DocumentGroups, DocumentRef, ALL_GROUP},
    template::fill_template,
};

const SITE_TITLE: &str = "Documents";

const INDEX_TEMPLATE: &str = include_str!("../assets/templates/index.html");
const DOCUMENT_TEMPLATE: &str = include_str!("../assets/templates/document.html");
const STATUS_TEMPLATE: &str = include_str!("../assets/templates/status.html");
const FILTER_SCRIPT: &str = include_str!("../assets/js/filter.js");

pub fn document_url(path: &str) -> String {
    format!("/doc/{}", encode_path(path))
}

/// The listing page: search box, one tab per group and every document entry.
pub fn index_page(paths: &[String], groups: &DocumentGroups) -> String {
    let summary = match paths.len() {
        1 => "1 document".to_string(),
        count => format!("{count} documents"),
    };

    let body = if paths.is_empty() {
        "    <p class=\"placeholder\">No documents found. Add Markdown files to the docs folder.</p>"
            .to_string()
    } else {
        let mut body = String::new();
        body.push_str(concat!(
            "    <input id=\"search\" type=\"search\" placeholder=\"Search documents (Ctrl+K)\"",
            " autocomplete=\"off\" autofocus>\n",
        ));
        body.push_str(&render_tabs(groups));
        body.push_str(&render_entries(paths));
        body.push_str("    <p id=\"no-results\" hidden>No documents match your search.</p>");
        body
    };

    fill_template(
        INDEX_TEMPLATE,
        &[
            ("title", SITE_TITLE),
            ("summary", &summary),
            ("body", &body),
            ("script", FILTER_SCRIPT),
        ],
    )
}

fn render_tabs(groups: &DocumentGroups) -> String {
    let mut tabs = String::from("    <div class=\"tabs\">\n");
    for (name, paths) in groups.iter() {
        let active = if name == ALL_GROUP { " active" } else { "" };
        let name = escape_html(name);
        tabs.push_str(&format!(
            "      <button class=\"tab{active}\" type=\"button\" data-group=\"{name}\">{name}<span class=\"count\">{}</span></button>\n",
            paths.len()
        ));
    }
    tabs.push_str("    </div>\n");
    tabs
}

fn render_entries(paths: &[String]) -> String {
    let mut entries = String::from("    <ul id=\"documents\">\n");
    for path in paths {
        let document = DocumentRef::new(path);
        entries.push_str(&format!(
            "      <li class=\"doc\" data-name=\"{}\" data-path=\"{}\" data-group=\"{}\"><a href=\"{}\">{}</a><span class=\"path\">{}</span></li>\n",
            escape_html(&document.file_name().to_lowercase()),
            escape_html(&document.path().to_lowercase()),
            escape_html(document.group()),
            escape_html(&document_url(path)),
            escape_html(document.file_name()),
            escape_html(path),
        ));
    }
    entries.push_str("    </ul>\n");
    entries
}

pub fn document_page(path: &str, html: &str) -> String {
    let path = escape_html(path);
    let title = format!("{path} | {SITE_TITLE}");
    fill_template(
        DOCUMENT_TEMPLATE,
        &[("title", &title), ("path", &path), ("html", html)],
    )
}

pub fn status_page(status: Status) -> String {
    let message = match status.code {
        403 => "Access denied: that path is outside the documents folder.",
        404 => "That document could not be found.",
        500 => "Something went wrong while reading that document.",
        _ => status.reason().unwrap_or("Unexpected error."),
    };
    let code = status.code.to_string();

    fill_template(
        STATUS_TEMPLATE,
        &[
            ("code", &code),
            ("reason", status.reason().unwrap_or_default()),
            ("message", message),
        ],
    )
}

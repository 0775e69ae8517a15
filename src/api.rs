use std::path::{Path, PathBuf};

use rocket::{
    fs::NamedFile,
    get,
    http::{
        uri::{fmt, Segments},
        Status,
    },
    request::FromSegments,
    response::content::RawHtml,
    serde::json::Json,
    Request, State,
};

use crate::{
    config::SiteConfig,
    error::DocumentError,
    indexer::{group_by_top_level, list_documents},
    markdown::render_document,
    pages,
    search::{filter_documents, FilterState, SearchMatch},
};

/// The percent-decoded remainder of a `/doc/...` URL, joined with `/`.
///
/// No normalization happens here; [`resolve_document_path`] decides what it points at.
#[derive(Debug)]
pub struct DocumentPath(String);

impl<'r> FromSegments<'r> for DocumentPath {
    type Error = std::convert::Infallible;

    fn from_segments(segments: Segments<'r, fmt::Path>) -> Result<Self, Self::Error> {
        Ok(Self(segments.collect::<Vec<_>>().join("/")))
    }
}

/// Lexically resolves `requested` against the document root.
///
/// Returns the normalized relative path, or [`DocumentError::Forbidden`] when a `..`
/// segment would climb above the root.
pub fn resolve_document_path(requested: &str) -> Result<String, DocumentError> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in requested.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                if segments.pop().is_none() {
                    return Err(DocumentError::Forbidden(requested.to_string()));
                }
            }
            segment => segments.push(segment),
        }
    }

    Ok(segments.join("/"))
}

#[get("/")]
pub async fn index(config: &State<SiteConfig>) -> RawHtml<String> {
    let documents = list_documents(&config.root).await;
    let groups = group_by_top_level(&documents);
    RawHtml(pages::index_page(&documents, &groups))
}

#[get("/doc/<path..>")]
pub async fn document(
    path: DocumentPath,
    config: &State<SiteConfig>,
) -> Result<RawHtml<String>, DocumentError> {
    let relative = resolve_document_path(&path.0)?;
    let file_path = config.root.join(&relative);

    let markdown = tokio::fs::read_to_string(&file_path)
        .await
        .map_err(|error| DocumentError::from_read(file_path, error))?;

    Ok(RawHtml(pages::document_page(
        &relative,
        &render_document(&markdown),
    )))
}

#[get("/search?<query>&<group>")]
pub async fn search(
    query: Option<&str>,
    group: Option<&str>,
    config: &State<SiteConfig>,
) -> Json<Vec<SearchMatch>> {
    let documents = list_documents(&config.root).await;
    Json(filter_documents(&documents, &FilterState::new(group, query)))
}

#[get("/static/<path..>")]
pub async fn static_file(path: PathBuf, config: &State<SiteConfig>) -> Option<NamedFile> {
    NamedFile::open(Path::new(&config.static_dir).join(path))
        .await
        .ok()
}

#[catch(403)]
pub fn forbidden() -> RawHtml<String> {
    RawHtml(pages::status_page(Status::Forbidden))
}

#[catch(404)]
pub fn not_found() -> RawHtml<String> {
    RawHtml(pages::status_page(Status::NotFound))
}

#[catch(default)]
pub fn server_error(status: Status, _: &Request<'_>) -> RawHtml<String> {
    RawHtml(pages::status_page(status))
}

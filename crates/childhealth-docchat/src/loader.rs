//! Reference document loading.
//!
//! PDFs are read page by page with lopdf. Plain-text files (`.txt`, `.md`)
//! are accepted as a single page, which keeps local fixtures simple.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::{DocChatError, Result};

/// Text of one page of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    pub source: String,
    /// 1-based page number.
    pub page: u32,
    pub text: String,
}

/// Load one document.
pub fn load_document(path: &Path) -> Result<Vec<SourcePage>> {
    let source = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => load_pdf(path, &source),
        "txt" | "md" => {
            let text = std::fs::read_to_string(path)?;
            Ok(vec![SourcePage { source, page: 1, text }])
        }
        _ => Err(DocChatError::Unsupported(source)),
    }
}

fn load_pdf(path: &Path, source: &str) -> Result<Vec<SourcePage>> {
    let doc = lopdf::Document::load(path)?;
    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys().copied() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => pages.push(SourcePage { source: source.to_string(), page: page_num, text }),
            Err(e) => debug!(source, page = page_num, error = %e, "skipping unreadable page"),
        }
    }
    Ok(pages)
}

/// Load every document that can be read; missing or broken files are logged
/// and skipped. Pages with no text are dropped.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Vec<SourcePage> {
    let mut out = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "document not found");
            continue;
        }
        match load_document(path) {
            Ok(pages) => {
                let before = out.len();
                out.extend(pages.into_iter().filter(|p| !p.text.trim().is_empty()));
                info!(path = %path.display(), pages = out.len() - before, "document loaded");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load document"),
        }
    }
    out
}

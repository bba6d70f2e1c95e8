use crate::error::IngestError;
use crate::models::{DiscoveredDocument, DocumentKind, LoadedDocument};
use chrono::Utc;
use lopdf::Document;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Resolve the document kind from the file extension. Unknown extensions
/// are rejected rather than sniffed.
pub fn document_kind(path: &Path) -> Result<DocumentKind, IngestError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => Ok(DocumentKind::Pdf),
        "docx" => Ok(DocumentKind::Docx),
        _ => Err(IngestError::UnsupportedFormat(format!(
            "{} (expected .pdf or .docx)",
            path.display()
        ))),
    }
}

/// Extract the plain text of a document, dispatching on its extension.
pub fn load_document(path: &Path) -> Result<LoadedDocument, IngestError> {
    let kind = document_kind(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IngestError::MissingFileName(path.display().to_string()))?
        .to_string();

    let text = match kind {
        DocumentKind::Pdf => load_pdf_text(path)?,
        DocumentKind::Docx => load_docx_text(path)?,
    };

    Ok(LoadedDocument {
        file_name,
        source_path: path.to_string_lossy().to_string(),
        text: text.trim().to_string(),
        loaded_at: Utc::now(),
    })
}

fn load_pdf_text(path: &Path) -> Result<String, IngestError> {
    let document =
        Document::load(path).map_err(|error| IngestError::PdfParse(error.to_string()))?;

    let mut text = String::new();
    for (page_no, _page_id) in document.get_pages() {
        let page_text = document
            .extract_text(&[page_no])
            .map_err(|error| IngestError::PdfParse(error.to_string()))?;

        if !page_text.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&page_text);
        }
    }

    Ok(text)
}

fn load_docx_text(path: &Path) -> Result<String, IngestError> {
    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|error| IngestError::DocxParse(error.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|error| IngestError::DocxParse(error.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|error| IngestError::DocxParse(error.to_string()))?;

    extract_docx_xml_text(&xml)
}

/// Pull the visible text runs out of an OOXML `word/document.xml` body.
/// Paragraph ends become newlines; breaks and tabs become spaces.
pub fn extract_docx_xml_text(xml: &str) -> Result<String, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) if element.name().as_ref() == b"w:t" => {
                in_text_run = true;
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(element))
                if matches!(element.name().as_ref(), b"w:br" | b"w:tab") =>
            {
                text.push(' ');
            }
            Ok(Event::Text(run)) if in_text_run => {
                let piece = run
                    .unescape()
                    .map_err(|error| IngestError::DocxParse(error.to_string()))?;
                text.push_str(&piece);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => return Err(IngestError::DocxParse(error.to_string())),
        }
    }

    Ok(text.trim().to_string())
}

/// Walk a folder recursively for supported documents, sorted by path.
pub fn discover_documents(folder: &Path) -> Vec<DiscoveredDocument> {
    let mut found = Vec::new();

    for entry in WalkDir::new(folder).into_iter().filter_map(|item| item.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(kind) = document_kind(entry.path()) else {
            continue;
        };

        let size_bytes = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
        found.push(DiscoveredDocument {
            path: entry.path().to_path_buf(),
            kind,
            size_bytes,
        });
    }

    found.sort_unstable_by(|left, right| left.path.cmp(&right.path));
    found
}

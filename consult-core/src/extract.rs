//! Text extraction from uploaded feedback documents.
//!
//! PDF pages are extracted in document order with `lopdf`; DOCX paragraphs
//! are pulled out of `word/document.xml` inside the zip container. Both
//! operate on the uploaded bytes directly, no temp files.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Failure reading or parsing an uploaded document.
///
/// Aborts only the submission the upload belongs to, never the process.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),
}

/// Document format hint, taken from the uploaded filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Determine the format from a filename extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".docx") || lower.ends_with(".doc") {
            Self::Docx
        } else {
            Self::Unsupported
        }
    }
}

/// Extract the textual content of an uploaded document.
///
/// Returns `Ok(None)` for unsupported formats (nothing to append, not an
/// error) and `Err` when the file is corrupt or unreadable.
pub fn extract_text(
    bytes: &[u8],
    format: DocumentFormat,
) -> Result<Option<String>, ExtractionError> {
    match format {
        DocumentFormat::Pdf => extract_pdf_text(bytes).map(Some),
        DocumentFormat::Docx => extract_docx_text(bytes).map(Some),
        DocumentFormat::Unsupported => Ok(None),
    }
}

/// Extract per-page text from a PDF, newline-joined in page order.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        lopdf::Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        let page_text = document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        pages.push(page_text.trim_end().to_string());
    }

    Ok(pages.join("\n"))
}

/// Extract per-paragraph text from a DOCX, newline-joined in document order.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    parse_docx_paragraphs(&xml)
}

/// Walk the WordprocessingML body collecting `w:t` runs per `w:p` paragraph.
fn parse_docx_paragraphs(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => {
                in_text_run = true;
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"t" => {
                in_text_run = false;
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ExtractionError::Docx(e.to_string())),
        }
    }

    // A trailing run outside any closed paragraph still counts.
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

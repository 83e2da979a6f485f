use docx_rs::{read_docx, DocumentChild};
use domain::models::DocumentPage;
use shared::error::RagError;
use shared::types::Result;
use shared::utils::{extension_of, is_supported_document};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// Raw text extraction for the formats ingestion accepts.
pub struct DocumentLoader;

impl DocumentLoader {
    /// PDFs yield one entry per page; other formats a single unnumbered one.
    pub fn load(path: &Path) -> Result<Vec<DocumentPage>> {
        if !path.is_file() {
            return Err(RagError::ResourceNotFound(path.to_path_buf()));
        }
        if !is_supported_document(path) {
            return Err(RagError::config(format!(
                "unsupported document '{}'; expected .pdf, .docx, .txt or .md",
                path.display()
            )));
        }

        let pages = match extension_of(path).as_str() {
            "pdf" => Self::pdf_pages(path)?,
            "docx" => vec![DocumentPage {
                page: None,
                text: Self::docx_text(path)?,
            }],
            _ => {
                let bytes = std::fs::read(path)
                    .map_err(|e| RagError::Extraction(format!("{}: {e}", path.display())))?;
                // Lossy conversion keeps stray non-UTF8 bytes from failing ingestion.
                vec![DocumentPage {
                    page: None,
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                }]
            }
        };

        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(RagError::EmptyContent(format!(
                "no text could be extracted from '{}'",
                path.display()
            )));
        }
        Ok(pages)
    }

    fn pdf_pages(path: &Path) -> Result<Vec<DocumentPage>> {
        // pdf-extract panics on some malformed files instead of returning Err.
        let extracted = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(path)))
            .map_err(|panic| {
                RagError::Extraction(format!(
                    "{}: PDF parser panicked: {}",
                    path.display(),
                    panic_message(panic.as_ref())
                ))
            })?
            .map_err(|e| RagError::Extraction(format!("{}: {e}", path.display())))?;
        Ok(extracted
            .into_iter()
            .enumerate()
            .map(|(page, text)| DocumentPage {
                page: Some(page),
                text,
            })
            .collect())
    }

    fn docx_text(path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)
            .map_err(|e| RagError::Extraction(format!("{}: {e}", path.display())))?;
        let docx = read_docx(&bytes)
            .map_err(|e| RagError::Extraction(format!("{}: {e}", path.display())))?;
        let mut text = String::new();
        for child in &docx.document.children {
            // Tables and drawings carry no paragraph text at this level.
            if let DocumentChild::Paragraph(p) = child {
                text.push_str(&p.raw_text());
                text.push('\n');
            }
        }
        Ok(text)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

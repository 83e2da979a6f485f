use std::path::Path;

/// Lowercased file extension, empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

pub fn is_supported_document(path: &Path) -> bool {
    matches!(extension_of(path).as_str(), "pdf" | "docx" | "txt" | "md")
}

//! Resume text preparation for uploads that arrive as PDF.

use crate::workflow::session::Precondition;

/// Trims every line and drops blank ones.
pub fn clean_resume_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts and cleans the text of every page. Blocking; callers on the
/// async runtime should go through `spawn_blocking`.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, Precondition> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| Precondition::UnreadablePdf(e.to_string()))?;
    Ok(clean_resume_text(&raw))
}

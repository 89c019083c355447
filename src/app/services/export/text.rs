use crate::app::domain::Document;

pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Plain-text export: metadata header, raw page text, footer line.
/// Page text is emitted exactly as typed, delimiters included.
pub fn export_text(doc: &Document) -> String {
    let pages = doc
        .content
        .pages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_BREAK);

    format!(
        "Title: {}\nAuthor: {}\nDate: {}\n\n{}\n\nFooter: {}",
        doc.meta.title, doc.meta.author, doc.meta.date, pages, doc.content.footer
    )
}

/// Text placed on the clipboard by "copy": raw pages separated by a blank line.
pub fn clipboard_text(doc: &Document) -> String {
    doc.content
        .pages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

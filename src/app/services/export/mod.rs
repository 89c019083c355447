//! Export pipeline: plain text, standalone HTML, PDF and print.
//!
//! Every exporter reads an immutable `&Document` and produces an
//! [`ExportArtifact`] the host can download or write to disk.

pub mod html;
pub mod pdf;
pub mod print;
pub mod surface;
pub mod text;

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::domain::Document;
use crate::app::infrastructure::error::{AppError, MissingField, Result, ValidationError};
use crate::app::infrastructure::pdf_writer_surface::PdfWriterSurface;

pub use print::{PrintJob, print_job};
pub use text::clipboard_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Html,
    Txt,
}

impl ExportFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html",
            ExportFormat::Txt => "text/plain",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Txt => "txt",
        }
    }
}

/// A finished export, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its own filename.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `<title or "document">.<ext>` with path separators neutralised.
pub fn export_filename(title: &str, ext: &str) -> String {
    let stem = if title.trim().is_empty() {
        "document".to_string()
    } else {
        title.replace(['/', '\\'], "_")
    };
    format!("{}.{}", stem, ext)
}

/// Required-field check applied before export when strict mode is on.
pub fn validate_for_export(doc: &Document) -> std::result::Result<(), ValidationError> {
    if doc.meta.title.trim().is_empty() {
        return Err(ValidationError::Required(MissingField::Title));
    }
    if doc.content.pages.iter().all(|p| p.content.trim().is_empty()) {
        return Err(ValidationError::Required(MissingField::Content));
    }
    Ok(())
}

pub fn export(doc: &Document, format: ExportFormat) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Txt => text::export_text(doc).into_bytes(),
        ExportFormat::Html => html::export_html(doc).into_bytes(),
        ExportFormat::Pdf => {
            let mut surface = PdfWriterSurface::new();
            pdf::draw_document(doc, &mut surface)
                .map_err(|e| AppError::Export(format!("PDF generation failed: {}", e)))?;
            surface.finish()?
        }
    };
    let filename = export_filename(&doc.meta.title, format.extension());
    tracing::info!("Exported {} ({} bytes)", filename, bytes.len());
    Ok(ExportArtifact {
        filename,
        mime: format.mime(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Document {
        let mut doc = Document::default();
        doc.meta.title = "Report".to_string();
        doc.meta.author = "Ada".to_string();
        doc.meta.date = "2024-03-01".to_string();
        doc.content.pages[0].content = "Hello **World**".to_string();
        doc.content.footer = "Confidential".to_string();
        doc
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("Report", "pdf"), "Report.pdf");
        assert_eq!(export_filename("", "txt"), "document.txt");
        assert_eq!(export_filename("   ", "html"), "document.html");
        assert_eq!(export_filename("a/b\\c", "txt"), "a_b_c.txt");
    }

    #[test]
    fn test_text_artifact() {
        let artifact = export(&report(), ExportFormat::Txt).unwrap();
        assert_eq!(artifact.filename, "Report.txt");
        assert_eq!(artifact.mime, "text/plain");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("Title: Report\nAuthor: Ada\nDate: 2024-03-01\n\n"));
        assert!(text.ends_with("Hello **World**\n\nFooter: Confidential"));
    }

    #[test]
    fn test_html_artifact() {
        let artifact = export(&report(), ExportFormat::Html).unwrap();
        assert_eq!(artifact.filename, "Report.html");
        assert_eq!(artifact.mime, "text/html");
        assert!(String::from_utf8(artifact.bytes).unwrap().contains("Hello <b>World</b>"));
    }

    #[test]
    fn test_pdf_artifact() {
        let artifact = export(&report(), ExportFormat::Pdf).unwrap();
        assert_eq!(artifact.filename, "Report.pdf");
        assert_eq!(artifact.mime, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_with_broken_image_fails() {
        let mut doc = report();
        doc.images.push(crate::app::domain::Image {
            id: 1,
            name: "bad.png".into(),
            data: "data:image/png;base64,AAAA".into(),
            position: crate::app::domain::ImagePosition::Header,
        });
        assert!(matches!(export(&doc, ExportFormat::Pdf), Err(AppError::Export(_))));
    }

    #[test]
    fn test_validate_for_export() {
        let mut doc = report();
        assert!(validate_for_export(&doc).is_ok());
        doc.content.pages[0].content = "  \n".to_string();
        assert_eq!(
            validate_for_export(&doc),
            Err(ValidationError::Required(MissingField::Content))
        );
        doc.meta.title.clear();
        assert_eq!(
            validate_for_export(&doc),
            Err(ValidationError::Required(MissingField::Title))
        );
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = export(&report(), ExportFormat::Txt).unwrap();
        let path = artifact.write_to(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Report.txt");
        assert_eq!(fs::read(path).unwrap(), artifact.bytes);
    }
}

use std::time::Duration;

use crate::app::domain::Document;
use crate::app::services::preview::compose;

/// Time the host should let the print surface lay out before opening the dialog.
pub const PRINT_DELAY: Duration = Duration::from_millis(500);

const PRINT_STYLE: &str = "body{background:#fff; color:#000; overflow:visible;} \
.paper{box-shadow:none; border:1px solid #eee; margin:20px auto;}";

/// Markup for a secondary print surface plus how long to wait before printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub html: String,
    pub delay: Duration,
}

pub fn print_job(doc: &Document) -> PrintJob {
    let mut composition = compose(doc);
    composition.apply_style(&doc.settings);
    let html = format!(
        "<html><head><title>Print</title><link rel=\"stylesheet\" href=\"style.css\"><style>{}</style></head><body>{}</body></html>",
        PRINT_STYLE,
        composition.to_html()
    );
    PrintJob {
        html,
        delay: PRINT_DELAY,
    }
}

use crate::app::domain::Document;
use crate::app::services::preview::{Composition, compose};

const SHELL_STYLE: &str = "body{font-family:sans-serif; max-width:800px; margin:0 auto; padding:20px;} \
.paper{border:1px solid #ccc; padding:40px; margin-bottom:20px; box-shadow:0 0 10px #eee; page-break-after:always;} \
.paper:last-child{page-break-after:auto;}";

/// Standalone HTML export of the styled preview.
pub fn export_html(doc: &Document) -> String {
    let mut composition = compose(doc);
    composition.apply_style(&doc.settings);
    wrap_composition(&composition)
}

/// Wrap an already composed preview in a document shell. The page markup is
/// copied verbatim.
pub fn wrap_composition(composition: &Composition) -> String {
    format!(
        "<html><head><meta charset=\"utf-8\"><style>{}</style></head><body>{}</body></html>",
        SHELL_STYLE,
        composition.to_html()
    )
}

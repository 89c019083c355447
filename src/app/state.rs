use std::rc::Rc;

use super::domain::{
    AppConfig, Document, FieldTarget, HexColor, Image, ImagePosition, Mutation, Page,
    RenderScope, StyleSettings,
};
use super::infrastructure::clock::{Clock, local_time_label};
use super::infrastructure::error::{Result, ValidationError};
use super::services::history::{HistoryEntry, SnapshotRing};
use super::services::storage::{StorageSlot, decode_document, encode_document};

/// Owns the live document together with its storage slot and version history.
/// Every change goes through here so derived stats stay in sync.
pub struct StateStore {
    document: Document,
    slot: Box<dyn StorageSlot>,
    clock: Rc<dyn Clock>,
    history: SnapshotRing,
    last_saved: Option<i64>,
    last_image_id: u64,
}

impl StateStore {
    /// Store holding a default document. Nothing is read from the slot.
    pub fn new(config: &AppConfig, slot: Box<dyn StorageSlot>, clock: Rc<dyn Clock>) -> Self {
        let mut document = Document::default();
        document.recompute_stats();
        Self {
            document,
            slot,
            clock,
            history: SnapshotRing::new(config.history_capacity, config.history_throttle()),
            last_saved: None,
            last_image_id: 0,
        }
    }

    /// Store initialised from whatever the slot currently holds.
    pub fn open(config: &AppConfig, slot: Box<dyn StorageSlot>, clock: Rc<dyn Clock>) -> Self {
        let mut store = Self::new(config, slot, clock);
        store.load();
        store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Apply one mutation. On error the document is left as it was.
    pub fn update(&mut self, mutation: Mutation) -> Result<RenderScope> {
        let scope = if mutation.is_style() {
            RenderScope::Style
        } else {
            RenderScope::Content
        };
        tracing::debug!(?scope, "applying {} change", mutation_kind(&mutation));

        let doc = &mut self.document;
        match mutation {
            Mutation::Title(v) => doc.meta.title = v,
            Mutation::Author(v) => doc.meta.author = v,
            Mutation::Date(v) => doc.meta.date = v,
            Mutation::Footer(v) => doc.content.footer = v,
            Mutation::PageContent { index, text } => {
                let page = doc
                    .content
                    .pages
                    .get_mut(index)
                    .ok_or(ValidationError::UnknownPage(index))?;
                page.content = text;
            }
            Mutation::Template(t) => doc.settings.template = t,
            Mutation::FontTitle(v) => doc.settings.font_title = v,
            Mutation::FontBody(v) => doc.settings.font_body = v,
            Mutation::ColorTitle(v) => doc.settings.color_title = HexColor::parse(&v)?,
            Mutation::ColorBody(v) => doc.settings.color_body = HexColor::parse(&v)?,
            Mutation::FontSize(s) => doc.settings.font_size = s,
            Mutation::Goal(g) => doc.goal = g,
        }

        if scope == RenderScope::Content {
            doc.recompute_stats();
        }
        Ok(scope)
    }

    /// Persist to the slot and take a snapshot if the throttle allows.
    pub fn save(&mut self) -> Result<()> {
        let raw = encode_document(&self.document)?;
        self.slot.write(&raw)?;
        let now = self.now();
        self.last_saved = Some(now);
        let captured = self.history.capture(&self.document, now);
        tracing::info!(
            bytes = raw.len(),
            snapshot = captured,
            "Saved \"{}\"",
            self.document.display_title()
        );
        Ok(())
    }

    /// Replace the document with the stored one, or a default when the slot
    /// is empty or unreadable.
    pub fn load(&mut self) {
        self.document = match self.slot.read() {
            Some(raw) => decode_document(&raw).unwrap_or_default(),
            None => {
                tracing::debug!("no saved document, starting fresh");
                Document::default()
            }
        };
        self.document.recompute_stats();
        self.last_image_id = self.document.images.iter().map(|i| i.id).max().unwrap_or(0);
    }

    /// Start over with a blank document. History survives.
    pub fn reset(&mut self) {
        self.document = Document::default();
        self.document.recompute_stats();
        tracing::info!("Document reset");
    }

    pub fn add_page(&mut self) -> String {
        let mut stamp = self.now();
        let mut id = format!("page_{}", stamp);
        while self.document.page_index(&id).is_some() {
            stamp += 1;
            id = format!("page_{}", stamp);
        }
        self.document.content.pages.push(Page::empty(id.clone()));
        self.document.recompute_stats();
        id
    }

    /// Remove the page at `index`. Refuses to remove the last remaining page
    /// and returns `Ok(false)` in that case.
    pub fn delete_page(&mut self, index: usize) -> Result<bool> {
        let pages = &mut self.document.content.pages;
        if index >= pages.len() {
            return Err(ValidationError::UnknownPage(index).into());
        }
        if pages.len() == 1 {
            tracing::info!("refusing to delete the only page");
            return Ok(false);
        }
        pages.remove(index);
        self.document.recompute_stats();
        Ok(true)
    }

    pub fn reset_style(&mut self) {
        self.document.settings = StyleSettings::default();
    }

    /// Listing of saved versions, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.listing()
    }

    /// Make a copy of the `index`-th newest snapshot the live document.
    pub fn restore_version(&mut self, index: usize) -> Result<()> {
        let snapshot = self
            .history
            .get(index)
            .ok_or(ValidationError::UnknownVersion(index))?;
        self.document = snapshot.document.clone();
        self.document.recompute_stats();
        let newest = self.document.images.iter().map(|i| i.id).max().unwrap_or(0);
        self.last_image_id = self.last_image_id.max(newest);
        tracing::info!("Restored version from {}", local_time_label(snapshot.timestamp));
        Ok(())
    }

    fn next_image_id(&mut self) -> u64 {
        let now = self.now().max(0) as u64;
        let id = now.max(self.last_image_id + 1);
        self.last_image_id = id;
        id
    }

    /// Register an inline image and return its id.
    pub fn add_image(&mut self, name: &str, data: String) -> u64 {
        let id = self.next_image_id();
        self.document.images.push(Image {
            id,
            name: name.to_string(),
            data,
            position: ImagePosition::Inline,
        });
        tracing::debug!(id, "added image {}", name);
        id
    }

    pub fn remove_image(&mut self, id: u64) -> Result<()> {
        let before = self.document.images.len();
        self.document.images.retain(|i| i.id != id);
        if self.document.images.len() == before {
            return Err(ValidationError::UnknownImage(id).into());
        }
        Ok(())
    }

    pub fn set_image_position(&mut self, id: u64, position: ImagePosition) -> Result<()> {
        let image = self
            .document
            .image_mut(id)
            .ok_or(ValidationError::UnknownImage(id))?;
        image.position = position;
        Ok(())
    }

    pub fn field_text(&self, target: FieldTarget) -> Option<&str> {
        let doc = &self.document;
        match target {
            FieldTarget::Title => Some(&doc.meta.title),
            FieldTarget::Author => Some(&doc.meta.author),
            FieldTarget::Footer => Some(&doc.content.footer),
            FieldTarget::Page(index) => doc.content.pages.get(index).map(|p| p.content.as_str()),
        }
    }

    /// Overwrite a text field through the regular mutation path.
    pub fn replace_field(&mut self, target: FieldTarget, text: String) -> Result<RenderScope> {
        let mutation = match target {
            FieldTarget::Title => Mutation::Title(text),
            FieldTarget::Author => Mutation::Author(text),
            FieldTarget::Footer => Mutation::Footer(text),
            FieldTarget::Page(index) => Mutation::PageContent { index, text },
        };
        self.update(mutation)
    }

    pub fn append_to_field(&mut self, target: FieldTarget, text: &str) -> Result<RenderScope> {
        let current = match target {
            FieldTarget::Page(index) => self
                .field_text(target)
                .ok_or(ValidationError::UnknownPage(index))?,
            _ => self.field_text(target).unwrap_or_default(),
        };
        let combined = format!("{}{}", current, text);
        self.replace_field(target, combined)
    }

    /// "Saved HH:MM:SS" once something has been saved this session.
    pub fn save_status(&self) -> Option<String> {
        self.last_saved
            .map(|at| format!("Saved {}", local_time_label(at)))
    }
}

/// Variant name only, so page text does not end up in the logs.
fn mutation_kind(mutation: &Mutation) -> &'static str {
    match mutation {
        Mutation::Title(_) => "title",
        Mutation::Author(_) => "author",
        Mutation::Date(_) => "date",
        Mutation::Footer(_) => "footer",
        Mutation::PageContent { .. } => "page content",
        Mutation::Template(_) => "template",
        Mutation::FontTitle(_) => "title font",
        Mutation::FontBody(_) => "body font",
        Mutation::ColorTitle(_) => "title color",
        Mutation::ColorBody(_) => "body color",
        Mutation::FontSize(_) => "font size",
        Mutation::Goal(_) => "goal",
    }
}

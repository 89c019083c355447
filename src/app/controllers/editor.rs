use crate::app::domain::{AppConfig, Command, Document, FieldTarget, RenderScope};
use crate::app::domain::document::placeholder_for;
use crate::app::infrastructure::error::{MissingField, Result, ValidationError};
use crate::app::services::autosave::Autosave;
use crate::app::services::export::{
    self, ExportArtifact, ExportFormat, PrintJob, clipboard_text, print_job, validate_for_export,
};
use crate::app::services::formatting::{apply_tool, table_markup};
use crate::app::services::ingest::ingest_image;
use crate::app::services::preview::{Composition, compose};
use crate::app::state::StateStore;

use super::notifications::Notifications;

/// Synchronous yes/no gate in front of destructive commands.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// What the host has to do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Render(RenderScope),
    Download(ExportArtifact),
    Clipboard(String),
    Print(PrintJob),
}

pub struct EditorController {
    store: StateStore,
    config: AppConfig,
    focused: Option<FieldTarget>,
    autosave: Autosave,
    notifications: Notifications,
}

impl EditorController {
    pub fn new(store: StateStore, config: AppConfig) -> Self {
        let autosave = Autosave::new(config.autosave_interval(), store.now());
        let notifications = Notifications::new(config.notification_ttl());
        Self {
            store,
            config,
            focused: None,
            autosave,
            notifications,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn document(&self) -> &Document {
        self.store.document()
    }

    pub fn focused(&self) -> Option<FieldTarget> {
        self.focused
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Styled preview of the current document.
    pub fn preview(&self) -> Composition {
        let doc = self.store.document();
        let mut composition = compose(doc);
        composition.apply_style(&doc.settings);
        composition
    }

    pub fn dispatch(&mut self, command: Command, confirm: &mut impl Confirm) -> Result<Effect> {
        let now = self.store.now();
        match command {
            Command::Edit(mutation) => Ok(Effect::Render(self.store.update(mutation)?)),
            Command::Focus(target) => {
                self.field(target)?;
                self.focused = Some(target);
                Ok(Effect::None)
            }
            Command::Blur => {
                self.focused = None;
                Ok(Effect::None)
            }
            Command::Format {
                target,
                tool,
                selection,
            } => {
                let text = self.field(target)?;
                let formatted = apply_tool(text, selection, tool);
                Ok(Effect::Render(self.store.replace_field(target, formatted)?))
            }
            Command::InsertTable { rows, cols } => match self.focused_field() {
                Some(target) => {
                    let table = table_markup(rows, cols);
                    Ok(Effect::Render(self.store.append_to_field(target, &table)?))
                }
                None => Ok(Effect::None),
            },
            Command::AddPage => {
                self.store.add_page();
                self.store.save()?;
                Ok(Effect::Render(RenderScope::Full))
            }
            Command::DeletePage(index) => {
                if !confirm.confirm("Remove page?") {
                    return Ok(Effect::None);
                }
                if !self.store.delete_page(index)? {
                    self.notifications
                        .error("A document needs at least one page", now);
                    return Ok(Effect::None);
                }
                self.focused = match self.focused {
                    Some(FieldTarget::Page(i)) if i == index => None,
                    Some(FieldTarget::Page(i)) if i > index => Some(FieldTarget::Page(i - 1)),
                    other => other,
                };
                self.store.save()?;
                Ok(Effect::Render(RenderScope::Full))
            }
            Command::UploadImage { name, bytes } => {
                let data = ingest_image(&name, &bytes);
                let target = self.focused_field();
                self.store.add_image(&name, data);
                if let Some(target) = target {
                    let token = format!("\n{}\n", placeholder_for(&name));
                    self.store.append_to_field(target, &token)?;
                }
                Ok(Effect::Render(RenderScope::Content))
            }
            Command::RemoveImage(id) => {
                self.store.remove_image(id)?;
                Ok(Effect::Render(RenderScope::Content))
            }
            Command::SetImagePosition(id, position) => {
                self.store.set_image_position(id, position)?;
                Ok(Effect::Render(RenderScope::Content))
            }
            Command::ResetStyle => {
                self.store.reset_style();
                self.store.save()?;
                self.notifications.success("Styles Reset", now);
                Ok(Effect::Render(RenderScope::Style))
            }
            Command::NewDocument => {
                if !confirm.confirm("Start new document?") {
                    return Ok(Effect::None);
                }
                self.store.reset();
                self.focused = None;
                self.store.save()?;
                Ok(Effect::Render(RenderScope::Full))
            }
            Command::RestoreVersion(index) => {
                self.store.restore_version(index)?;
                self.focused = self.focused_field();
                self.store.save()?;
                self.notifications.success("Version Restored", now);
                Ok(Effect::Render(RenderScope::Full))
            }
            Command::Save => {
                self.store.save()?;
                Ok(Effect::None)
            }
            Command::Export(format) => Ok(self.export(format, now)),
            Command::CopyText => {
                self.notifications.success("Copied to Clipboard!", now);
                Ok(Effect::Clipboard(clipboard_text(self.store.document())))
            }
            Command::Print => Ok(Effect::Print(print_job(self.store.document()))),
        }
    }

    /// Export failures never propagate: they become a notification and the
    /// document is left alone.
    fn export(&mut self, format: ExportFormat, now: i64) -> Effect {
        let doc = self.store.document();
        if self.config.strict_export {
            if let Err(e) = validate_for_export(doc) {
                self.focused = Some(match e {
                    ValidationError::Required(MissingField::Title) => FieldTarget::Title,
                    _ => FieldTarget::Page(0),
                });
                self.notifications.error(e.to_string(), now);
                return Effect::None;
            }
        }

        match export::export(doc, format) {
            Ok(artifact) => {
                let message = match format {
                    ExportFormat::Pdf => "PDF Generated",
                    _ => "Downloaded!",
                };
                self.notifications.success(message, now);
                Effect::Download(artifact)
            }
            Err(e) => {
                tracing::error!(error = %e, "export to {} failed", format.extension());
                let message = match format {
                    ExportFormat::Pdf => "PDF generation failed",
                    _ => "Export failed",
                };
                self.notifications.error(message, now);
                Effect::None
            }
        }
    }

    /// Periodic housekeeping: drop expired notifications and autosave when due.
    /// Returns whether a save ran.
    pub fn tick(&mut self) -> Result<bool> {
        let now = self.store.now();
        self.notifications.prune(now);
        if !self.autosave.is_due(now) {
            return Ok(false);
        }
        self.autosave.mark_run(now);
        self.store.save()?;
        Ok(true)
    }

    /// The focused field, if it still exists in the current document.
    fn focused_field(&self) -> Option<FieldTarget> {
        self.focused
            .filter(|&target| self.store.field_text(target).is_some())
    }

    fn field(&self, target: FieldTarget) -> Result<&str> {
        match self.store.field_text(target) {
            Some(text) => Ok(text),
            None => match target {
                FieldTarget::Page(index) => Err(ValidationError::UnknownPage(index).into()),
                _ => Ok(""),
            },
        }
    }
}

//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Mutation, Command, AppConfig)
//! - `controllers/` - Orchestration (EditorController, Notifications)
//! - `services/` - Business operations (storage, history, markdown, preview, export)
//! - `infrastructure/` - External integrations (clock, pdf-writer surface, error)
//! - `state.rs` - Owner of the live document

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::editor::{Confirm, EditorController, Effect};
pub use domain::{AppConfig, Command, Document, FieldTarget, Mutation, RenderScope};
pub use infrastructure::error::{AppError, Result};
pub use services::export::{ExportArtifact, ExportFormat};
pub use state::StateStore;

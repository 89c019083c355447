//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document, pages, images and style settings
//! - Typed mutations and editor commands
//! - Application configuration

pub mod config;
pub mod document;
pub mod messages;

pub use config::AppConfig;
pub use document::{
    Content, Document, FontSize, HexColor, Image, ImagePosition, Meta, Page, Stats, StyleSettings,
    Template,
};
pub use messages::{Command, FieldTarget, Mutation, RenderScope};

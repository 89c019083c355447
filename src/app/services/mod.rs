//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Document persistence and version history
//! - Markdown-lite rendering and preview composition
//! - Formatting tools and image ingestion
//! - Export (text, HTML, PDF, print)

pub mod autosave;
pub mod export;
pub mod formatting;
pub mod history;
pub mod ingest;
pub mod markdown;
pub mod preview;
pub mod storage;

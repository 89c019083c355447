//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the host UI:
//! - Command dispatch and autosave
//! - Transient notifications

pub mod editor;
pub mod notifications;

//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Wall clock and time formatting
//! - PDF output through `pdf-writer` and standard font metrics
//! - Error types

pub mod clock;
pub mod error;
pub mod font_metrics;
pub mod pdf_writer_surface;

//! PageForge: compose short multi-page documents and export them as PDF,
//! HTML or plain text.

pub mod app;

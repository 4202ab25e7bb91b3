//! Shared line-level parsing utilities.
//!
//! Parsers in [`crate::parsers`] build on these helpers: line classification,
//! timestamp parsing, and system/media detection.

pub mod whatsapp;

pub use whatsapp::{
    LineClassifier, LineKind, LineShape, LineStart, detect_date_order, extract_event_actor,
    is_media_placeholder, is_system_notice, normalize_line, parse_whatsapp_timestamp,
};

//! Transcript parsers.
//!
//! | Parser | Input |
//! |--------|-------|
//! | [`WhatsAppParser`] | WhatsApp TXT export (Android dash form, iOS bracketed form) |

pub mod whatsapp;

pub use whatsapp::WhatsAppParser;

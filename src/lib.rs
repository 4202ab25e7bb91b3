//! # chatmetrics
//!
//! Analytics for exported WhatsApp chats: who talks, when, with which words
//! and emoji, and how much they swear (the *Bestemmiometro*).
//!
//! ## Overview
//!
//! Raw transcript text is parsed once into an ordered [`Message`] stream.
//! Every report is a pure function of that stream and a [`Filter`]:
//!
//! ```text
//! text ─► parser ─► Snapshot ─► Filter ─┬─► stats ──────────┐
//!                                       ├─► words           ├─► insights
//!                                       ├─► emoji           │
//!                                       └─► bestemmiometro ─┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chatmetrics::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let transcript = "\
//! 12/03/24, 21:15 - Marco: porco dio, ho perso il treno
//! 12/03/24, 21:16 - Luca: ahahah 😂
//! 12/03/24, 21:20 - Marco: <Media omitted>";
//!
//!     let snapshot = Snapshot::from(chatmetrics::parse(transcript)?);
//!     let analyzer = Analyzer::bundled(Language::Italian)?;
//!     let report = analyzer.analyze(&snapshot, &Filter::new())?;
//!
//!     assert_eq!(report.stats.total_messages, 3);
//!     assert_eq!(report.stats.media_stats.total_media, 1);
//!     assert_eq!(report.bestemmiometro.by_author_total["Marco"], 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — [`Parser`](parser::Parser) trait and the [`parse`] shortcut
//! - [`parsers`] — [`WhatsAppParser`](parsers::WhatsAppParser)
//! - [`parsing`] — line classification and timestamp helpers
//! - [`config`] — [`ParserConfig`](config::ParserConfig), [`AnalysisConfig`](config::AnalysisConfig), [`Language`](config::Language)
//! - [`core`] — filters, buckets, statistics, words, emoji, Bestemmiometro, insights, writers
//! - [`report`] — [`Analyzer`](report::Analyzer) and [`AnalysisReport`](report::AnalysisReport)
//! - [`session`] — [`Snapshot`](session::Snapshot) and [`SessionStore`](session::SessionStore)
//! - [`format`] — output format selection
//! - [`error`] — [`AnalyzerError`] and [`Result`]
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod report;
pub mod session;

// Re-export the main types at the crate root for convenience
pub use crate::core::filter::Filter;
pub use error::{AnalyzerError, Result};
pub use message::Message;
pub use parser::parse;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatmetrics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;
    pub use crate::error::{AnalyzerError, Result};

    pub use crate::parser::Parser;
    pub use crate::parsers::WhatsAppParser;

    pub use crate::config::{AnalysisConfig, DateOrder, Language, ParserConfig};

    pub use crate::core::bestemmiometro::{Bestemmiometro, BestemmiometroSummary};
    pub use crate::core::bucket::{Granularity, TimeSeriesPoint};
    pub use crate::core::emoji::EmojiReport;
    pub use crate::core::filter::Filter;
    pub use crate::core::insights::{Insight, InsightCategory};
    pub use crate::core::stats::StatsReport;
    pub use crate::core::words::WordFrequencyReport;

    pub use crate::report::{AnalysisReport, Analyzer};
    pub use crate::session::{SessionStore, SharedReport, Snapshot};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}

//! `WhatsApp` TXT export parser.
//!
//! `WhatsApp` exports vary by locale and platform. The parser accepts the
//! dash (Android) and bracketed (iOS) line shapes in any locale, detects the
//! day/month order over the whole file, and folds multi-line messages back
//! together.
//!
//! Supported formats:
//! - US: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - EU: `[15.01.24, 10:30:45] Sender: Message`
//! - EU2: `15/01/2024, 10:30 - Sender: Message`
//! - IT: `26.10.25, 20:40 - Sender: Message`

use std::time::Instant;

use crate::Message;
use crate::config::ParserConfig;
use crate::error::{AnalyzerError, Result};
use crate::parser::Parser;
use crate::parsing::whatsapp::{
    LineClassifier, LineKind, detect_date_order, normalize_line, parse_whatsapp_timestamp,
};

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use chatmetrics::config::ParserConfig;
/// use chatmetrics::parser::Parser;
/// use chatmetrics::parsers::WhatsAppParser;
///
/// let parser = WhatsAppParser::with_config(ParserConfig::new().with_skip_system_messages(false));
/// let messages = parser.parse_str(
///     "15/01/2024, 10:30 - Alice: Hello\n15/01/2024, 10:31 - Alice added Bob",
/// )?;
/// assert_eq!(messages.len(), 2);
/// assert!(messages[1].is_system());
/// # Ok::<(), chatmetrics::AnalyzerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhatsAppParser {
    config: ParserConfig,
    classifier: LineClassifier,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            classifier: LineClassifier::new(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn parse_content(&self, content: &str) -> Result<Vec<Message>> {
        let started = Instant::now();
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let lines: Vec<String> = content
            .lines()
            .map(normalize_line)
            .filter(|line| !line.is_empty())
            .collect();
        let kinds: Vec<LineKind<'_>> = lines
            .iter()
            .map(|line| self.classifier.classify(line))
            .collect();

        let starts = kinds
            .iter()
            .filter(|kind| matches!(kind, LineKind::Start(_)))
            .count();
        if starts == 0 {
            return Err(AnalyzerError::unrecognized_format(
                "no line matches a WhatsApp export line format. \
                 Make sure the file is a valid WhatsApp chat export.",
            ));
        }

        let order = self.config.date_order.unwrap_or_else(|| {
            detect_date_order(kinds.iter().filter_map(|kind| match kind {
                LineKind::Start(start) => Some(start.date),
                LineKind::Continuation(_) => None,
            }))
        });

        let mut messages: Vec<Message> = Vec::with_capacity(starts);
        let mut preamble_left = self.config.preamble_lines;
        let mut in_preamble = true;
        // Set while continuation lines belong to a record that was dropped.
        let mut dropping = false;
        let mut bad_timestamps = 0usize;

        for (line, kind) in lines.iter().zip(kinds) {
            if in_preamble {
                let authored = matches!(&kind, LineKind::Start(start) if !start.is_system());
                if !authored && preamble_left > 0 {
                    preamble_left -= 1;
                    dropping = true;
                    continue;
                }
                in_preamble = false;
            }

            let start = match kind {
                LineKind::Start(start) => start,
                LineKind::Continuation(line) => {
                    if !dropping {
                        append_continuation(&mut messages, line);
                    }
                    continue;
                }
            };

            let Some(timestamp) = parse_whatsapp_timestamp(start.date, start.time, order) else {
                bad_timestamps += 1;
                tracing::warn!(
                    date = start.date,
                    time = start.time,
                    "unparseable timestamp, treating line as continuation"
                );
                if !dropping {
                    append_continuation(&mut messages, line);
                }
                continue;
            };

            if start.is_system() {
                if self.config.skip_system_messages {
                    dropping = true;
                    continue;
                }
                messages.push(Message::system(
                    start.attributed_author(),
                    start.text,
                    timestamp,
                ));
            } else if start.is_media() {
                messages.push(Message::media(start.attributed_author(), timestamp));
            } else {
                messages.push(Message::new(
                    start.attributed_author(),
                    start.text,
                    timestamp,
                ));
            }
            dropping = false;
        }

        tracing::debug!(
            lines = lines.len(),
            messages = messages.len(),
            date_order = ?order,
            bad_timestamps,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "parsed WhatsApp transcript"
        );

        Ok(messages)
    }
}

/// Folds a continuation line into the preceding message.
///
/// Orphan lines before the first message are discarded.
fn append_continuation(messages: &mut [Message], line: &str) {
    if let Some(last) = messages.last_mut() {
        if last.content.is_empty() {
            last.content = line.to_string();
        } else {
            last.content.push('\n');
            last.content.push_str(line);
        }
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>> {
        self.parse_content(content)
    }
}

//! Command-line interface definition using clap.
//!
//! [`Args`] maps flags onto the library's configuration types:
//!
//! | Flags | Target |
//! |-------|--------|
//! | `--date-order`, `--include-system`, `--preamble-lines` | [`ParserConfig`] |
//! | `--config`, `--lang`, `--word-limit`, `--min-word-length`, `--dictionary`, `--stopwords` | [`AnalysisConfig`] |
//! | `--author`, `--from`, `--to`, `--granularity` | [`Filter`] |
//! | `--merge` | [`Snapshot::relabeled`](crate::session::Snapshot::relabeled) |

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{AnalysisConfig, DateOrder, Language, ParserConfig};
use crate::core::bucket::Granularity;
use crate::core::filter::Filter;
use crate::error::{AnalyzerError, Result};
use crate::format::OutputFormat;

/// Analyze a WhatsApp chat export: activity, words, emoji and the
/// Bestemmiometro.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmetrics")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmetrics chat.txt
    chatmetrics chat.txt --lang it -o report.json
    chatmetrics chat.txt -f csv -g week --from 2024-01-01 --to 2024-06-30
    chatmetrics chat.txt --author Marco --author Luca
    chatmetrics chat.txt --merge 'Marco Work=Marco'")]
pub struct Args {
    /// Path to the exported transcript
    pub input: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Output format (inferred from --output's extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// JSON file with an analysis configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dictionary and insight language
    #[arg(short, long = "lang", value_enum)]
    pub language: Option<Language>,

    /// Restrict the analysis to this author (repeatable)
    #[arg(short, long = "author", value_name = "NAME")]
    pub authors: Vec<String>,

    /// Only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Only messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Time-series bucket width
    #[arg(short, long, value_enum, default_value = "day")]
    pub granularity: Granularity,

    /// Merge an author into another before analysis, as ALIAS=NAME (repeatable)
    #[arg(long, value_name = "ALIAS=NAME", value_parser = parse_merge)]
    pub merge: Vec<(String, String)>,

    /// Maximum number of ranked words
    #[arg(long, value_name = "N")]
    pub word_limit: Option<usize>,

    /// Minimum word length in characters
    #[arg(long, value_name = "N")]
    pub min_word_length: Option<usize>,

    /// Phrase dictionary replacing the bundled one
    #[arg(long, value_name = "FILE")]
    pub dictionary: Option<PathBuf>,

    /// Stopword list replacing the bundled one
    #[arg(long, value_name = "FILE")]
    pub stopwords: Option<PathBuf>,

    /// Force the numeric date order instead of detecting it
    #[arg(long, value_enum)]
    pub date_order: Option<DateOrder>,

    /// Leading header lines that may be skipped
    #[arg(long, value_name = "N")]
    pub preamble_lines: Option<usize>,

    /// Keep system notices (joins, encryption banners) as messages
    #[arg(long)]
    pub include_system: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_merge(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((alias, name)) if !alias.trim().is_empty() && !name.trim().is_empty() => {
            Ok((alias.trim().to_string(), name.trim().to_string()))
        }
        _ => Err(format!("Expected ALIAS=NAME, got '{s}'")),
    }
}

impl Args {
    /// Builds the parser configuration.
    pub fn parser_config(&self) -> ParserConfig {
        let mut config = ParserConfig::new().with_skip_system_messages(!self.include_system);
        if let Some(order) = self.date_order {
            config = config.with_date_order(order);
        }
        if let Some(lines) = self.preamble_lines {
            config = config.with_preamble_lines(lines);
        }
        config
    }

    /// Builds the analysis configuration: the `--config` file if given,
    /// then individual flags on top.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => load_analysis_config(path)?,
            None => AnalysisConfig::new(),
        };
        if let Some(language) = self.language {
            config = config.with_language(language);
        }
        if let Some(limit) = self.word_limit {
            config = config.with_word_limit(limit);
        }
        if let Some(length) = self.min_word_length {
            config = config.with_min_word_length(length);
        }
        if let Some(path) = &self.dictionary {
            config = config.with_dictionary_path(path);
        }
        if let Some(path) = &self.stopwords {
            config = config.with_stopwords_path(path);
        }
        Ok(config)
    }

    /// Builds the message filter.
    pub fn filter(&self) -> Result<Filter> {
        let mut filter = Filter::new()
            .with_authors(self.authors.iter().cloned())
            .with_granularity(self.granularity);
        if let Some(from) = &self.from {
            filter = filter.with_date_from(from)?;
        }
        if let Some(to) = &self.to {
            filter = filter.with_date_to(to)?;
        }
        filter.validate()?;
        Ok(filter)
    }

    /// Author relabeling requested with `--merge`.
    pub fn merge_mapping(&self) -> HashMap<String, String> {
        self.merge.iter().cloned().collect()
    }

    /// The format to write: explicit flag, else the output extension,
    /// else JSON.
    pub fn output_format(&self) -> Result<OutputFormat> {
        match (self.format, &self.output) {
            (Some(format), _) => Ok(format),
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => Ok(OutputFormat::default()),
        }
    }
}

/// Reads an [`AnalysisConfig`] from a JSON file. Missing fields take their
/// defaults.
pub fn load_analysis_config(path: &std::path::Path) -> Result<AnalysisConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AnalyzerError::configuration(format!("config file {}", path.display()), e.to_string())
    })?;
    serde_json::from_str(&text).map_err(|e| {
        AnalyzerError::configuration(format!("config file {}", path.display()), e.to_string())
    })
}

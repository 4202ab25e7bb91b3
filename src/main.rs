//! # chatmetrics CLI
//!
//! Command-line interface for the chatmetrics library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatmetrics::AnalyzerError;
use chatmetrics::cli::Args;
use chatmetrics::format::{to_format_string, write_to_format};
use chatmetrics::logging;
use chatmetrics::parser::Parser;
use chatmetrics::parsers::WhatsAppParser;
use chatmetrics::report::Analyzer;
use chatmetrics::session::Snapshot;

fn main() {
    let args = <Args as ClapParser>::parse();
    logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AnalyzerError> {
    let total_start = Instant::now();

    let format = args.output_format()?;
    let filter = args.filter()?;
    let analyzer = Analyzer::new(args.analysis_config()?)?;

    let parser = WhatsAppParser::with_config(args.parser_config());
    let messages = parser.parse(&args.input)?;
    let parsed = messages.len();

    let mut snapshot = Snapshot::from(messages);
    let mapping = args.merge_mapping();
    if !mapping.is_empty() {
        snapshot = snapshot.relabeled(&mapping);
    }

    let report = analyzer.analyze(&snapshot, &filter)?;

    match &args.output {
        Some(path) => {
            write_to_format(&report, path, format)?;

            eprintln!("📊 chatmetrics v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            eprintln!("📂 Input:    {}", args.input.display());
            eprintln!("💬 Messages: {} parsed, {} analyzed", parsed, report.stats.total_messages);
            eprintln!("👥 Authors:  {}", report.stats.total_authors);
            eprintln!("🤬 Matches:  {}", report.bestemmiometro.total);
            eprintln!("💾 Output:   {} ({})", path, format);
            eprintln!("⚡ Time:     {:.2}s", total_start.elapsed().as_secs_f64());
        }
        None => println!("{}", to_format_string(&report, format)?),
    }

    Ok(())
}

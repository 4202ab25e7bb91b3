//! Integration tests: real transcript files through the whole pipeline.

use std::collections::HashMap;
use std::path::Path;

use chatmetrics::core::bucket::Granularity;
use chatmetrics::core::insights::InsightCategory;
use chatmetrics::prelude::*;
use chrono::{TimeZone, Utc};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests/fixtures").join(name)
}

fn italian_messages() -> Vec<Message> {
    WhatsAppParser::new()
        .parse(&fixture("italian_group.txt"))
        .expect("italian fixture parses")
}

fn italian_report(filter: &Filter) -> AnalysisReport {
    let snapshot = Snapshot::from(italian_messages());
    Analyzer::bundled(Language::Italian)
        .unwrap()
        .analyze(&snapshot, filter)
        .unwrap()
}

// =========================================================================
// Parsing
// =========================================================================

#[test]
fn test_parse_italian_group() {
    let messages = italian_messages();

    assert_eq!(messages.len(), 9);
    assert_eq!(messages[0].author(), "Marco");
    assert_eq!(messages[0].content(), "raga stasera calcetto?");
    assert_eq!(
        messages[0].timestamp(),
        Utc.with_ymd_and_hms(2024, 3, 12, 21, 0, 0).unwrap()
    );

    assert!(messages[5].is_media());
    assert_eq!(messages[5].author(), "Marco");
    assert_eq!(messages[6].content(), "allora giovedì\nalle 21 al campo");
    assert_eq!(messages[7].author(), "Francesca");
    assert!(messages.iter().all(|m| !m.is_system()));
}

#[test]
fn test_parse_italian_group_keeping_system_lines() {
    let parser =
        WhatsAppParser::with_config(ParserConfig::new().with_skip_system_messages(false));
    let messages = parser.parse(&fixture("italian_group.txt")).unwrap();

    // The two header notices are preamble; the later join is kept.
    assert_eq!(messages.len(), 10);
    let system: Vec<&Message> = messages.iter().filter(|m| m.is_system()).collect();
    assert_eq!(system.len(), 1);
    assert_eq!(system[0].author(), "Giulia");

    // System lines never reach the statistics.
    let report = Analyzer::bundled(Language::Italian)
        .unwrap()
        .analyze(&Snapshot::from(messages), &Filter::new())
        .unwrap();
    assert_eq!(report.stats.total_messages, 9);
}

#[test]
fn test_parse_us_ios_export() {
    let messages = WhatsAppParser::new()
        .parse(&fixture("us_ios.txt"))
        .unwrap();

    assert_eq!(messages.len(), 7);
    assert!(messages.iter().all(|m| m.author() != "Charlie"));
    assert!(messages[4].is_media());
    assert_eq!(
        messages[5].timestamp(),
        Utc.with_ymd_and_hms(2024, 1, 16, 13, 5, 0).unwrap()
    );
}

#[test]
fn test_parse_missing_file() {
    let err = WhatsAppParser::new()
        .parse(Path::new("tests/fixtures/does_not_exist.txt"))
        .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_parse_unrecognized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "shopping list\n- milk\n- eggs\n").unwrap();

    let err = WhatsAppParser::new().parse(&path).unwrap_err();
    assert!(err.is_unrecognized_format());
}

// =========================================================================
// Statistics
// =========================================================================

#[test]
fn test_stats_italian_group() {
    let report = italian_report(&Filter::new());
    let stats = &report.stats;

    assert_eq!(stats.total_messages, 9);
    assert_eq!(stats.total_authors, 4);
    assert_eq!(stats.author_stats[0].author, "Luca");
    assert_eq!(stats.author_stats[0].message_count, 4);
    assert_eq!(stats.author("Marco").unwrap().media_count, 1);
    assert_eq!(stats.media_stats.total_media, 1);

    let values: Vec<u64> = stats.time_series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![5, 3, 1]);
    assert_eq!(stats.hourly[21], 5);
    // 2024-03-12 is a Tuesday
    assert_eq!(stats.weekday[1], 5);
}

#[test]
fn test_series_total_matches_author_counts() {
    for granularity in [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
    ] {
        let report = italian_report(&Filter::new().with_granularity(granularity));
        let series_total: u64 = report.stats.time_series.iter().map(|p| p.value).sum();
        let author_total: usize = report
            .stats
            .author_stats
            .iter()
            .map(|a| a.message_count)
            .sum();
        assert_eq!(series_total as usize, author_total, "{granularity}");
    }
}

#[test]
fn test_unfiltered_counts_reproduce_parse() {
    let messages = italian_messages();
    let mut expected: HashMap<&str, usize> = HashMap::new();
    for msg in &messages {
        *expected.entry(msg.author()).or_default() += 1;
    }

    let report = italian_report(&Filter::new());
    for author in &report.stats.author_stats {
        assert_eq!(expected[author.author.as_str()], author.message_count);
    }
    assert_eq!(report.stats.author_stats.len(), expected.len());
}

// =========================================================================
// Filters
// =========================================================================

#[test]
fn test_author_filter_applies_everywhere() {
    let report = italian_report(&Filter::new().with_author("Giulia"));

    assert_eq!(report.stats.total_messages, 1);
    assert_eq!(report.emoji.total_emojis, 2);
    assert_eq!(report.bestemmiometro.total, 0);
    assert!(report.bestemmiometro.by_author_total.is_empty());
}

#[test]
fn test_date_filter() {
    let filter = Filter::new()
        .with_date_from("2024-03-13")
        .unwrap()
        .with_date_to("2024-03-13")
        .unwrap();
    let report = italian_report(&filter);

    assert_eq!(report.stats.total_messages, 3);
    assert_eq!(report.stats.time_series.len(), 1);
    assert_eq!(report.bestemmiometro.total, 0);
}

#[test]
fn test_unknown_author_is_empty_not_error() {
    let report = italian_report(&Filter::new().with_author("Nobody"));

    assert_eq!(report.stats.total_messages, 0);
    assert!(report.stats.time_series.is_empty());
    assert!(report.words.words.is_empty());
    assert!(report.insights.is_empty());
}

// =========================================================================
// Bestemmiometro
// =========================================================================

#[test]
fn test_bestemmiometro_italian_group() {
    let summary = italian_report(&Filter::new()).bestemmiometro;

    assert_eq!(summary.language, Language::Italian);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.by_phrase["porco dio"], 2);
    assert_eq!(summary.top_phrases[0].phrase, "porco dio");
    assert_eq!(summary.by_author_total["Luca"], 4);
    assert_eq!(summary.by_author["Luca"]["madonna ladra"], 1);
    assert!((summary.per_capita["Luca"] - 100.0).abs() < f64::EPSILON);

    assert_eq!(summary.consecutive_streaks.len(), 1);
    let streak = &summary.consecutive_streaks[0];
    assert_eq!(streak.author, "Luca");
    assert_eq!(streak.count, 3);
    assert_eq!(
        streak.start_timestamp,
        Utc.with_ymd_and_hms(2024, 3, 12, 21, 1, 0).unwrap()
    );

    assert_eq!(summary.climax_instances.len(), 1);
    assert_eq!(summary.climax_instances[0].text_snippet, "porcodioooo");
    assert_eq!(summary.climax_instances[0].repetitions, 4);
    assert_eq!(summary.climax_instances[0].intensity, 2);
}

#[test]
fn test_english_dictionary_on_us_export() {
    let messages = WhatsAppParser::new().parse(&fixture("us_ios.txt")).unwrap();
    let report = Analyzer::bundled(Language::English)
        .unwrap()
        .analyze(&Snapshot::from(messages), &Filter::new())
        .unwrap();

    let summary = &report.bestemmiometro;
    assert_eq!(summary.by_author_total.keys().collect::<Vec<_>>(), vec!["Bob"]);
    assert_eq!(summary.by_phrase["fuck"], 1);
    assert_eq!(summary.by_phrase["holy shit"], 1);
    assert!(!summary.by_phrase.contains_key("shit"));
}

// =========================================================================
// Insights and sessions
// =========================================================================

#[test]
fn test_insights_follow_language() {
    let report = italian_report(&Filter::new());
    let insights = &report.insights;

    assert_eq!(insights[0].title, "Messaggi Totali");
    assert_eq!(insights[0].category, InsightCategory::Activity);
    assert!(insights.iter().any(|i| i.description.contains("Martedì")));
    assert_eq!(
        insights.last().map(|i| i.category),
        Some(InsightCategory::Profanity)
    );
}

#[test]
fn test_session_flow_with_merge_and_share() {
    let store = SessionStore::default();
    let key = store.insert(Snapshot::from(italian_messages()));
    let analyzer = Analyzer::bundled(Language::Italian).unwrap();

    let snapshot = store.get(&key).unwrap();
    let mapping = HashMap::from([("Giulia".to_string(), "Luca".to_string())]);
    let merged = snapshot.relabeled(&mapping);
    let report = analyzer.analyze(&merged, &Filter::new()).unwrap();

    assert_eq!(report.stats.author("Luca").unwrap().message_count, 5);
    // 4 matches over 5 messages, recomputed rather than averaged
    assert!((report.bestemmiometro.per_capita["Luca"] - 80.0).abs() < f64::EPSILON);

    let shared = store.share(&report);
    store.remove(&key);
    assert!(store.get(&key).unwrap_err().is_session_expired());
    assert_eq!(store.get_shared(&shared.id).unwrap().report, report);
}

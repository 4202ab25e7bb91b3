//! Natural-language observations about a conversation.
//!
//! Insights are derived only from finished aggregates ([`StatsReport`],
//! [`WordFrequencyReport`], [`BestemmiometroSummary`]), never from the
//! messages, so whatever filter produced those aggregates is reflected
//! automatically.
//!
//! Rules run in a fixed order:
//!
//! | Category | Insights |
//! |----------|----------|
//! | activity | total messages, duration, average per day |
//! | authors | most active participant, participation balance |
//! | temporal | peak hour, most active weekday, activity trend |
//! | words | most used word, average message length |
//! | patterns | media sharing, conversation style |
//! | profanity | Bestemmiometro total, top offender |

use serde::{Deserialize, Serialize};

use crate::config::Language;
use crate::core::bestemmiometro::BestemmiometroSummary;
use crate::core::stats::StatsReport;
use crate::core::words::WordFrequencyReport;

/// Relative change between the two halves of the series that counts as a trend.
const TREND_THRESHOLD: f64 = 0.10;

const WEEKDAYS_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const WEEKDAYS_IT: [&str; 7] = [
    "Lunedì",
    "Martedì",
    "Mercoledì",
    "Giovedì",
    "Venerdì",
    "Sabato",
    "Domenica",
];

/// Group of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    /// Volume and duration.
    Activity,
    /// Participants.
    Authors,
    /// Time-of-day, weekday and trend.
    Temporal,
    /// Vocabulary.
    Words,
    /// Media and overall style.
    Patterns,
    /// Bestemmiometro.
    Profanity,
}

/// Headline value of an insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsightValue {
    /// A count or whole number.
    Integer(i64),
    /// A rate or average.
    Float(f64),
    /// A name, word or label.
    Text(String),
}

impl From<usize> for InsightValue {
    fn from(value: usize) -> Self {
        InsightValue::Integer(value as i64)
    }
}

impl From<i64> for InsightValue {
    fn from(value: i64) -> Self {
        InsightValue::Integer(value)
    }
}

impl From<f64> for InsightValue {
    fn from(value: f64) -> Self {
        InsightValue::Float(value)
    }
}

impl From<&str> for InsightValue {
    fn from(value: &str) -> Self {
        InsightValue::Text(value.to_string())
    }
}

impl From<String> for InsightValue {
    fn from(value: String) -> Self {
        InsightValue::Text(value)
    }
}

/// One observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Short heading.
    pub title: String,
    /// Full sentence.
    pub description: String,
    /// Group.
    pub category: InsightCategory,
    /// Headline value.
    pub value: InsightValue,
}

impl Insight {
    fn new(
        title: &str,
        description: String,
        category: InsightCategory,
        value: impl Into<InsightValue>,
    ) -> Self {
        Self {
            title: title.to_string(),
            description,
            category,
            value: value.into(),
        }
    }
}

/// Activity direction between the first and second half of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Second half busier by more than the threshold.
    Increasing,
    /// Second half quieter by more than the threshold.
    Decreasing,
    /// Within the threshold.
    Stable,
}

impl Trend {
    /// Compares the sums of the two halves of `values`.
    ///
    /// `None` for fewer than two points.
    pub fn of(values: &[u64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let mid = values.len() / 2;
        let first: u64 = values[..mid].iter().sum();
        let second: u64 = values[mid..].iter().sum();

        if first == 0 {
            return Some(if second > 0 {
                Trend::Increasing
            } else {
                Trend::Stable
            });
        }

        let change = (second as f64 - first as f64) / first as f64;
        Some(if change > TREND_THRESHOLD {
            Trend::Increasing
        } else if change < -TREND_THRESHOLD {
            Trend::Decreasing
        } else {
            Trend::Stable
        })
    }

    fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Trend::Increasing, Language::English) => "increasing",
            (Trend::Decreasing, Language::English) => "decreasing",
            (Trend::Stable, Language::English) => "stable",
            (Trend::Increasing, Language::Italian) => "in aumento",
            (Trend::Decreasing, Language::Italian) => "in diminuzione",
            (Trend::Stable, Language::Italian) => "stabile",
        }
    }
}

/// Formats an integer with thousands separators for `language`.
fn grouped(n: usize, language: Language) -> String {
    let separator = match language {
        Language::English => ',',
        Language::Italian => '.',
    };
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Index of the largest value, lowest index on ties.
fn argmax(values: &[u64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u64)>, (i, &v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((i, v)),
        })
        .filter(|(_, v)| *v > 0)
        .map(|(i, _)| i)
}

fn activity(stats: &StatsReport, lang: Language, out: &mut Vec<Insight>) {
    let total = stats.total_messages;
    if total == 0 {
        return;
    }
    let it = lang == Language::Italian;

    out.push(Insight::new(
        if it { "Messaggi Totali" } else { "Total Messages" },
        if it {
            format!("La tua conversazione contiene {} messaggi", grouped(total, lang))
        } else {
            format!("Your conversation contains {} messages", grouped(total, lang))
        },
        InsightCategory::Activity,
        total,
    ));

    let (Some(start), Some(end)) = (stats.date_range.start, stats.date_range.end) else {
        return;
    };
    let days = (end - start).num_days();
    let date_format = if it { "%d/%m/%Y" } else { "%Y-%m-%d" };
    let (start_str, end_str) = (start.format(date_format), end.format(date_format));

    out.push(Insight::new(
        if it { "Durata Conversazione" } else { "Conversation Duration" },
        if it {
            format!("La conversazione copre {days} giorni (dal {start_str} al {end_str})")
        } else {
            format!("The conversation spans {days} days (from {start_str} to {end_str})")
        },
        InsightCategory::Activity,
        days,
    ));

    let avg_per_day = if days > 0 {
        total as f64 / days as f64
    } else {
        total as f64
    };
    out.push(Insight::new(
        if it { "Attività Media" } else { "Average Activity" },
        if it {
            format!("In media, {avg_per_day:.1} messaggi vengono inviati al giorno")
        } else {
            format!("On average, {avg_per_day:.1} messages are sent per day")
        },
        InsightCategory::Activity,
        (avg_per_day * 10.0).round() / 10.0,
    ));
}

fn authors(stats: &StatsReport, lang: Language, out: &mut Vec<Insight>) {
    let Some(top) = stats.top_author() else {
        return;
    };
    let it = lang == Language::Italian;
    let percentage = top.message_count as f64 / stats.total_messages as f64 * 100.0;

    out.push(Insight::new(
        if it { "Partecipante Più Attivo" } else { "Most Active Participant" },
        if it {
            format!(
                "{} ha inviato più messaggi ({} messaggi, {percentage:.1}% del totale)",
                top.author,
                grouped(top.message_count, lang)
            )
        } else {
            format!(
                "{} sent the most messages ({} messages, {percentage:.1}% of total)",
                top.author,
                grouped(top.message_count, lang)
            )
        },
        InsightCategory::Authors,
        top.author.as_str(),
    ));

    if stats.total_authors > 1 {
        let count = stats.total_authors;
        let most = grouped(top.message_count, lang);
        out.push(Insight::new(
            if it { "Bilanciamento Partecipazione" } else { "Participation Balance" },
            if it {
                format!(
                    "I messaggi sono distribuiti tra {count} partecipanti, con {most} messaggi dal membro più attivo"
                )
            } else {
                format!(
                    "Messages are distributed among {count} participants, with {most} messages from the most active member"
                )
            },
            InsightCategory::Authors,
            count,
        ));
    }
}

fn temporal(stats: &StatsReport, lang: Language, out: &mut Vec<Insight>) {
    let it = lang == Language::Italian;

    if let Some(hour) = argmax(&stats.hourly) {
        out.push(Insight::new(
            if it { "Ora di Picco" } else { "Peak Conversation Hour" },
            if it {
                format!("La maggior parte dei messaggi viene inviata intorno alle {hour}:00")
            } else {
                format!("Most messages are sent around {hour}:00 (hour {hour})")
            },
            InsightCategory::Temporal,
            hour,
        ));
    }

    if let Some(day) = argmax(&stats.weekday) {
        let name = if it { WEEKDAYS_IT[day] } else { WEEKDAYS_EN[day] };
        out.push(Insight::new(
            if it { "Giorno Più Attivo" } else { "Most Active Day" },
            if it {
                format!("{name} è il giorno più attivo della settimana")
            } else {
                format!("{name} is the most active day of the week")
            },
            InsightCategory::Temporal,
            name,
        ));
    }

    let values: Vec<u64> = stats.time_series.iter().map(|p| p.value).collect();
    if let Some(trend) = Trend::of(&values) {
        let label = trend.label(lang);
        out.push(Insight::new(
            if it { "Tendenza Attività" } else { "Activity Trend" },
            if it {
                format!("L'attività della conversazione è {label} nel tempo")
            } else {
                format!("Conversation activity is {label} over time")
            },
            InsightCategory::Temporal,
            label,
        ));
    }
}

fn words(
    stats: &StatsReport,
    words: Option<&WordFrequencyReport>,
    lang: Language,
    out: &mut Vec<Insight>,
) {
    let it = lang == Language::Italian;

    if let Some(top) = words.and_then(|w| w.words.first()) {
        out.push(Insight::new(
            if it { "Parola Più Usata" } else { "Most Used Word" },
            if it {
                format!("'{}' è la parola più frequente (appare {} volte)", top.word, top.count)
            } else {
                format!(
                    "'{}' is the most frequently used word (appears {} times)",
                    top.word, top.count
                )
            },
            InsightCategory::Words,
            top.word.as_str(),
        ));
    }

    if !stats.message_lengths.is_empty() {
        let sum: usize = stats.message_lengths.iter().sum();
        let avg = sum as f64 / stats.message_lengths.len() as f64;
        out.push(Insight::new(
            if it { "Lunghezza Media Messaggi" } else { "Average Message Length" },
            if it {
                format!("I messaggi hanno in media {avg:.0} caratteri")
            } else {
                format!("Messages average {avg:.0} characters in length")
            },
            InsightCategory::Words,
            avg.round() as i64,
        ));
    }
}

fn patterns(stats: &StatsReport, lang: Language, out: &mut Vec<Insight>) {
    let total = stats.total_messages;
    if total < 2 {
        return;
    }
    let it = lang == Language::Italian;

    let media = &stats.media_stats;
    if media.total_media > 0 {
        let count = grouped(media.total_media, lang);
        let percentage = media.media_percentage;
        out.push(Insight::new(
            if it { "Condivisione Media" } else { "Media Sharing" },
            if it {
                format!("{count} messaggi media sono stati condivisi ({percentage:.1}% di tutti i messaggi)")
            } else {
                format!("{count} media messages were shared ({percentage:.1}% of all messages)")
            },
            InsightCategory::Patterns,
            media.total_media,
        ));
    }

    if total > 10 {
        let level = match (total, lang) {
            (t, Language::English) if t > 1000 => "highly",
            (t, Language::English) if t > 100 => "moderately",
            (_, Language::English) => "lightly",
            (t, Language::Italian) if t > 1000 => "molto",
            (t, Language::Italian) if t > 100 => "moderatamente",
            (_, Language::Italian) => "poco",
        };
        let count = grouped(total, lang);
        out.push(Insight::new(
            if it { "Stile Conversazione" } else { "Conversation Style" },
            if it {
                format!("Con {count} messaggi, questa è una conversazione {level} attiva")
            } else {
                format!("With {count} messages, this is a {level} active conversation")
            },
            InsightCategory::Patterns,
            total,
        ));
    }
}

fn profanity(summary: Option<&BestemmiometroSummary>, lang: Language, out: &mut Vec<Insight>) {
    let Some(summary) = summary.filter(|s| s.total > 0) else {
        return;
    };
    let it = lang == Language::Italian;
    let total = grouped(summary.total, lang);
    let rate = summary.total_per_capita;

    out.push(Insight::new(
        if it { "Bestemmiometro" } else { "Swear-O-Meter" },
        if it {
            format!("Rilevate {total} bestemmie ({rate:.1} ogni 100 messaggi)")
        } else {
            format!("{total} swear words detected ({rate:.1} per 100 messages)")
        },
        InsightCategory::Profanity,
        summary.total,
    ));

    if let Some((author, rate)) = summary.top_per_capita() {
        out.push(Insight::new(
            if it { "Campione di Bestemmie" } else { "Top Swearer" },
            if it {
                format!("{author} è in testa con {rate:.2} ogni 100 messaggi")
            } else {
                format!("{author} leads with {rate:.2} per 100 messages")
            },
            InsightCategory::Profanity,
            author,
        ));
    }
}

/// Generates insights in the fixed category order.
///
/// # Example
///
/// ```
/// use chatmetrics::config::Language;
/// use chatmetrics::core::filter::Filter;
/// use chatmetrics::core::insights::{InsightCategory, generate};
/// use chatmetrics::core::stats::aggregate;
/// use chatmetrics::Message;
/// use chrono::{TimeZone, Utc};
///
/// # fn main() -> chatmetrics::Result<()> {
/// let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
/// let messages = vec![Message::new("Alice", "ciao", ts), Message::new("Bob", "ehi", ts)];
/// let stats = aggregate(&messages, &Filter::new())?;
///
/// let insights = generate(&stats, None, None, Language::English);
/// assert_eq!(insights[0].category, InsightCategory::Activity);
/// assert_eq!(insights[0].description, "Your conversation contains 2 messages");
/// # Ok(())
/// # }
/// ```
pub fn generate(
    stats: &StatsReport,
    word_report: Option<&WordFrequencyReport>,
    bestemmiometro: Option<&BestemmiometroSummary>,
    language: Language,
) -> Vec<Insight> {
    let mut out = Vec::new();
    if stats.total_messages == 0 {
        return out;
    }
    activity(stats, language, &mut out);
    authors(stats, language, &mut out);
    temporal(stats, language, &mut out);
    words(stats, word_report, language, &mut out);
    patterns(stats, language, &mut out);
    profanity(bestemmiometro, language, &mut out);
    out
}

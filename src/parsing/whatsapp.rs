//! Line-level WhatsApp parsing utilities.
//!
//! Every line of an export is either the start of a new record or a
//! continuation of the previous one. [`LineClassifier`] makes that decision;
//! the helpers below turn the captured date/time strings into timestamps and
//! recognize system events and media placeholders.
//!
//! Supported line starts:
//! - Dash: `15/01/2024, 10:30 - Sender: Message`
//! - Bracketed: `[15.01.24, 10:30:45] Sender: Message`
//! - US with AM/PM: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - ISO: `2024-01-15, 10:30 - Sender: Message`

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

use crate::config::DateOrder;

const DATE: &str = r"(\d{1,4}[./-]\d{1,2}[./-]\d{1,4})";
const TIME: &str = r"(\d{1,2}[:.]\d{2}(?:[:.]\d{2})?(?:\s?[AaPp]\.?\s?[Mm]\.?)?)";

static DASH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{DATE},?\s+{TIME}\s+[-–]\s+(.*)$")).expect("dash line pattern")
});

static BRACKET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\[{DATE},?\s+{TIME}\]\s*(.*)$")).expect("bracket line pattern")
});

static AUTHORED_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]{1,80}?):\s*(.*)$").expect("authored body pattern"));

static EVENT_ACTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+?)\s+(?:added|removed|created|left|changed|joined|deleted|ha aggiunto|ha rimosso|ha creato|ha abbandonato|ha modificato|ha cambiato|ha eliminato|è uscito|è uscita|si è unito|si è unita)\b",
    )
    .expect("event actor pattern")
});

/// Characters WhatsApp sprinkles into exports that carry no content.
const INVISIBLE: [char; 5] = ['\u{200e}', '\u{200f}', '\u{202a}', '\u{202c}', '\u{feff}'];

/// Phrases of membership and administrative events, English and Italian.
///
/// Matched against the would-be author part of a line, which catches events
/// whose text happens to contain a colon (`Alice changed the subject to: x`).
const EVENT_PHRASES: &[&str] = &[
    "created group",
    "created this group",
    " added ",
    " removed ",
    " left",
    "changed the subject",
    "changed this group's icon",
    "changed the group description",
    "deleted this group's icon",
    "changed their phone number",
    "joined using this group's invite link",
    "is now an admin",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "ha creato il gruppo",
    "ha creato questo gruppo",
    "ha aggiunto",
    "ti ha aggiunto",
    "ha rimosso",
    "ha abbandonato",
    "ha modificato",
    "ha cambiato",
    "è uscito",
    "è uscita",
    "si è unito",
    "si è unita",
];

/// Notices that can appear with an author prefix but are not user messages.
const SYSTEM_NOTICES: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "messages to this group are now secured with end-to-end encryption",
    "security code changed",
    "your security code with",
    "joined using this group's invite link",
    "crittografati end-to-end",
    "crittografate end-to-end",
    "il tuo codice di sicurezza",
    "codice di sicurezza è cambiato",
    "si è unito tramite il link d'invito",
    "si è unita tramite il link d'invito",
];

/// Attachment placeholders, English and Italian. A body is media only when it
/// is one of these in full.
const MEDIA_MARKERS: &[&str] = &[
    // English
    "<media omitted>",
    "media omitted",
    "<image omitted>",
    "image omitted",
    "<video omitted>",
    "video omitted",
    "<audio omitted>",
    "audio omitted",
    "<sticker omitted>",
    "sticker omitted",
    "<gif omitted>",
    "gif omitted",
    "<document omitted>",
    "document omitted",
    "<contact card omitted>",
    "contact card omitted",
    // Italian
    "<media non incluso>",
    "media non incluso",
    "<media omessi>",
    "media omessi",
    "immagine omessa",
    "video omesso",
    "audio omesso",
    "sticker omesso",
    "sticker non incluso",
    "gif omessa",
    "documento omesso",
    "scheda contatto omessa",
    "file multimediale omesso",
];

/// Openers of iOS attachment lines such as `<attached: 0012-PHOTO.jpg>`.
const ATTACHMENT_PREFIXES: &[&str] = &["<attached:", "<allegato:"];

/// Which of the two line-start shapes matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    /// `date, time - body`
    Dash,
    /// `[date, time] body`
    Bracket,
}

/// Captured pieces of a record-starting line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStart<'a> {
    /// Shape of the line start.
    pub shape: LineShape,
    /// Raw date, e.g. `15/01/24`.
    pub date: &'a str,
    /// Raw time, e.g. `10:30:45 PM`.
    pub time: &'a str,
    /// Author label, `None` for authorless system events.
    pub author: Option<&'a str>,
    /// Text after the author separator (or the whole event text).
    pub text: &'a str,
}

impl LineStart<'_> {
    /// Returns `true` if this line is a system event rather than a message.
    pub fn is_system(&self) -> bool {
        match self.author {
            None => true,
            Some(_) => is_system_notice(self.text),
        }
    }

    /// Returns `true` if the text is an attachment placeholder.
    pub fn is_media(&self) -> bool {
        self.author.is_some() && is_media_placeholder(self.text)
    }

    /// Author to attribute this line to.
    ///
    /// For authorless events the actor is extracted from the event text
    /// (`Alice added Bob` → `Alice`), falling back to `System`.
    pub fn attributed_author(&self) -> String {
        match self.author {
            Some(author) => author.trim().to_string(),
            None => extract_event_actor(self.text),
        }
    }
}

/// Two-state classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// The line opens a new record.
    Start(LineStart<'a>),
    /// The line extends the previous record.
    Continuation(&'a str),
}

/// Classifies normalized lines as record starts or continuations.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineClassifier;

impl LineClassifier {
    /// Creates a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classifies one line. Callers normalize it first with [`normalize_line`].
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let (shape, caps) = if let Some(caps) = DASH_LINE.captures(line) {
            (LineShape::Dash, caps)
        } else if let Some(caps) = BRACKET_LINE.captures(line) {
            (LineShape::Bracket, caps)
        } else {
            return LineKind::Continuation(line);
        };

        let (Some(date), Some(time)) = (caps.get(1), caps.get(2)) else {
            return LineKind::Continuation(line);
        };
        let body = caps.get(3).map_or("", |m| m.as_str());
        let (author, text) = split_author(body);

        LineKind::Start(LineStart {
            shape,
            date: date.as_str(),
            time: time.as_str(),
            author,
            text,
        })
    }
}

/// Splits `Author: text` into its parts.
///
/// Returns `(None, body)` when there is no author separator, or when the
/// would-be author is actually an event phrase.
fn split_author(body: &str) -> (Option<&str>, &str) {
    let Some(caps) = AUTHORED_BODY.captures(body) else {
        return (None, body);
    };
    let Some(author) = caps.get(1) else {
        return (None, body);
    };
    let candidate = author.as_str().trim();
    if candidate.is_empty() || is_event_phrase(candidate) {
        return (None, body);
    }
    let text = caps.get(2).map_or("", |m| m.as_str());
    (Some(candidate), text)
}

fn is_event_phrase(text: &str) -> bool {
    let padded = format!(" {} ", text.to_lowercase());
    EVENT_PHRASES.iter().any(|phrase| padded.contains(phrase))
}

/// Strips invisible direction marks and normalizes exotic spaces.
pub fn normalize_line(line: &str) -> String {
    line.chars()
        .filter(|c| !INVISIBLE.contains(c))
        .map(|c| if c == '\u{202f}' || c == '\u{a0}' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Check if an authored text is an administrative notice.
///
/// A notice either opens the body or ends a sentence
/// (`Marco's security code changed. Tap to learn more.`).
pub fn is_system_notice(text: &str) -> bool {
    let lower = text
        .chars()
        .filter(|c| !INVISIBLE.contains(c))
        .collect::<String>()
        .trim()
        .to_lowercase();
    SYSTEM_NOTICES.iter().any(|notice| {
        lower.starts_with(notice)
            || lower.match_indices(notice).any(|(at, _)| {
                let rest = &lower[at + notice.len()..];
                rest.is_empty() || rest.starts_with('.')
            })
    })
}

/// Check if a text is a "media omitted" placeholder.
///
/// The whole body must be the placeholder; a message that merely mentions
/// `video omesso` is text.
pub fn is_media_placeholder(text: &str) -> bool {
    let lower = text
        .chars()
        .filter(|c| !INVISIBLE.contains(c))
        .collect::<String>()
        .trim()
        .to_lowercase();
    MEDIA_MARKERS.contains(&lower.as_str())
        || (lower.ends_with('>')
            && ATTACHMENT_PREFIXES
                .iter()
                .any(|prefix| lower.starts_with(prefix)))
}

/// Extracts the acting author from an event text, or `System`.
pub fn extract_event_actor(text: &str) -> String {
    EVENT_ACTOR
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|actor| !actor.is_empty() && !actor.contains(':'))
        .unwrap_or_else(|| "System".to_string())
}

/// Splits a raw date into its three numeric fields.
fn date_fields(date: &str) -> Option<[&str; 3]> {
    let mut parts = date.split(['/', '.', '-']);
    let fields = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

/// Auto-detect the day/month order over the dates of a transcript.
///
/// Any first field above 12 proves day-first; otherwise any second field
/// above 12 proves month-first; otherwise day-first is assumed.
pub fn detect_date_order<'a>(dates: impl IntoIterator<Item = &'a str>) -> DateOrder {
    let mut month_first_seen = false;

    for date in dates {
        let Some([first, second, _]) = date_fields(date) else {
            continue;
        };
        if first.len() == 4 {
            continue;
        }
        let (Ok(first), Ok(second)) = (first.parse::<u32>(), second.parse::<u32>()) else {
            continue;
        };
        if first > 12 {
            return DateOrder::DayFirst;
        }
        if second > 12 {
            month_first_seen = true;
        }
    }

    if month_first_seen {
        DateOrder::MonthFirst
    } else {
        DateOrder::DayFirst
    }
}

fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(match raw.len() {
        1 | 2 if year <= 50 => 2000 + year,
        1 | 2 => 1900 + year,
        _ => year,
    })
}

fn parse_date(date: &str, order: DateOrder) -> Option<NaiveDate> {
    let [a, b, c] = date_fields(date)?;

    if a.len() == 4 {
        return NaiveDate::from_ymd_opt(a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);
    }

    let first: u32 = a.parse().ok()?;
    let second: u32 = b.parse().ok()?;
    let year = expand_year(c)?;
    let (month, day) = match order {
        DateOrder::DayFirst => (second, first),
        DateOrder::MonthFirst => (first, second),
    };

    NaiveDate::from_ymd_opt(year, month, day).or_else(|| NaiveDate::from_ymd_opt(year, day, month))
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    let lower = time.to_lowercase();
    let meridiem = if lower.contains('p') {
        Some(true)
    } else if lower.contains('a') {
        Some(false)
    } else {
        None
    };

    let digits: String = lower
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ':' || *c == '.')
        .collect();
    let mut fields = digits.split([':', '.']);
    let mut hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = fields.next()?.parse().ok()?;
    let second: u32 = match fields.next() {
        Some(s) if !s.is_empty() => s.parse().ok()?,
        _ => 0,
    };

    match meridiem {
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Parse timestamp from date and time strings.
///
/// Returns `None` when the date is impossible in both field orders or the
/// time is out of range.
pub fn parse_whatsapp_timestamp(date: &str, time: &str, order: DateOrder) -> Option<DateTime<Utc>> {
    let date = parse_date(date, order)?;
    let time = parse_time(time)?;
    Some(date.and_time(time).and_utc())
}

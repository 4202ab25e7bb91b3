//! Vowel elongation ("climax") detection.
//!
//! A climax is a run of three or more identical vowels, as in `diooooo` or
//! `madonnaaaa`. The regex crate has no backreferences, so runs are found
//! with a plain scan over the characters.

/// Vowels considered for elongation, accented Italian forms included.
const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'à', 'è', 'é', 'ì', 'ò', 'ó', 'ù'];

/// Shortest run that counts as a climax.
pub const MIN_REPETITIONS: usize = 3;

/// One elongated vowel run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimaxRun {
    /// The word around the run.
    pub snippet: String,
    /// Length of the run.
    pub repetitions: usize,
}

impl ClimaxRun {
    /// `clamp(repetitions - 2, 1, 5)`.
    pub fn intensity(&self) -> u8 {
        intensity(self.repetitions)
    }
}

/// Intensity score of a run of `repetitions` vowels.
pub fn intensity(repetitions: usize) -> u8 {
    repetitions.saturating_sub(2).clamp(1, 5) as u8
}

/// Finds every run of at least three identical vowels in `text`.
///
/// # Example
///
/// ```
/// use chatmetrics::core::bestemmiometro::climax::find_climaxes;
///
/// let runs = find_climaxes("porco dioooo");
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].snippet, "dioooo");
/// assert_eq!(runs[0].repetitions, 4);
/// assert_eq!(runs[0].intensity(), 2);
/// ```
pub fn find_climaxes(text: &str) -> Vec<ClimaxRun> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut runs = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut end = i + 1;
        while end < chars.len() && chars[end] == c {
            end += 1;
        }

        let repetitions = end - i;
        if repetitions >= MIN_REPETITIONS && VOWELS.contains(&c) {
            let mut word_start = i;
            while word_start > 0 && chars[word_start - 1].is_alphanumeric() {
                word_start -= 1;
            }
            let mut word_end = end;
            while word_end < chars.len() && chars[word_end].is_alphanumeric() {
                word_end += 1;
            }
            runs.push(ClimaxRun {
                snippet: chars[word_start..word_end].iter().collect(),
                repetitions,
            });
        }

        i = end;
    }

    runs
}

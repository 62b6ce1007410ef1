//! Hanzi → Hanyu Pinyin with tone diacritics, for display only.
//!
//! Component words carry no pinyin in the vocabulary sheet, so feedback
//! derives one locally. Readings are per character (no word segmentation),
//! so polyphonic characters get their default reading.
//!
//! Example:
//!   "加油站 24h" → "jiā yóu zhàn 24h"
use pinyin::ToPinyin;

/// Convert text to tone-marked pinyin, space-separated between Hanzi.
/// Non-Chinese characters are copied as-is.
pub fn to_pinyin_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut last_was_hanzi = false;

    for ch in text.chars() {
        match ch.to_pinyin() {
            Some(py) => {
                if last_was_hanzi {
                    out.push(' ');
                }
                out.push_str(py.with_tone());
                last_was_hanzi = true;
            }
            None => {
                out.push(ch);
                last_was_hanzi = false;
            }
        }
    }

    out
}

/// Pinyin for a word that should be all Hanzi; `None` if any character has no reading.
pub fn word_pinyin(word: &str) -> Option<String> {
    let syllables: Option<Vec<&'static str>> = word
        .chars()
        .map(|ch| ch.to_pinyin().map(|py| py.with_tone()))
        .collect();
    syllables.filter(|s| !s.is_empty()).map(|s| s.join(" "))
}

//! Stem patterns: fixed-length templates of known letters and blanks.
//!
//! A stem such as `"_ OY A L"` or `"HON__"` is compiled to an anchored,
//! case-insensitive regex where every `_` matches exactly one character and
//! whitespace is ignored. `"_ OY A L"` becomes `(?i)^.oyal$`.

use regex::Regex;

use crate::corpus::Corpus;
use crate::error::{PatternError, PatternResult};

/// The symbol standing for one unknown letter.
pub const PLACEHOLDER: char = '_';

/// A compiled stem pattern.
#[derive(Debug, Clone)]
pub struct StemPattern {
    stem: String,
    regex: Regex,
    len: usize,
    placeholders: usize,
}

impl StemPattern {
    /// Compile `stem`.
    ///
    /// Letters (any script), apostrophes and hyphens are literals; `_` is a
    /// placeholder; whitespace is dropped. Anything else is rejected so that
    /// a typo never silently turns into a regex operator.
    ///
    /// An empty stem compiles to a pattern that matches no corpus word.
    pub fn compile(stem: &str) -> PatternResult<Self> {
        let mut source = String::from("(?i)^");
        let mut len = 0;
        let mut placeholders = 0;

        for (position, c) in stem.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            len += 1;
            if c == PLACEHOLDER {
                placeholders += 1;
                source.push('.');
            } else if is_literal(c) {
                source.push_str(&regex::escape(&fold(c).to_string()));
            } else {
                return Err(PatternError::UnexpectedSymbol {
                    stem: stem.to_string(),
                    symbol: c,
                    position,
                });
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::Compile {
            stem: stem.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            stem: stem.to_string(),
            regex,
            len,
            placeholders,
        })
    }

    /// The stem exactly as given.
    pub fn as_str(&self) -> &str {
        &self.stem
    }

    /// Number of characters a matching word has (whitespace excluded).
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the stem has no characters besides whitespace.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of placeholder positions.
    pub const fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// The compiled regex source.
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether `word`, with its internal whitespace removed, fills the stem.
    pub fn is_match(&self, word: &str) -> bool {
        if word.chars().any(char::is_whitespace) {
            let cleaned: String = word.split_whitespace().collect();
            self.regex.is_match(&cleaned)
        } else {
            self.regex.is_match(word)
        }
    }

    /// Every corpus word filling the stem, in corpus order.
    pub fn matches<'c>(&'c self, corpus: &'c Corpus) -> impl Iterator<Item = &'c str> + 'c {
        corpus.words().filter(|word| self.is_match(word))
    }
}

impl std::fmt::Display for StemPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.stem)
    }
}

/// Lowercase `c` only when that keeps it a single character (`İ` stays as is).
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn is_literal(c: char) -> bool {
    c.is_alphabetic() || c == '\'' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn corpus(words: &[&str]) -> Corpus {
        Corpus::new(words.iter().copied(), HashMap::new())
    }

    #[test]
    fn spaced_stem_compiles_to_anchored_regex() {
        let pattern = StemPattern::compile("_ OY A L").unwrap();
        assert_eq!(pattern.regex(), "(?i)^.oyal$");
        assert_eq!(pattern.len(), 5);
        assert_eq!(pattern.placeholders(), 1);
        assert_eq!(pattern.as_str(), "_ OY A L");
    }

    #[test]
    fn placeholders_fix_positions_and_length() {
        let pattern = StemPattern::compile("HON__").unwrap();
        let c = corpus(&["honor", "honey", "hongs", "hon", "honors", "phone"]);
        let found: Vec<&str> = pattern.matches(&c).collect();
        assert_eq!(found, vec!["honey", "hongs", "honor"]);
    }

    #[test]
    fn literal_stem_matches_only_itself() {
        let pattern = StemPattern::compile("Calm").unwrap();
        let c = corpus(&["calm", "calms", "palm"]);
        assert_eq!(pattern.matches(&c).collect::<Vec<_>>(), vec!["calm"]);
    }

    #[test]
    fn all_placeholders_match_every_word_of_that_length() {
        let pattern = StemPattern::compile("____").unwrap();
        let c = corpus(&["calm", "palm", "fir", "fires", "warm"]);
        assert_eq!(pattern.matches(&c).count(), 3);
    }

    #[test]
    fn empty_stem_matches_nothing() {
        let pattern = StemPattern::compile("   ").unwrap();
        assert!(pattern.is_empty());
        let c = corpus(&["a", "calm"]);
        assert_eq!(pattern.matches(&c).count(), 0);
    }

    #[test]
    fn matching_ignores_case_and_word_whitespace() {
        let pattern = StemPattern::compile("_alm").unwrap();
        assert!(pattern.is_match("CALM"));
        assert!(pattern.is_match("c alm"));
        assert!(!pattern.is_match("calmer"));
    }

    #[test]
    fn every_literal_position_is_respected() {
        let pattern = StemPattern::compile("L_VLEY").unwrap();
        let c = corpus(&["lovley", "livley", "lovely", "lively"]);
        for word in pattern.matches(&c) {
            let chars: Vec<char> = word.chars().collect();
            assert_eq!(chars.len(), 6);
            assert_eq!(chars[0], 'l');
            assert_eq!(&word[2..], "vley");
        }
        assert_eq!(pattern.matches(&c).count(), 2);
    }

    #[test]
    fn multi_char_lowercase_keeps_pattern_length() {
        let pattern = StemPattern::compile("_İ").unwrap();
        assert_eq!(pattern.len(), 2);
        assert!(!pattern.regex().contains('\u{307}'));
        assert!(pattern.is_match("xİ"));
        assert!(!pattern.is_match("xi\u{307}"));
    }

    #[test]
    fn regex_metacharacters_are_rejected() {
        let err = StemPattern::compile("HO.(").unwrap_err();
        assert_eq!(
            err,
            PatternError::UnexpectedSymbol {
                stem: "HO.(".to_string(),
                symbol: '.',
                position: 2,
            }
        );
    }

    #[test]
    fn apostrophes_and_hyphens_are_literals() {
        let pattern = StemPattern::compile("CAN'_").unwrap();
        assert!(pattern.is_match("can't"));
        let pattern = StemPattern::compile("X-RA_").unwrap();
        assert!(pattern.is_match("x-ray"));
    }

    #[test]
    fn matching_is_idempotent() {
        let pattern = StemPattern::compile("_AIR").unwrap();
        let c = corpus(&["fair", "hair", "pair", "heir"]);
        let first: Vec<&str> = pattern.matches(&c).collect();
        let second: Vec<&str> = pattern.matches(&c).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}

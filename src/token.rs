use serde::{Deserialize, Serialize};

/// One temporal unit of a Morse transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Dot,       // .
    Dash,      // -
    LetterGap, // ' '
    WordGap,   // /
}

impl Symbol {
    pub fn from_char(ch: char) -> Option<Symbol> {
        match ch {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            ' ' => Some(Symbol::LetterGap),
            '/' => Some(Symbol::WordGap),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
            Symbol::LetterGap => ' ',
            Symbol::WordGap => '/',
        }
    }

    /// Dots and dashes sound; gaps are silence only.
    pub fn is_tone(self) -> bool {
        matches!(self, Symbol::Dot | Symbol::Dash)
    }
}

/// Split an encoded string into one symbol per character.
///
/// Every character is its own token, so the single space the codec puts
/// between letters becomes a `LetterGap` and each side of a `/` separator
/// contributes one too. Characters outside the four-symbol alphabet never
/// come out of the codec and are skipped.
pub fn tokenize(encoded: &str) -> Vec<Symbol> {
    encoded
        .chars()
        .filter_map(|ch| {
            let symbol = Symbol::from_char(ch);
            if symbol.is_none() {
                log::trace!("skipping non-morse character {ch:?}");
            }
            symbol
        })
        .collect()
}

/// Convert a symbol sequence back to its encoded representation.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.to_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_one_token_per_char() {
        let tokens = tokenize("... ---");
        assert_eq!(
            tokens,
            vec![
                Symbol::Dot,
                Symbol::Dot,
                Symbol::Dot,
                Symbol::LetterGap,
                Symbol::Dash,
                Symbol::Dash,
                Symbol::Dash,
            ]
        );
    }

    #[test]
    fn word_separator_keeps_surrounding_spaces() {
        // "E E" encodes to ". / ." — both spaces are letter gaps.
        let tokens = tokenize(". / .");
        assert_eq!(
            tokens,
            vec![
                Symbol::Dot,
                Symbol::LetterGap,
                Symbol::WordGap,
                Symbol::LetterGap,
                Symbol::Dot,
            ]
        );
    }

    #[test]
    fn tokenize_skips_foreign_chars() {
        assert_eq!(tokenize(".x-"), vec![Symbol::Dot, Symbol::Dash]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn symbols_round_trip_through_chars() {
        let src = ".-- / -.";
        assert_eq!(symbols_to_string(&tokenize(src)), src);
        assert!(Symbol::Dash.is_tone());
        assert!(!Symbol::WordGap.is_tone());
    }
}

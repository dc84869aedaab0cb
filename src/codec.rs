//! Text ↔ Morse codec.
//!
//! Encoding is lossy by policy: characters outside A–Z, 0–9 and space
//! encode to an empty group and decode never fails.

use serde::Serialize;

/// The word separator symbol a space encodes to.
pub const WORD_SEPARATOR: &str = "/";

const MORSE_TABLE: [(char, &str); 37] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    (' ', WORD_SEPARATOR),
];

/// Symbol group for an (already uppercased) character.
pub fn lookup(ch: char) -> Option<&'static str> {
    MORSE_TABLE
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, code)| *code)
}

/// Character for a symbol group.
pub fn reverse_lookup(code: &str) -> Option<char> {
    MORSE_TABLE
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(ch, _)| *ch)
}

/// Encode text to Morse: one group per UTF-16 unit, joined by single spaces.
///
/// Every mapped character is a single unit; a character outside the Basic
/// Multilingual Plane leaves two empty groups, as a browser string would.
pub fn encode(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .flat_map(|ch| std::iter::repeat_n(lookup(ch).unwrap_or(""), ch.len_utf16()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode Morse groups separated by single spaces back to text.
pub fn decode(morse: &str) -> String {
    morse
        .split(' ')
        .filter_map(reverse_lookup)
        .collect()
}

/// One cell of the on-page reference grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridEntry {
    pub ch: char,
    pub code: &'static str,
}

/// Letters A–Z followed by digits 0–9, in display order.
pub fn reference_grid() -> Vec<GridEntry> {
    ('A'..='Z')
        .chain('0'..='9')
        .filter_map(|ch| lookup(ch).map(|code| GridEntry { ch, code }))
        .collect()
}

//! Reduce user text to the printable ASCII subset the printer fonts render.
//!
//! Three passes, in order:
//! 1. explicit replacements for common Portuguese letters and typographic
//!    punctuation ([`REPLACEMENTS`]),
//! 2. compatibility decomposition (NFKD) with every remaining non-ASCII
//!    code point dropped,
//! 3. removal of anything outside `0x20..=0x7E` (control characters included).
//!
//! The output of [`sanitize`] is a fixed point: sanitizing it again returns
//! the same string.

use unicode_normalization::UnicodeNormalization;

/// Explicit character substitutions applied before decomposition.
pub const REPLACEMENTS: &[(char, &str)] = &[
    ('ç', "c"),
    ('Ç', "C"),
    ('ã', "a"),
    ('Ã', "A"),
    ('á', "a"),
    ('Á', "A"),
    ('à', "a"),
    ('À', "A"),
    ('â', "a"),
    ('Â', "A"),
    ('ä', "a"),
    ('é', "e"),
    ('É', "E"),
    ('ê', "e"),
    ('Ê', "E"),
    ('è', "e"),
    ('í', "i"),
    ('Í', "I"),
    ('ó', "o"),
    ('Ó', "O"),
    ('ô', "o"),
    ('Ô', "O"),
    ('õ', "o"),
    ('Õ', "O"),
    ('ú', "u"),
    ('Ú', "U"),
    ('ü', "u"),
    ('ñ', "n"),
    ('°', " graus"),
    ('º', "o"),
    ('ª', "a"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('«', "\""),
    ('»', "\""),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
];

fn replacement(c: char) -> Option<&'static str> {
    REPLACEMENTS
        .iter()
        .find_map(|&(from, to)| (from == c).then_some(to))
}

/// Sanitize `input` for embedding in label field data.
///
/// ```
/// use food_label_core::sanitize;
///
/// assert_eq!(
///     sanitize("Conservação: -10° a -18°"),
///     "Conservacao: -10 graus a -18 graus"
/// );
/// ```
pub fn sanitize(input: &str) -> String {
    let mut replaced = String::with_capacity(input.len());
    for c in input.chars() {
        match replacement(c) {
            Some(to) => replaced.push_str(to),
            None => replaced.push(c),
        }
    }

    replaced
        .nfkd()
        .filter(char::is_ascii)
        .filter(|c| (' '..='~').contains(c))
        .collect()
}

//! Greedy word wrap for fixed-width label text.

/// Column budget for description lines.
pub const DESCRIPTION_COLUMNS: usize = 30;

/// Split `text` into lines of at most `columns` characters.
///
/// Words are packed greedily: a word joins the current line while the line,
/// a space and the word still fit. A word longer than `columns` is placed on
/// a line of its own and never broken. Runs of whitespace collapse, and
/// whitespace-only input yields no lines.
///
/// ```
/// use food_label_core::wrap_words;
///
/// assert_eq!(
///     wrap_words("Arroz Branco Temperado com Legumes e Batata", 30),
///     ["Arroz Branco Temperado com", "Legumes e Batata"]
/// );
/// ```
pub fn wrap_words(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= columns {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

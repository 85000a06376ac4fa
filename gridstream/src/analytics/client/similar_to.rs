use regex::Regex;

/// Translates a SQL `SIMILAR TO` pattern into an anchored regex.
/// `%` matches any run, `_` any single char and `|` separates alternatives.
pub(crate) fn similar_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push_str("^(?:");
    for ch in pattern.chars() {
        match ch {
            '%' => translated.push_str(".*"),
            '_' => translated.push('.'),
            '|' => translated.push('|'),
            other => translated.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    translated.push_str(")$");
    Regex::new(&translated)
}

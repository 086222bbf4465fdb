/// Splits text on Unicode whitespace. Case and punctuation are kept as written,
/// so `Fintech` and `fintech,` are distinct terms.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

use std::collections::HashSet;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "in", "on", "at", "for", "to", "with", "and", "or",
    "this", "that", "of", "by", "it", "its", "as", "was", "were", "be",
];

/// Splits free text into index terms.
///
/// Lowercases the input, removes ASCII punctuation (so `"e-mail"` becomes
/// `"email"`), splits on whitespace and drops stop words. Order and repeated
/// terms are preserved; position assignment is left to the caller.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<&'static str>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { stopwords: STOPWORDS.iter().copied().collect() }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        normalized
            .split(is_separator)
            .filter(|word| !word.is_empty() && !self.is_stopword(word))
            .map(str::to_string)
            .collect()
    }

    /// Tokens paired with their 0-based ordinal in the filtered sequence.
    pub fn positions(&self, text: &str) -> impl Iterator<Item = (usize, String)> {
        self.tokenize(text).into_iter().enumerate()
    }
}

/// Unicode whitespace plus the ASCII information separators (U+001C..U+001F).
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apostrophes_are_removed_before_stopword_check() {
        // "it's" becomes "its", which is itself a stop word
        let t = Tokenizer::new().tokenize("It's the seller's best-seller");
        assert_eq!(t, vec!["sellers", "bestseller"]);
    }

    #[test]
    fn information_separators_split_words() {
        let t = Tokenizer::new().tokenize("red\u{1c}car\u{1f}road\u{a0}lamp");
        assert_eq!(t, vec!["red", "car", "road", "lamp"]);
    }

    #[test]
    fn positions_skip_stopwords() {
        let pos: Vec<_> = Tokenizer::new().positions("the box and the box").collect();
        assert_eq!(pos, vec![(0, "box".to_string()), (1, "box".to_string())]);
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert!(Tokenizer::new().tokenize("... --- !!!").is_empty());
        assert!(Tokenizer::new().tokenize("").is_empty());
    }
}

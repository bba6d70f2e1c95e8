pub const DEFAULT_MAX_CHUNK_WORDS: usize = 500;

/// Collapse every run of whitespace (including newlines) into a single
/// space and trim the ends. Idempotent; empty input yields empty output.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Partition normalized text into consecutive groups of at most `max_words`
/// whitespace-delimited words, each rejoined with single spaces and kept in
/// original order. The last chunk may be shorter. Pure and stateless.
pub fn chunk_text(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(max_words)
        .map(|group| group.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_normalized() {
        let input = "A  \t  lot\nof   spacing";
        let normalized = normalize_whitespace(input);
        assert_eq!(normalized, "A lot of spacing");
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = "  leading\n\nand trailing\t ";
        let once = normalize_whitespace(input);
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 500).is_empty());
        assert!(chunk_text("   \n ", 500).is_empty());
    }

    #[test]
    fn chunks_respect_word_bound() {
        let text = (0..12).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_text(&text, 5);

        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.split_whitespace().count() <= 5);
        }
        assert_eq!(chunks[2].split_whitespace().count(), 2);
    }

    #[test]
    fn joined_chunks_reconstruct_normalized_text() {
        let text = "alpha   beta\tgamma\ndelta epsilon";
        let normalized = normalize_whitespace(text);
        let chunks = chunk_text(&normalized, 2);
        assert_eq!(chunks.join(" "), normalized);
    }

    #[test]
    fn six_hundred_words_split_into_five_hundred_and_one_hundred() {
        let text = (0..600).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_text(&text, DEFAULT_MAX_CHUNK_WORDS);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].split_whitespace().count(), 500);
        assert_eq!(chunks[1].split_whitespace().count(), 100);
    }
}

use regex::Regex;
use std::sync::OnceLock;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?ix)
            \b(?:
                \d{1,2}(?:st|nd|rd|th)?        # 1st, 2nd, 3rd, 10th
                (?:\s+day\s+of)?               # optional 'day of'
                \s+\w+\s*,?\s*\d{4}            # August, 2025 or August 2025
                |
                \w+\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}  # August 1, 2025
                |
                \d{4}-\d{2}-\d{2}              # ISO: 2025-08-01
                |
                \d{1,2}/\d{1,2}/\d{4}          # 01/08/2025
            )\b",
        )
        .expect("date pattern compiles")
    })
}

/// Find every date spelling in the text, non-overlapping and in order of
/// appearance. Each occurrence is reported independently; duplicates stay.
pub fn extract_dates(text: &str) -> Vec<String> {
    date_pattern()
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

use regex::Regex;
use std::sync::OnceLock;

pub const NO_SUMMARY_MESSAGE: &str = "No clear summary found.";

const VALUE_CAP_CHARS: usize = 300;

fn section_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            ("Purpose", r"(?i)\bpurpose\b\s*[:\-]?\s*([^\n]{1,500})"),
            (
                "Confidentiality",
                r"(?i)\bconfidential(?:ity)?\b(?:\s+information)?\s*[:\-]?\s*([^\n]{1,500})",
            ),
            ("Term", r"(?i)\bterm\b\s*[:\-]?\s*([^\n]{1,500})"),
            ("Obligations", r"(?i)\bobligations?\b\s*[:\-]?\s*([^\n]{1,500})"),
        ]
        .into_iter()
        .map(|(label, pattern)| (label, Regex::new(pattern).expect("section pattern compiles")))
        .collect()
    })
}

fn cap_chars(value: &str, cap: usize) -> String {
    value.chars().take(cap).collect()
}

/// Heuristic section summary: joins the chunks and, for each known section
/// label, captures the prose following the label (stopping at the first
/// newline, capped at 300 characters). Labels that never appear are
/// omitted; when nothing matches a fixed message is returned.
pub fn summarize_document(chunks: &[String]) -> String {
    let text = chunks.join("\n");
    let mut parts = Vec::new();

    for (label, pattern) in section_patterns() {
        if let Some(captures) = pattern.captures(&text) {
            let value = cap_chars(captures[1].trim(), VALUE_CAP_CHARS);
            if !value.is_empty() {
                parts.push(format!("{label}: {value}"));
            }
        }
    }

    if parts.is_empty() {
        NO_SUMMARY_MESSAGE.to_string()
    } else {
        parts.join("\n")
    }
}

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn between_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bbetween\s+(.+?)\s+and\s+(.+?)(?:,|\.|\n|$)")
            .expect("between pattern compiles")
    })
}

fn by_and_between_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bby\s+and\s+between\s+(.+?)\s+and\s+(.+?)(?:,|\.|\n|$)")
            .expect("by-and-between pattern compiles")
    })
}

fn quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"["“]([^"”\n]{2,80})["”]"#).expect("quoted pattern compiles")
    })
}

fn entity_keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:party|company|llp|inc|ltd|corporation)\b")
            .expect("entity keyword pattern compiles")
    })
}

fn role_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:disclosing|receiving)\s+party\s*:\s*([^,\n.]+)")
            .expect("role label pattern compiles")
    })
}

fn role_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"([^\n(]{2,60}?)\s*\(\s*["“]?(?:the\s+)?(?i:disclosing|receiving)\s+(?i:party)["”]?\s*\)"#,
        )
        .expect("role suffix pattern compiles")
    })
}

fn cleanup(candidate: &str) -> Option<String> {
    let trimmed = candidate
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '“' | '”' | '\'' | '(' | ')' | ',' | '.' | ';' | ':'))
        .trim();

    if trimmed.is_empty() || trimmed.len() > 80 {
        return None;
    }
    Some(trimmed.to_string())
}

/// Best-effort extraction of party names from agreement prose. Four
/// independent pattern families are unioned into a deduplicated set of
/// trimmed names: `between X and Y`, `by and between X and Y`, quoted
/// strings carrying a legal-entity keyword, and role-labeled mentions.
pub fn extract_parties(text: &str) -> Vec<String> {
    let mut parties = BTreeSet::new();

    for captures in between_pattern()
        .captures_iter(text)
        .chain(by_and_between_pattern().captures_iter(text))
    {
        for group in [1, 2] {
            if let Some(name) = captures.get(group).and_then(|m| cleanup(m.as_str())) {
                parties.insert(name);
            }
        }
    }

    for captures in quoted_pattern().captures_iter(text) {
        let quoted = &captures[1];
        if entity_keyword_pattern().is_match(quoted) {
            if let Some(name) = cleanup(quoted) {
                parties.insert(name);
            }
        }
    }

    for captures in role_label_pattern()
        .captures_iter(text)
        .chain(role_suffix_pattern().captures_iter(text))
    {
        if let Some(name) = captures.get(1).and_then(|m| cleanup(m.as_str())) {
            parties.insert(name);
        }
    }

    parties.into_iter().collect()
}

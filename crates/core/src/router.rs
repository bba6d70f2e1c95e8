use crate::error::AnswerError;
use crate::tools::ToolRegistry;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*use tool:\s*(\w+)[ \t]*(.*)$").expect("directive pattern compiles")
    })
}

/// Parsed shape of a model response: either plain prose or a request to run
/// a named tool over an input passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Direct(String),
    ToolCall { name: String, input: String },
}

/// Scan the model output line by line for a `use tool:` directive
/// (case-insensitive marker, name of `[A-Za-z0-9_]`, input to end of line).
/// An empty input falls back to `fallback_input` (the original question).
pub fn parse_directive(llm_output: &str, fallback_input: &str) -> Directive {
    for line in llm_output.lines() {
        if let Some(captures) = directive_pattern().captures(line) {
            let name = captures[1].to_string();
            let input = captures[2].trim();
            let input = if input.is_empty() {
                fallback_input.to_string()
            } else {
                input.to_string()
            };
            return Directive::ToolCall { name, input };
        }
    }

    Directive::Direct(llm_output.to_string())
}

/// Outcome of routing a model response through the registered tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// No directive found; the model text passes through unchanged.
    Direct(String),
    /// A registered tool ran; `text` embeds the tool name and its result.
    ToolResult { tool: String, text: String },
    /// The directive named an unregistered tool; the raw model text is kept.
    UnrecognizedTool { tool: String, text: String },
}

impl Routed {
    pub fn into_text(self) -> String {
        match self {
            Routed::Direct(text) => text,
            Routed::ToolResult { text, .. } => text,
            Routed::UnrecognizedTool { text, .. } => text,
        }
    }
}

/// Dispatches parsed directives to the registered extractors.
#[derive(Debug, Clone, Default)]
pub struct ToolRouter {
    registry: ToolRegistry,
}

impl ToolRouter {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn route(&self, llm_output: &str, fallback_input: &str) -> Routed {
        match parse_directive(llm_output, fallback_input) {
            Directive::Direct(text) => Routed::Direct(text),
            Directive::ToolCall { name, input } => match self.registry.run(&name, &input) {
                Some(result) => {
                    debug!(tool = %name, "tool directive dispatched");
                    Routed::ToolResult {
                        text: format!("Tool `{name}` executed.\n\n{result}"),
                        tool: name,
                    }
                }
                None => {
                    let error = AnswerError::ToolNotFound(name.clone());
                    warn!(kind = error.kind(), tool = %name, "directive named an unregistered tool, returning raw answer");
                    Routed::UnrecognizedTool {
                        tool: name,
                        text: llm_output.to_string(),
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_without_marker_passes_through_unchanged() {
        let router = ToolRouter::default();
        let output = "The agreement lasts two years.";
        let routed = router.route(output, "how long is the term?");
        assert_eq!(routed, Routed::Direct(output.to_string()));
    }

    #[test]
    fn dates_directive_dispatches_with_the_line_remainder() {
        let router = ToolRouter::default();
        let routed = router.route("use tool: extract_dates January 1, 2024", "ignored");

        let Routed::ToolResult { tool, text } = routed else {
            panic!("expected a tool result");
        };
        assert_eq!(tool, "extract_dates");
        assert!(text.contains("Tool `extract_dates` executed."));
        assert!(text.contains("January 1, 2024"));
    }

    #[test]
    fn marker_is_case_insensitive_and_may_follow_other_lines() {
        let directive = parse_directive(
            "Let me check.\nUSE TOOL: extract_parties between A Corp and B Inc",
            "fallback",
        );
        assert_eq!(
            directive,
            Directive::ToolCall {
                name: "extract_parties".to_string(),
                input: "between A Corp and B Inc".to_string(),
            }
        );
    }

    #[test]
    fn empty_directive_input_falls_back_to_the_question() {
        let directive = parse_directive("use tool: summarize_document", "summarize the document");
        assert_eq!(
            directive,
            Directive::ToolCall {
                name: "summarize_document".to_string(),
                input: "summarize the document".to_string(),
            }
        );
    }

    #[test]
    fn unregistered_tool_falls_back_to_raw_text() {
        let router = ToolRouter::default();
        let output = "use tool: translate bonjour";
        let routed = router.route(output, "ignored");
        assert_eq!(
            routed,
            Routed::UnrecognizedTool {
                tool: "translate".to_string(),
                text: output.to_string(),
            }
        );
        assert_eq!(routed.into_text(), output);
    }
}

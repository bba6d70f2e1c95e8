pub mod dates;
pub mod parties;
pub mod summary;

pub use dates::extract_dates;
pub use parties::extract_parties;
pub use summary::{summarize_document, NO_SUMMARY_MESSAGE};

/// The specialized extractors a model may request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ExtractDates,
    ExtractParties,
    SummarizeDocument,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ExtractDates => "extract_dates",
            ToolKind::ExtractParties => "extract_parties",
            ToolKind::SummarizeDocument => "summarize_document",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "extract_dates" => Some(ToolKind::ExtractDates),
            "extract_parties" => Some(ToolKind::ExtractParties),
            "summarize_document" => Some(ToolKind::SummarizeDocument),
            _ => None,
        }
    }
}

/// Registered tool set. Directives naming anything outside this set are
/// treated as unrecognized by the router.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolKind>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ToolRegistry {
    /// The full built-in set: dates, parties, summary.
    pub fn builtin() -> Self {
        Self {
            tools: vec![
                ToolKind::ExtractDates,
                ToolKind::ExtractParties,
                ToolKind::SummarizeDocument,
            ],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        ToolKind::from_name(name).is_some_and(|kind| self.tools.contains(&kind))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(ToolKind::name).collect()
    }

    /// Run the named tool over the input passage and render its result as
    /// display text. `None` when the name is not registered.
    pub fn run(&self, name: &str, input: &str) -> Option<String> {
        let kind = ToolKind::from_name(name).filter(|kind| self.tools.contains(kind))?;

        let rendered = match kind {
            ToolKind::ExtractDates => render_listing(&extract_dates(input), "No dates found."),
            ToolKind::ExtractParties => {
                render_listing(&extract_parties(input), "No parties found.")
            }
            ToolKind::SummarizeDocument => summarize_document(&[input.to_string()]),
        };

        Some(rendered)
    }
}

fn render_listing(items: &[String], empty_message: &str) -> String {
    if items.is_empty() {
        return empty_message.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

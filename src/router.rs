//! Keyword router that picks an agent profile for a prompt.

use std::fmt;

const FINANCE_KEYWORDS: [&str; 4] = ["stock", "ticker", "price", "market"];
const MATH_KEYWORDS: [&str; 6] = ["calculate", "sum", "+", "-", "*", "/"];
const RESEARCH_KEYWORDS: [&str; 6] = ["search", "latest", "who", "when", "news", "find"];

/// Agent profile a prompt is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteCategory {
    General,
    Research,
    Math,
    Finance,
}

impl RouteCategory {
    /// Every category, in a stable order.
    pub const ALL: [RouteCategory; 4] = [
        RouteCategory::General,
        RouteCategory::Research,
        RouteCategory::Math,
        RouteCategory::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteCategory::General => "general",
            RouteCategory::Research => "research",
            RouteCategory::Math => "math",
            RouteCategory::Finance => "finance",
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a prompt by substring keywords.
///
/// Rules are tried in order and the first hit wins: finance, math, research,
/// then general. Research prompts fall back to general when no web tool is
/// available.
pub fn route_prompt(prompt: &str, web_available: bool) -> RouteCategory {
    let lower = prompt.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if mentions(&FINANCE_KEYWORDS) {
        RouteCategory::Finance
    } else if mentions(&MATH_KEYWORDS) {
        RouteCategory::Math
    } else if mentions(&RESEARCH_KEYWORDS) && web_available {
        RouteCategory::Research
    } else {
        RouteCategory::General
    }
}

//! Manager output classification.

use serde::{Deserialize, Serialize};

use crate::state::NextAction;

/// Route chosen by the manager for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteDecision {
    /// Architect designs a skeleton, developer implements it
    Implement,
    /// Architect answers in prose, turn ends
    Design,
    /// Analyst inspects existing artifacts
    Analyst,
    /// Manager answers directly
    Chat,
}

impl RouteDecision {
    pub fn next_action(&self) -> NextAction {
        match self {
            Self::Implement | Self::Design => NextAction::Architect,
            Self::Analyst => NextAction::Analyst,
            Self::Chat => NextAction::Stop,
        }
    }

    pub fn is_coding_task(&self) -> bool {
        matches!(self, Self::Implement)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implement => "IMPLEMENT",
            Self::Design => "DESIGN",
            Self::Analyst => "ANALYST",
            Self::Chat => "CHAT",
        }
    }
}

impl std::fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify raw manager output.
///
/// Keywords are matched as substrings of the trimmed, uppercased text in
/// priority order IMPLEMENT, DESIGN, ANALYST. Anything else is chat.
pub fn classify(text: &str) -> RouteDecision {
    let decision = text.trim().to_uppercase();

    if decision.contains("IMPLEMENT") {
        RouteDecision::Implement
    } else if decision.contains("DESIGN") {
        RouteDecision::Design
    } else if decision.contains("ANALYST") {
        RouteDecision::Analyst
    } else {
        RouteDecision::Chat
    }
}

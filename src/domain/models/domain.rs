//! Business domains served by the agent runtime.

use serde::{Deserialize, Serialize};

/// The domain a request is routed to. One agent variant per domain, plus a
/// generic fallback when classification confidence is too low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Pitch,
    Competitive,
    Marketing,
    Patent,
    Policy,
    Team,
    Generic,
}

impl Default for Domain {
    fn default() -> Self {
        Self::Generic
    }
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pitch => "pitch",
            Self::Competitive => "competitive",
            Self::Marketing => "marketing",
            Self::Patent => "patent",
            Self::Policy => "policy",
            Self::Team => "team",
            Self::Generic => "generic",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pitch" => Some(Self::Pitch),
            "competitive" | "competitor" => Some(Self::Competitive),
            "marketing" => Some(Self::Marketing),
            "patent" => Some(Self::Patent),
            "policy" => Some(Self::Policy),
            "team" => Some(Self::Team),
            "generic" | "general" => Some(Self::Generic),
            _ => None,
        }
    }

    /// Knowledge-base collection backing this domain. The generic fallback
    /// has no collection of its own and searches across all of them.
    pub fn collection(&self) -> Option<&'static str> {
        match self {
            Self::Pitch => Some("pitch_decks"),
            Self::Competitive => Some("competitor_profiles"),
            Self::Marketing => Some("marketing_campaigns"),
            Self::Patent => Some("patent_filings"),
            Self::Policy => Some("policy_documents"),
            Self::Team => Some("team_playbooks"),
            Self::Generic => None,
        }
    }

    /// All routable domains, in routing priority order. Excludes the
    /// fallback, which is never matched directly.
    pub fn routable() -> &'static [Domain] {
        &[
            Self::Pitch,
            Self::Competitive,
            Self::Marketing,
            Self::Patent,
            Self::Policy,
            Self::Team,
        ]
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

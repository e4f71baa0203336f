use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The four operating modes of the search assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Rapid lookups, no planning pass.
    #[default]
    Fast,
    /// Planner agent drafts a strategy before searching.
    AgenticPlanner,
    /// Multi-step reasoning over intermediate results.
    AgenticReasoning,
    /// Long-form research sweep across sources.
    DeepResearch,
}

/// Display record for one mode: the stable wire id plus the copy
/// shown in the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub mode: SearchMode,
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// Ordered registry of all selectable modes. The first entry is the
/// default that unknown ids fall back to.
pub const SEARCH_MODES: [ModeInfo; 4] = [
    ModeInfo {
        mode: SearchMode::Fast,
        id: "fast",
        title: "Lite",
        subtitle: "Rapid market response and action",
    },
    ModeInfo {
        mode: SearchMode::AgenticPlanner,
        id: "agentic-planner",
        title: "Core",
        subtitle: "Strategic planning through agentic modeling",
    },
    ModeInfo {
        mode: SearchMode::AgenticReasoning,
        id: "agentic-reasoning",
        title: "Pro",
        subtitle: "Deep reasoning and scenario simulation",
    },
    ModeInfo {
        mode: SearchMode::DeepResearch,
        id: "deep-research",
        title: "Research",
        subtitle: "In-depth research of markets, trends, and assets",
    },
];

#[derive(Debug, Error)]
#[error("unknown search mode id: {0}")]
pub struct UnknownModeId(String);

impl SearchMode {
    /// Registry record for this mode. Total: every variant has exactly
    /// one entry.
    pub fn info(self) -> &'static ModeInfo {
        match self {
            SearchMode::Fast => &SEARCH_MODES[0],
            SearchMode::AgenticPlanner => &SEARCH_MODES[1],
            SearchMode::AgenticReasoning => &SEARCH_MODES[2],
            SearchMode::DeepResearch => &SEARCH_MODES[3],
        }
    }

    pub fn id(self) -> &'static str {
        self.info().id
    }

    /// Look up a mode by id, falling back to the default (first registry
    /// entry) when the id is unknown. The substitution is logged, never
    /// surfaced to the caller.
    pub fn resolve(id: &str) -> Self {
        match id.parse() {
            Ok(mode) => mode,
            Err(err) => {
                let fallback = Self::default();
                tracing::warn!("{err}, falling back to {}", fallback.id());
                fallback
            }
        }
    }
}

impl FromStr for SearchMode {
    type Err = UnknownModeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SEARCH_MODES
            .iter()
            .find(|info| info.id == s)
            .map(|info| info.mode)
            .ok_or_else(|| UnknownModeId(s.to_string()))
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

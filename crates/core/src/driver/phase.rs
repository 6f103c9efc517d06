//! Pipeline phases

use serde::{Deserialize, Serialize};

/// The two pipeline phases, strictly sequential
///
/// No phase begins until every statement of the prior phase has
/// committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtlPhase {
    /// Phase 1: bulk-copy source files into the staging tables
    StagingLoad,
    /// Phase 2: transform staging rows into the star schema
    Transform,
}

impl EtlPhase {
    /// Get both phases in execution order
    pub fn all() -> Vec<Self> {
        vec![Self::StagingLoad, Self::Transform]
    }

    /// Get the phase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::StagingLoad => "staging_load",
            Self::Transform => "transform",
        }
    }

    /// Get the phase description
    pub fn description(&self) -> &'static str {
        match self {
            Self::StagingLoad => "Bulk-copy source files into staging tables",
            Self::Transform => "Insert staging rows into fact and dimension tables",
        }
    }

    /// Get the phase index (1-based)
    pub fn index(&self) -> usize {
        match self {
            Self::StagingLoad => 1,
            Self::Transform => 2,
        }
    }
}

impl std::fmt::Display for EtlPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for EtlPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "staging_load" | "staging-load" | "load" | "1" => Ok(Self::StagingLoad),
            "transform" | "insert" | "2" => Ok(Self::Transform),
            _ => Err(format!(
                "Unknown phase: {}. Expected: staging_load, transform",
                s
            )),
        }
    }
}

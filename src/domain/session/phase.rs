//! ControllerPhase enum for tracking the session controller lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle phase of the session controller.
///
/// Valid transitions:
/// - Uninitialized -> Active | Cleared
/// - Active -> Generating | Uninitialized | Cleared
/// - Generating -> Active | CorpusFallback | Cleared
/// - CorpusFallback -> Active | Cleared
/// - Cleared -> Uninitialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPhase {
    #[default]
    Uninitialized,
    Active,
    Generating,
    CorpusFallback,
    Cleared,
}

impl ControllerPhase {
    /// Returns true while a generator call is in flight.
    pub fn is_generating(&self) -> bool {
        matches!(self, ControllerPhase::Generating)
    }

    /// Returns true once a session has been initialized.
    pub fn is_initialized(&self) -> bool {
        !matches!(self, ControllerPhase::Uninitialized | ControllerPhase::Cleared)
    }
}

impl StateMachine for ControllerPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ControllerPhase::*;
        match self {
            Uninitialized => vec![Active, Cleared],
            Active => vec![Generating, Uninitialized, Cleared],
            Generating => vec![Active, CorpusFallback, Cleared],
            CorpusFallback => vec![Active, Cleared],
            Cleared => vec![Uninitialized],
        }
    }
}

impl fmt::Display for ControllerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControllerPhase::Uninitialized => "Uninitialized",
            ControllerPhase::Active => "Active",
            ControllerPhase::Generating => "Generating",
            ControllerPhase::CorpusFallback => "CorpusFallback",
            ControllerPhase::Cleared => "Cleared",
        };
        write!(f, "{}", s)
    }
}

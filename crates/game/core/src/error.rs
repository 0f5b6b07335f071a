//! Error taxonomy shared by the whole engine.
//!
//! Three families cover every failure an action can produce:
//!
//! - validation errors: the action is illegal in the current state and is
//!   rejected without touching it (each subsystem defines its own enum);
//! - [`MissingInformation`]: the host asked the engine to operate on a match
//!   that was never fully described, reported with every missing fact at
//!   once;
//! - [`InvariantViolation`]: post-conditions the engine checks on itself
//!   failed, meaning a bug rather than a bad request.

use core::fmt;

use crate::ids::{FactionId, PlayerId};

/// How bad an error is, from the host's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The request was illegal; state is untouched, try something else.
    Validation,
    /// The request cannot proceed yet but may after more input.
    Recoverable,
    /// The engine broke one of its own invariants. State is suspect.
    Internal,
}

/// Implemented by every error the engine surfaces, so hosts can route on
/// severity without matching concrete types.
pub trait RulesError: std::error::Error {
    fn severity(&self) -> ErrorSeverity;
}

/// A single fact the match description failed to provide.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingFact {
    #[error("no faction profile registered for {0}")]
    FactionProfile(FactionId),

    #[error("player {0} has no faction assignment")]
    FactionAssignment(PlayerId),

    #[error("two players share faction {0}")]
    DuplicateFaction(FactionId),

    #[error("the board layout is empty")]
    BoardLayout,

    #[error("a match needs at least two players, got {0}")]
    TooFewPlayers(usize),
}

/// The match setup (or a later query) referenced facts that were never
/// supplied. Everything missing is reported together so the host can fix
/// the description in one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissingInformation {
    pub facts: Vec<MissingFact>,
}

impl MissingInformation {
    pub fn new() -> Self {
        Self { facts: Vec::new() }
    }

    pub fn push(&mut self, fact: MissingFact) {
        self.facts.push(fact);
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Finishes collection: `Ok` when nothing was missing.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Default for MissingInformation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MissingInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing information ({} facts):", self.facts.len())?;
        for fact in &self.facts {
            write!(f, " [{fact}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for MissingInformation {}

impl RulesError for MissingInformation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// A broken engine invariant, detected by a post-condition check.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("invariant violated: {detail}")]
pub struct InvariantViolation {
    pub detail: String,
}

impl InvariantViolation {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl RulesError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }
}

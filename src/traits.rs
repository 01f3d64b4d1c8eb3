use crate::{Row, Ruleset};
use anyhow::Result;

/// Result of a finished run.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// The row as of the last computed generation.
    pub row: Row,
    /// Number of generations computed.
    pub generations: u64,
    /// True iff every interior cell reached the firing state. False means
    /// the generation limit stopped the run first.
    pub fired: bool,
}

/// Simulation engine for the Firing Squad Synchronization Problem.
///
/// Every implementation must be generation-for-generation deterministic:
/// for the same ruleset, row and limit, all engines (at any partition
/// count) return identical outcomes. The sequential engine is the oracle
/// the others are tested against.
pub trait FsspEngine {
    /// Advances `row` until every interior cell fires or `max_generations`
    /// generations have been computed, whichever comes first.
    ///
    /// # Errors
    ///
    /// Fails only when the supplied rule table violates the simultaneous
    /// firing guarantee and one part of the row stops ahead of another;
    /// a correct table either fires or runs into the limit.
    fn run(&self, rules: &Ruleset, row: Row, max_generations: u64) -> Result<Outcome>;
}

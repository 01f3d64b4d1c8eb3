#![warn(clippy::all)]

mod parallel;
mod row;
mod ruleset;
mod sequential;
mod traits;

pub use parallel::ParallelEngine;
pub use row::Row;
pub use ruleset::{Ruleset, State, StateClass, StateIdx, DEFAULT_STATE};
pub use sequential::SequentialEngine;
pub use traits::{FsspEngine, Outcome};

pub const VERSION: &str = "0.1.0";

/// A generous default generation limit: the known optimal solutions fire
/// at `2n - 2`, and even the simple non-minimal constructions stay within
/// a small multiple of `n`.
pub fn default_generation_limit(interior: usize) -> u64 {
    4 * interior as u64 + 16
}

use crate::{FsspEngine, Outcome, Row, Ruleset};
use anyhow::Result;

/// The whole-row double-buffer loop. No partitions, no synchronization;
/// serves as the reference oracle for the partitioned engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        Self
    }

    /// Like [`FsspEngine::run`], but invokes `observe` with the generation
    /// number and the row after every generation (including generation 0,
    /// the starting row). Backs the CLI's dump mode.
    pub fn run_with<F>(
        &self,
        rules: &Ruleset,
        row: Row,
        max_generations: u64,
        mut observe: F,
    ) -> Result<Outcome>
    where
        F: FnMut(u64, &Row),
    {
        let mut current = row;
        let mut next = Row::new(current.interior_len(), rules);
        let mut generations = 0;

        observe(generations, &current);
        while !current.fired(rules) && generations < max_generations {
            current.step_into(&mut next, rules);
            std::mem::swap(&mut current, &mut next);
            generations += 1;
            observe(generations, &current);
        }

        Ok(Outcome {
            fired: current.fired(rules),
            generations,
            row: current,
        })
    }
}

impl FsspEngine for SequentialEngine {
    fn run(&self, rules: &Ruleset, row: Row, max_generations: u64) -> Result<Outcome> {
        self.run_with(rules, row, max_generations, |_, _| {})
    }
}

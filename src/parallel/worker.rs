use super::partition::Partition;
use crate::{Ruleset, StateIdx};
use anyhow::{anyhow, Result};
use std::sync::Arc;

/// What a worker hands back to the coordinator once it stops.
pub(super) struct Report {
    pub(super) start: usize,
    pub(super) cells: Vec<StateIdx>,
    pub(super) generations: u64,
    pub(super) fired: bool,
}

/// The generation loop of one partition.
///
/// Per generation: check local firing, compute the owned cells from the
/// previous generation (ghosts included), push the new edge values to the
/// neighbors, pull theirs, swap buffers. The channel awaits are the only
/// suspension points; they form a pairwise barrier, so a worker never
/// starts generation `g + 1` before both neighbors finished generation
/// `g` next to it. Non-adjacent partitions may transiently differ by a
/// generation.
///
/// Firing is checked against the owned cells only. With a correct rule
/// table every interior cell fires at the same generation, so all workers
/// quit together; a table that fires one partition early is detected as a
/// closed link by its neighbor and reported instead of deadlocking.
pub(super) struct Worker {
    rules: Arc<Ruleset>,
    part: Partition,
    scratch: Vec<StateIdx>,
    max_generations: u64,
}

impl Worker {
    pub(super) fn new(rules: Arc<Ruleset>, part: Partition, max_generations: u64) -> Self {
        let scratch = vec![0; part.cells.len()];
        Self {
            rules,
            part,
            scratch,
            max_generations,
        }
    }

    pub(super) async fn run(mut self) -> Result<Report> {
        let mut generations = 0;
        while !self.fired_locally() && generations < self.max_generations {
            self.compute();
            self.exchange().await?;
            std::mem::swap(&mut self.part.cells, &mut self.scratch);
            generations += 1;
        }
        Ok(Report {
            fired: self.fired_locally(),
            start: self.part.start,
            cells: self.part.cells,
            generations,
        })
    }

    fn fired_locally(&self) -> bool {
        let firing = self.rules.firing();
        self.part.cells.iter().all(|&c| c == firing)
    }

    fn compute(&mut self) {
        let cells = &self.part.cells;
        let last = cells.len() - 1;
        for i in 0..=last {
            let l = if i == 0 { self.part.left.ghost } else { cells[i - 1] };
            let r = if i == last { self.part.right.ghost } else { cells[i + 1] };
            self.scratch[i] = self.rules.lookup(l, cells[i], r);
        }
    }

    /// Sends before receiving, on both sides. Every channel has one free
    /// slot per generation, so the sends cannot cycle with a neighbor
    /// doing the same.
    async fn exchange(&mut self) -> Result<()> {
        let last = self.scratch.len() - 1;
        if let Some(link) = &self.part.left.link {
            link.tx
                .send(self.scratch[0])
                .await
                .map_err(|_| neighbor_gone("left"))?;
        }
        if let Some(link) = &self.part.right.link {
            link.tx
                .send(self.scratch[last])
                .await
                .map_err(|_| neighbor_gone("right"))?;
        }
        if let Some(link) = self.part.left.link.as_mut() {
            self.part.left.ghost = link.rx.recv().await.ok_or_else(|| neighbor_gone("left"))?;
        }
        if let Some(link) = self.part.right.link.as_mut() {
            self.part.right.ghost = link.rx.recv().await.ok_or_else(|| neighbor_gone("right"))?;
        }
        Ok(())
    }
}

fn neighbor_gone(side: &str) -> anyhow::Error {
    anyhow!(
        "{side} neighbor stopped mid-run; the rule table broke the \
         simultaneous-firing guarantee"
    )
}

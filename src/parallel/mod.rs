mod partition;
mod worker;

use crate::{FsspEngine, Outcome, Row, Ruleset};
use anyhow::{ensure, Context, Result};
use std::sync::Arc;
use worker::{Report, Worker};

/// The partitioned engine: the row is split into contiguous owned ranges,
/// one tokio task per range, synchronized per generation through the
/// capacity-1 handshake links wired by [`partition::split`]. There is no
/// global barrier; the coordinator only waits for every worker to finish
/// and stitches the final row back together.
#[derive(Clone, Copy, Debug)]
pub struct ParallelEngine {
    partitions: usize,
}

impl ParallelEngine {
    /// `partitions` is an upper bound; rows shorter than the partition
    /// count get one worker per interior cell.
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions: partitions.max(1),
        }
    }

    /// One partition per available hardware thread, as the classic
    /// parallel simulators default to.
    pub fn with_available_parallelism() -> Self {
        let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self::new(threads)
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }
}

impl FsspEngine for ParallelEngine {
    fn run(&self, rules: &Ruleset, row: Row, max_generations: u64) -> Result<Outcome> {
        let parts = partition::split(&row, self.partitions);
        if parts.is_empty() {
            // nothing to compute: an all-external row is vacuously fired
            return Ok(Outcome {
                fired: true,
                generations: 0,
                row,
            });
        }

        let rules = Arc::new(rules.clone());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(parts.len())
            .build()
            .context("failed to build the worker runtime")?;

        let reports: Vec<Report> = runtime.block_on(async {
            let handles: Vec<_> = parts
                .into_iter()
                .map(|part| tokio::spawn(Worker::new(rules.clone(), part, max_generations).run()))
                .collect();
            let mut reports = Vec::with_capacity(handles.len());
            for handle in handles {
                reports.push(handle.await.context("worker task panicked")??);
            }
            Ok::<_, anyhow::Error>(reports)
        })?;

        let generations = reports[0].generations;
        ensure!(
            reports.iter().all(|r| r.generations == generations),
            "workers disagree on the generation count; the rule table broke \
             the simultaneous-firing guarantee"
        );
        let fired = reports.iter().all(|r| r.fired);

        let mut cells = row.cells().to_vec();
        for report in &reports {
            cells[report.start..report.start + report.cells.len()].copy_from_slice(&report.cells);
        }
        Ok(Outcome {
            row: Row::from_cells(cells),
            generations,
            fired,
        })
    }
}

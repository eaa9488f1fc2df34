//! Batch runners and the sink seam they flush into.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::SeedError;

/// Destination for flushed batches.
///
/// A sink writes the whole batch and commits it before returning; the runner
/// never has two batches in flight.
#[async_trait]
pub trait BatchSink<R: Send + 'static>: Send {
    /// Writes one batch. Returns the number of rows the destination accepted.
    async fn flush(&mut self, rows: Vec<R>) -> Result<usize, SeedError>;
}

/// A row with a semantic key and additive measures.
pub trait Merge {
    type Key: Ord;

    /// Identifying fields of the row.
    fn key(&self) -> Self::Key;

    /// Adds `other`'s measures into `self`. Key fields are left untouched.
    fn merge(&mut self, other: Self);
}

/// Outcome of a single flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Rows generated into this batch, collisions included.
    pub produced: usize,
    /// Rows handed to the sink after merging.
    pub written: usize,
}

/// Outcome of a full run against one destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub label: &'static str,
    pub flushes: Vec<FlushReport>,
}

impl RunSummary {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            flushes: Vec::new(),
        }
    }

    /// Total rows generated over the run.
    pub fn produced(&self) -> usize {
        self.flushes.iter().map(|f| f.produced).sum()
    }

    /// Total rows accepted by the destination over the run.
    pub fn written(&self) -> usize {
        self.flushes.iter().map(|f| f.written).sum()
    }

    /// Number of flushes issued.
    pub fn batches(&self) -> usize {
        self.flushes.len()
    }
}

/// Quota and batching parameters for populating one destination.
#[derive(Debug, Clone, Copy)]
pub struct BatchRun {
    label: &'static str,
    total: usize,
    batch_size: usize,
}

impl BatchRun {
    /// Creates a run that produces `total` rows in batches of `batch_size`.
    pub fn new(label: &'static str, total: usize, batch_size: usize) -> Result<Self, SeedError> {
        if batch_size == 0 {
            return Err(SeedError::InvalidBatchSize(label));
        }

        Ok(Self {
            label,
            total,
            batch_size,
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Produces `total` rows, flushing every `batch_size` rows and once more
    /// for the trailing partial batch.
    pub async fn plain<R, S, F>(&self, sink: &mut S, mut next_row: F) -> Result<RunSummary, SeedError>
    where
        R: Send + 'static,
        S: BatchSink<R> + ?Sized,
        F: FnMut() -> Result<R, SeedError>,
    {
        let mut summary = RunSummary::new(self.label);
        let mut batch = Vec::with_capacity(self.batch_size.min(self.total));
        let mut done = 0;

        while done < self.total {
            batch.push(next_row()?);

            if batch.len() == self.batch_size || done + batch.len() == self.total {
                let produced = batch.len();
                let written = sink.flush(std::mem::take(&mut batch)).await?;
                done += produced;
                summary.flushes.push(FlushReport { produced, written });
                info!("{}: {}/{}", self.label, done, self.total);
            }
        }

        Ok(summary)
    }

    /// Produces `total` rows, merging rows with equal keys inside each batch.
    ///
    /// A batch is flushed when it holds `batch_size` distinct keys or when the
    /// number of rows produced over the run reaches `total`. Collisions only
    /// merge within a batch; a key that reappears after a flush starts a new
    /// row in the next batch.
    pub async fn merged<R, S, F>(
        &self,
        sink: &mut S,
        mut next_row: F,
    ) -> Result<RunSummary, SeedError>
    where
        R: Merge + Send + 'static,
        S: BatchSink<R> + ?Sized,
        F: FnMut() -> Result<R, SeedError>,
    {
        let mut summary = RunSummary::new(self.label);
        let mut pending: BTreeMap<R::Key, R> = BTreeMap::new();
        let mut produced = 0;
        let mut done = 0;

        while done < self.total {
            let row = next_row()?;
            produced += 1;

            match pending.entry(row.key()) {
                Entry::Occupied(mut slot) => slot.get_mut().merge(row),
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }

            if pending.len() == self.batch_size || done + produced == self.total {
                let rows: Vec<R> = std::mem::take(&mut pending).into_values().collect();
                debug!(
                    "{}: merged {} rows into {} keys",
                    self.label,
                    produced,
                    rows.len()
                );
                let written = sink.flush(rows).await?;
                done += produced;
                summary.flushes.push(FlushReport { produced, written });
                produced = 0;
                info!("{}: {}/{}", self.label, done, self.total);
            }
        }

        Ok(summary)
    }
}

use super::config::{ConfigError, SamplingConfig};
use crate::core::models::example::Example;
use itertools::Itertools;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::trace;

/// Walks one list of example indices, wrapping (and optionally reshuffling) at the end.
#[derive(Debug, Clone)]
struct Cursor {
    order: Vec<usize>,
    position: usize,
    passes: u64,
}

impl Cursor {
    fn new(mut order: Vec<usize>, shuffle: bool, rng: &mut StdRng) -> Self {
        if shuffle {
            order.shuffle(rng);
        }
        Self {
            order,
            position: 0,
            passes: 0,
        }
    }

    fn next(&mut self, shuffle: bool, rng: &mut StdRng) -> usize {
        if self.position == self.order.len() {
            self.position = 0;
            self.passes += 1;
            if shuffle {
                self.order.shuffle(rng);
            }
            trace!(passes = self.passes, "Example order wrapped.");
        }
        let index = self.order[self.position];
        self.position += 1;
        index
    }

    fn take(&mut self, count: usize, shuffle: bool, rng: &mut StdRng) -> Vec<usize> {
        (0..count).map(|_| self.next(shuffle, rng)).collect()
    }

    /// Full passes finished, counting a pass as soon as its last index is handed out.
    fn completed_passes(&self) -> u64 {
        self.passes + u64::from(self.position == self.order.len())
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Unbalanced(Cursor),
    Balanced {
        positives: Cursor,
        negatives: Cursor,
        positives_per_batch: usize,
    },
}

/// Decides which examples make up each batch.
///
/// Without balancing, examples are visited in index order (or a fresh permutation per epoch
/// with `shuffle`) and a batch that runs past the end continues in the next epoch. With
/// balancing, positives and negatives are drawn from separate cursors so every batch has the
/// same class split, and the two are interleaved. An epoch then ends when both classes have
/// been fully visited, so it follows the class that takes longer to cycle.
#[derive(Debug, Clone)]
pub struct ExampleSampler {
    mode: Mode,
    shuffle: bool,
    batch_size: usize,
    drawn: u64,
}

impl ExampleSampler {
    pub fn new(
        examples: &[Example],
        config: &SamplingConfig,
        rng: &mut StdRng,
    ) -> Result<Self, ConfigError> {
        let mode = if config.balanced {
            let (positives, negatives): (Vec<usize>, Vec<usize>) =
                (0..examples.len()).partition(|&i| examples[i].is_positive());
            if positives.is_empty() || negatives.is_empty() {
                return Err(ConfigError::UnbalanceableSource {
                    positives: positives.len(),
                    negatives: negatives.len(),
                });
            }
            Mode::Balanced {
                positives: Cursor::new(positives, config.shuffle, rng),
                negatives: Cursor::new(negatives, config.shuffle, rng),
                positives_per_batch: config.positives_per_batch(),
            }
        } else {
            Mode::Unbalanced(Cursor::new(
                (0..examples.len()).collect(),
                config.shuffle,
                rng,
            ))
        };

        Ok(Self {
            mode,
            shuffle: config.shuffle,
            batch_size: config.batch_size,
            drawn: 0,
        })
    }

    /// Indices of the examples in the next batch.
    pub fn next_batch(&mut self, rng: &mut StdRng) -> Vec<usize> {
        let shuffle = self.shuffle;
        let indices = match &mut self.mode {
            Mode::Unbalanced(cursor) => cursor.take(self.batch_size, shuffle, rng),
            Mode::Balanced {
                positives,
                negatives,
                positives_per_batch,
            } => {
                let pos = positives.take(*positives_per_batch, shuffle, rng);
                let neg = negatives.take(self.batch_size - *positives_per_batch, shuffle, rng);
                pos.into_iter().interleave(neg).collect()
            }
        };
        self.drawn += indices.len() as u64;
        indices
    }

    /// Completed passes over the data. In balanced mode this is the smaller of the two class
    /// cursors' pass counts.
    pub fn epoch(&self) -> u64 {
        match &self.mode {
            Mode::Unbalanced(cursor) => cursor.completed_passes(),
            Mode::Balanced {
                positives,
                negatives,
                ..
            } => positives.completed_passes().min(negatives.completed_passes()),
        }
    }

    pub fn examples_drawn(&self) -> u64 {
        self.drawn
    }
}

//! Peeling reducer — fountain decoding over GF(2), one byte string at a time.
//!
//! Solved segments live in a dense arena indexed by segment position.
//! Mixed parts that still reference unknown segments sit in `pending`,
//! keyed by their current index set, so two parts that reduce to the same
//! combination are stored once.
//!
//! Invariant between calls: no pending key contains a solved index. Every
//! newly solved index goes through the worklist, which peels it out of
//! every pending part before `ingest` returns.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::part::{IndexSet, Part};

/// Outcome of feeding one part to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduction {
    /// Part carried nothing new.
    AlreadyKnown,
    /// Part solved `count` segments, itself plus whatever cascaded from it.
    /// `advisory` holds the first inconsistency the cascade tripped over;
    /// the value already in `solved` was kept.
    SolvedNew {
        count: usize,
        advisory: Option<DecodeError>,
    },
    /// Part still references two or more unknown segments.
    Pending,
    /// Part reduced to data that contradicts what is already known.
    Rejected(DecodeError),
}

#[derive(Debug)]
pub struct PeelingReducer {
    segment_count: usize,
    solved: Vec<Option<Vec<u8>>>,
    solved_count: usize,
    pending: BTreeMap<IndexSet, Vec<u8>>,
}

impl PeelingReducer {
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_count,
            solved: vec![None; segment_count],
            solved_count: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn ingest(&mut self, mut part: Part) -> Reduction {
        if part.indexes.iter().any(|i| i >= self.segment_count) {
            warn!(
                seq_num = part.sequence_number,
                indexes = %part.indexes,
                segment_count = self.segment_count,
                "part references segments outside the message"
            );
            return Reduction::Rejected(DecodeError::InconsistentReduction {
                indexes: part.indexes,
            });
        }

        // A repeated pure part is a duplicate, whatever its bytes.
        if let Some(index) = part.indexes.only() {
            if self.solved[index].is_some() {
                debug!(seq_num = part.sequence_number, index, "duplicate pure part");
                return Reduction::AlreadyKnown;
            }
        }

        let original = part.indexes.clone();
        self.peel_known(&mut part);

        match part.indexes.len() {
            0 => {
                if is_zero(&part.data) {
                    debug!(
                        seq_num = part.sequence_number,
                        indexes = %original,
                        "mixed part fully reduced to known data"
                    );
                    Reduction::AlreadyKnown
                } else {
                    warn!(
                        seq_num = part.sequence_number,
                        indexes = %original,
                        "mixed part reduced to non-zero residual, dropping"
                    );
                    Reduction::Rejected(DecodeError::InconsistentReduction { indexes: original })
                }
            }
            1 => {
                let index = part.indexes.only().unwrap_or_default();
                let (count, advisory) = self.solve(index, part.data);
                debug!(
                    seq_num = part.sequence_number,
                    indexes = %original,
                    index,
                    count,
                    solved = self.solved_count,
                    segment_count = self.segment_count,
                    "part solved segments"
                );
                Reduction::SolvedNew { count, advisory }
            }
            _ => match self.pending.get(&part.indexes) {
                Some(existing) if *existing == part.data => {
                    debug!(
                        seq_num = part.sequence_number,
                        indexes = %part.indexes,
                        "duplicate mixed part"
                    );
                    Reduction::AlreadyKnown
                }
                Some(_) => {
                    warn!(
                        seq_num = part.sequence_number,
                        indexes = %part.indexes,
                        "mixed part contradicts a pending part with the same indexes, dropping"
                    );
                    Reduction::Rejected(DecodeError::InconsistentReduction {
                        indexes: part.indexes,
                    })
                }
                None => {
                    debug!(
                        seq_num = part.sequence_number,
                        indexes = %part.indexes,
                        pending = self.pending.len() + 1,
                        "mixed part pending"
                    );
                    self.pending.insert(part.indexes, part.data);
                    Reduction::Pending
                }
            },
        }
    }

    /// Record segment `index` and cascade through `pending` until nothing
    /// else collapses. Returns how many segments became solved.
    fn solve(&mut self, index: usize, data: Vec<u8>) -> (usize, Option<DecodeError>) {
        let mut advisory = None;
        let mut count = 0;
        let mut worklist = vec![index];
        self.solved[index] = Some(data);
        self.solved_count += 1;
        count += 1;

        while let Some(index) = worklist.pop() {
            let affected: Vec<IndexSet> = self
                .pending
                .keys()
                .filter(|key| key.contains(index))
                .cloned()
                .collect();

            for key in affected {
                let Some(data) = self.pending.remove(&key) else {
                    continue;
                };
                let mut part = Part {
                    sequence_number: 0,
                    indexes: key.clone(),
                    data,
                };
                self.peel_known(&mut part);

                match part.indexes.len() {
                    0 => {
                        if !is_zero(&part.data) {
                            warn!(indexes = %key, "pending part reduced to non-zero residual");
                            advisory.get_or_insert(DecodeError::InconsistentReduction {
                                indexes: key,
                            });
                        }
                    }
                    1 => {
                        let next = part.indexes.only().unwrap_or_default();
                        match &self.solved[next] {
                            None => {
                                self.solved[next] = Some(part.data);
                                self.solved_count += 1;
                                count += 1;
                                worklist.push(next);
                            }
                            Some(existing) if *existing != part.data => {
                                warn!(
                                    indexes = %key,
                                    index = next,
                                    "cascade re-derived a solved segment with different data"
                                );
                                advisory.get_or_insert(DecodeError::InconsistentReduction {
                                    indexes: key,
                                });
                            }
                            Some(_) => {}
                        }
                    }
                    _ => {
                        if let Some(existing) = self.pending.get(&part.indexes) {
                            if *existing != part.data {
                                warn!(
                                    indexes = %part.indexes,
                                    "reduced part contradicts a pending part, keeping the first"
                                );
                                advisory.get_or_insert(DecodeError::InconsistentReduction {
                                    indexes: key,
                                });
                            }
                        } else {
                            self.pending.insert(part.indexes, part.data);
                        }
                    }
                }
            }
        }

        (count, advisory)
    }

    /// XOR every already-solved constituent out of `part`.
    fn peel_known(&self, part: &mut Part) {
        let known: Vec<usize> = part
            .indexes
            .iter()
            .filter(|&i| self.solved[i].is_some())
            .collect();
        for index in known {
            if let Some(segment) = &self.solved[index] {
                part.peel(index, segment);
            }
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn is_complete(&self) -> bool {
        self.solved_count == self.segment_count
    }

    pub fn solved_count(&self) -> usize {
        self.solved_count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn solved_indexes(&self) -> IndexSet {
        self.solved
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect()
    }

    pub fn is_solved(&self, index: usize) -> bool {
        self.solved.get(index).is_some_and(|s| s.is_some())
    }

    /// Segments in index order, once every one of them is solved.
    pub fn segments(&self) -> Option<Vec<&[u8]>> {
        self.solved
            .iter()
            .map(|s| s.as_deref())
            .collect::<Option<Vec<&[u8]>>>()
    }
}

fn is_zero(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}

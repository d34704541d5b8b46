//! Immutable-once-published set of passages and their normalised vectors

use std::cmp::Ordering;

use super::{Passage, ScoredPassage};
use crate::domain::embedding::{dot, l2_normalize};
use crate::domain::DomainError;

/// Vector matrix plus row-aligned passage metadata.
///
/// Row `i` of the matrix belongs to the passage whose `id` is `i`. Every stored
/// vector is L2-normalised so that inner product equals cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    dimension: usize,
    passages: Vec<Passage>,
}

impl IndexSnapshot {
    /// Empty snapshot; the dimension is fixed by the first `add`
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a snapshot from persisted parts, rejecting misaligned data
    pub fn from_parts(
        dimension: usize,
        vectors: Vec<Vec<f32>>,
        passages: Vec<Passage>,
    ) -> Result<Self, DomainError> {
        if let Some(problem) = alignment_problem(dimension, 0, &vectors, &passages) {
            return Err(DomainError::corrupt_index(problem));
        }

        let mut snapshot = Self {
            dimension,
            passages: Vec::with_capacity(passages.len()),
        };
        snapshot.append(vectors, passages);
        Ok(snapshot)
    }

    /// Append vectors with their metadata. Ids must continue the row sequence.
    pub fn add(
        &mut self,
        vectors: Vec<Vec<f32>>,
        passages: Vec<Passage>,
    ) -> Result<(), DomainError> {
        if vectors.is_empty() && passages.is_empty() {
            return Ok(());
        }

        let dimension = if self.dimension == 0 {
            vectors.first().map(Vec::len).unwrap_or(0)
        } else {
            self.dimension
        };

        if dimension == 0 {
            return Err(DomainError::validation("Vectors must not be empty"));
        }

        let base = self.passages.len() as u64;
        if let Some(problem) = alignment_problem(dimension, base, &vectors, &passages) {
            return Err(DomainError::validation(problem));
        }

        self.dimension = dimension;
        self.append(vectors, passages);
        Ok(())
    }

    fn append(&mut self, vectors: Vec<Vec<f32>>, passages: Vec<Passage>) {
        for (mut vector, passage) in vectors.into_iter().zip(passages) {
            l2_normalize(&mut vector);
            self.passages.push(passage.with_embedding(vector));
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn passage(&self, id: u64) -> Option<&Passage> {
        self.passages.get(usize::try_from(id).ok()?)
    }

    /// Top-k passages by inner product with the normalised query, best first.
    /// Equal scores keep row order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, DomainError> {
        if k == 0 || self.passages.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(DomainError::validation(format!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut normalized = query.to_vec();
        l2_normalize(&mut normalized);

        let mut scored: Vec<(usize, f32)> = self
            .passages
            .iter()
            .enumerate()
            .map(|(row, passage)| (row, dot(&normalized, &passage.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(row, score)| ScoredPassage::new(self.passages[row].clone(), score))
            .collect())
    }
}

fn alignment_problem(
    dimension: usize,
    base: u64,
    vectors: &[Vec<f32>],
    passages: &[Passage],
) -> Option<String> {
    if vectors.len() != passages.len() {
        return Some(format!(
            "{} vectors but {} metadata records",
            vectors.len(),
            passages.len()
        ));
    }

    for (offset, (vector, passage)) in vectors.iter().zip(passages).enumerate() {
        let row = base + offset as u64;

        if vector.len() != dimension {
            return Some(format!(
                "Row {} has dimension {}, expected {}",
                row,
                vector.len(),
                dimension
            ));
        }

        if passage.id != row {
            return Some(format!(
                "Metadata record at row {} carries id {}",
                row, passage.id
            ));
        }
    }

    None
}

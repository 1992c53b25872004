//! Image selection with per-document de-duplication.
//!
//! A small stateful component: the registry remembers which candidate ids
//! were already embedded in the current document, and selection draws
//! uniformly at random from the unused ones. When every candidate has been
//! used the registry resets, so a provider with a small repeating pool can
//! never stall the pipeline.

use crate::provider::ImageCandidate;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

/// Candidate ids already embedded in the document being assembled.
///
/// Scoped to one assembly run; never carried across documents.
#[derive(Debug, Default)]
pub struct UsedImageRegistry {
    ids: HashSet<String>,
}

impl UsedImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn record(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Pick a candidate not yet used in this document, recording the choice.
///
/// If every candidate is already in the registry, the registry is cleared
/// and selection retries against the full list (exhaustion-triggered reuse).
/// Returns `None` only for an empty candidate list.
pub fn select_unique<'a, R: Rng + ?Sized>(
    candidates: &'a [ImageCandidate],
    registry: &mut UsedImageRegistry,
    rng: &mut R,
) -> Option<&'a ImageCandidate> {
    if candidates.is_empty() {
        return None;
    }

    let fresh: Vec<&ImageCandidate> = candidates
        .iter()
        .filter(|candidate| !registry.contains(&candidate.id))
        .collect();

    let pool = if fresh.is_empty() {
        registry.clear();
        candidates.iter().collect()
    } else {
        fresh
    };

    let chosen = *pool.choose(rng)?;
    registry.record(chosen.id.clone());
    Some(chosen)
}

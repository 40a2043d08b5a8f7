use std::collections::HashSet;
use std::sync::Arc;

use super::domain::{Candidate, CandidateId};

/// Read-only source of candidates so the pipeline can be exercised in isolation.
pub trait CandidateRepository: Send + Sync {
    fn list_by_locale(&self, locale: &str) -> Result<Vec<Candidate>, RepositoryError>;
}

/// Error enumeration for candidate source failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate candidate id {0}")]
    DuplicateId(CandidateId),
    #[error("candidate source unavailable: {0}")]
    Unavailable(String),
}

/// Fixed pool loaded once and shared by every request.
#[derive(Debug, Clone)]
pub struct InMemoryCandidateRepository {
    candidates: Arc<[Candidate]>,
}

impl InMemoryCandidateRepository {
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, RepositoryError> {
        let mut ids = HashSet::new();
        for candidate in &candidates {
            if !ids.insert(&candidate.id) {
                return Err(RepositoryError::DuplicateId(candidate.id.clone()));
            }
        }

        Ok(Self {
            candidates: candidates.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn list_by_locale(&self, locale: &str) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(self
            .candidates
            .iter()
            .filter(|candidate| candidate.serves(locale))
            .cloned()
            .collect())
    }
}

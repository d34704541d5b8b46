//! In-memory job table

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::error::DomainError;
use crate::domain::job::{Job, JobId, JobRepository};

/// Job table behind one lock. Writers and the expiry sweep share it, so an
/// entry is never removed while a worker is storing its result.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn get(&self, id: &JobId) -> Result<Option<Job>, DomainError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(id.as_str()).cloned())
    }

    async fn create(&self, job: Job) -> Result<Job, DomainError> {
        let mut jobs = self.jobs.write().await;
        let id = job.id().as_str().to_string();

        if jobs.contains_key(&id) {
            return Err(DomainError::validation(format!(
                "Job '{}' already exists",
                id
            )));
        }

        jobs.insert(id, job.clone());
        Ok(job)
    }

    async fn update(&self, job: &Job) -> Result<Job, DomainError> {
        let mut jobs = self.jobs.write().await;

        match jobs.get_mut(job.id().as_str()) {
            Some(slot) => {
                *slot = job.clone();
                Ok(job.clone())
            }
            None => Err(DomainError::not_found(format!(
                "Job '{}'",
                job.id().as_str()
            ))),
        }
    }

    async fn delete_terminal_older_than(
        &self,
        before: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut jobs = self.jobs.write().await;
        let before_len = jobs.len();

        jobs.retain(|_, job| !(job.is_terminal() && job.created_at() < before));

        Ok((before_len - jobs.len()) as u64)
    }
}

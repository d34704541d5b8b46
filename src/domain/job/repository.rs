//! Job repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use super::{Job, JobId};
use crate::domain::error::DomainError;

/// Repository for answer jobs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Get a job by ID
    async fn get(&self, id: &JobId) -> Result<Option<Job>, DomainError>;

    /// Insert a new job
    async fn create(&self, job: Job) -> Result<Job, DomainError>;

    /// Replace an existing job
    async fn update(&self, job: &Job) -> Result<Job, DomainError>;

    /// Delete finished jobs created before the given timestamp. Pending jobs
    /// are never removed.
    async fn delete_terminal_older_than(&self, before: DateTime<Utc>)
        -> Result<u64, DomainError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::domain::job::JobStatus;

    /// Test suite for JobRepository implementations
    pub async fn test_repository_basic_crud<R: JobRepository>(repo: &R) {
        let job = Job::new("What is the capital of France?");
        let job_id = job.id().clone();

        let created = repo.create(job).await.expect("create should succeed");
        assert_eq!(created.id(), &job_id);
        assert_eq!(created.status(), JobStatus::Pending);

        let mut fetched = repo.get(&job_id).await.expect("get should succeed").unwrap();
        fetched.mark_completed("Paris [#1]").unwrap();
        let updated = repo.update(&fetched).await.expect("update should succeed");
        assert_eq!(updated.status(), JobStatus::Completed);

        let fetched = repo.get(&job_id).await.unwrap().unwrap();
        assert_eq!(fetched.answer(), Some("Paris [#1]"));
    }

    /// Expiry removes old finished jobs and keeps pending ones
    pub async fn test_repository_delete_terminal_older_than<R: JobRepository>(repo: &R) {
        let old = Utc::now() - chrono::Duration::minutes(10);

        let mut done = Job::new("finished question").with_created_at(old);
        done.mark_completed("answer").unwrap();
        let done_id = done.id().clone();

        let pending = Job::new("slow question").with_created_at(old);
        let pending_id = pending.id().clone();

        let fresh = Job::new("fresh question");
        let fresh_id = fresh.id().clone();

        repo.create(done).await.unwrap();
        repo.create(pending).await.unwrap();
        repo.create(fresh).await.unwrap();

        let deleted = repo
            .delete_terminal_older_than(Utc::now() - chrono::Duration::minutes(5))
            .await
            .expect("delete should succeed");

        assert_eq!(deleted, 1);
        assert!(repo.get(&done_id).await.unwrap().is_none());
        assert!(repo.get(&pending_id).await.unwrap().is_some());
        assert!(repo.get(&fresh_id).await.unwrap().is_some());
    }
}

//! Asynchronous answer jobs: submit, poll, expire

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use super::answer_service::AnswerServiceTrait;
use crate::domain::error::DomainError;
use crate::domain::job::{Job, JobId, JobRepository};

/// Job retention settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Finished jobs older than this are removed, measured from creation
    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_expiration_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            expiration_secs: default_expiration_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl JobConfig {
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Trait for job service (for dynamic dispatch in AppState)
#[async_trait]
pub trait JobServiceTrait: Send + Sync + Debug {
    /// Store a pending job and start answering it in the background
    async fn submit(&self, question: &str, client_id: Option<String>) -> Result<Job, DomainError>;

    /// Current state of a job. Unknown, expired and malformed ids are all
    /// reported as not found.
    async fn get_status(&self, id: &str) -> Result<Job, DomainError>;

    /// Remove finished jobs past their expiration
    async fn sweep(&self) -> Result<u64, DomainError>;
}

#[derive(Debug)]
pub struct JobService<R: JobRepository> {
    repository: Arc<R>,
    answers: Arc<dyn AnswerServiceTrait>,
    config: JobConfig,
}

impl<R: JobRepository + Debug + 'static> JobService<R> {
    pub fn new(repository: Arc<R>, answers: Arc<dyn AnswerServiceTrait>) -> Self {
        Self::with_config(repository, answers, JobConfig::default())
    }

    pub fn with_config(
        repository: Arc<R>,
        answers: Arc<dyn AnswerServiceTrait>,
        config: JobConfig,
    ) -> Self {
        Self {
            repository,
            answers,
            config,
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }
}

/// Record the result of a background run on its job
async fn finish_job<R: JobRepository>(
    repository: &R,
    id: &JobId,
    result: Result<String, DomainError>,
) -> Result<(), DomainError> {
    let mut job = repository
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Job '{}'", id)))?;

    match result {
        Ok(answer) => {
            job.mark_completed(answer)?;
            metrics::counter!("rag_jobs_total", "status" => "completed").increment(1);
        }
        Err(e) => {
            warn!(job_id = %id, error = %e, "Job failed");
            job.mark_failed(e.to_string())?;
            metrics::counter!("rag_jobs_total", "status" => "error").increment(1);
        }
    }

    repository.update(&job).await?;
    Ok(())
}

#[async_trait]
impl<R: JobRepository + Debug + 'static> JobServiceTrait for JobService<R> {
    #[instrument(skip(self, question))]
    async fn submit(&self, question: &str, client_id: Option<String>) -> Result<Job, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::validation("Question cannot be empty"));
        }

        let mut job = Job::new(question);
        if let Some(client_id) = client_id {
            job = job.with_client_id(client_id);
        }

        let created = self.repository.create(job).await?;
        let job_id = created.id().clone();
        info!(job_id = %job_id, "Job submitted");

        let repository = Arc::clone(&self.repository);
        let answers = Arc::clone(&self.answers);
        let question = question.to_string();

        tokio::spawn(async move {
            let result = answers.answer(&question).await.map(|a| a.text);
            if let Err(e) = finish_job(repository.as_ref(), &job_id, result).await {
                error!(job_id = %job_id, error = %e, "Failed to store job result");
            }
        });

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_status(&self, id: &str) -> Result<Job, DomainError> {
        let not_found = || DomainError::not_found(format!("Job '{}'", id));

        let Ok(job_id) = JobId::new(id) else {
            return Err(not_found());
        };

        self.repository.get(&job_id).await?.ok_or_else(not_found)
    }

    #[instrument(skip(self))]
    async fn sweep(&self) -> Result<u64, DomainError> {
        let expiration = chrono::Duration::from_std(self.config.expiration())
            .unwrap_or_else(|_| chrono::Duration::seconds(300));
        let cutoff = Utc::now() - expiration;

        let deleted = self.repository.delete_terminal_older_than(cutoff).await?;

        if deleted > 0 {
            info!(deleted_count = deleted, "Swept expired jobs");
            metrics::counter!("rag_jobs_swept_total").increment(deleted);
        }

        Ok(deleted)
    }
}

/// Background task running `sweep` on a fixed interval. The task stops when
/// the handle is dropped.
#[derive(Debug)]
pub struct JobSweeper {
    handle: JoinHandle<()>,
}

impl JobSweeper {
    pub fn start(service: Arc<dyn JobServiceTrait>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match service.sweep().await {
                    Ok(deleted) => debug!(deleted, "Sweep finished"),
                    Err(e) => warn!(error = %e, "Sweep failed"),
                }
            }
        });

        Self { handle }
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for JobSweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//! Job trait and related types

use crate::core::error::{PoolError, Result};
use std::fmt;

/// A unit of work handed to whichever worker is ready next.
///
/// The pool never inspects a job. An `Err` returned from [`execute`](Job::execute)
/// is logged and counted by the worker; it is not reported to the submitter.
pub trait Job: Send {
    /// Execute the job
    ///
    /// # Errors
    ///
    /// Returns an error if the job execution fails
    fn execute(&mut self) -> Result<()>;

    /// Get the job's type name for logging and statistics
    fn job_type(&self) -> &str {
        "Job"
    }
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({})", self.job_type())
    }
}

/// A boxed job that can be sent across threads
pub type BoxedJob = Box<dyn Job>;

/// Helper to create a job from a closure
pub struct ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    /// Create a new closure job
    pub fn new(closure: F) -> Self {
        Self::with_name(closure, "ClosureJob")
    }

    /// Create a new closure job with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> Job for ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn execute(&mut self) -> Result<()> {
        match self.closure.take() {
            Some(closure) => closure(),
            None => Err(PoolError::other(format!(
                "{} already executed - cannot execute twice",
                self.name
            ))),
        }
    }

    fn job_type(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_job_runs_once() {
        let mut job = ClosureJob::new(|| Ok(()));

        assert_eq!(job.job_type(), "ClosureJob");
        assert!(job.execute().is_ok());
        assert!(matches!(job.execute(), Err(PoolError::Other(_))));
    }

    #[test]
    fn test_closure_job_with_name() {
        let job: BoxedJob = Box::new(ClosureJob::with_name(|| Ok(()), "resize-report"));
        assert_eq!(job.job_type(), "resize-report");
        assert_eq!(format!("{:?}", job), "Job(resize-report)");
    }
}

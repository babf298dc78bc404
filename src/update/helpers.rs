use crate::command::Command;
use crate::error::DispatchError;
use crate::job::{Job, JobState};

pub fn fail(job: &mut Job, error: DispatchError) -> Vec<Command> {
    job.state = JobState::Failed(error);
    Vec::new()
}

pub fn unexpected(job: &mut Job, action: &'static str) -> Vec<Command> {
    let state = job.state.name();
    fail(job, DispatchError::UnexpectedAction { state, action })
}

/// Body rendered earlier in the job; missing means the job was driven out of order.
pub fn pending_body(job: &Job) -> Option<String> {
    job.comment_body.clone()
}

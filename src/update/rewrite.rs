use crate::command::Command;
use crate::domain::report::render_rewrite_comment;
use crate::domain::types::PublishedComment;
use crate::error::{ModelUnavailable, TrackerError};
use crate::job::{Job, JobState};

use super::helpers;

pub fn handle_model_reply(job: &mut Job, reply: Result<String, ModelUnavailable>) -> Vec<Command> {
    let suggestion = match reply {
        Ok(text) => text,
        Err(err) => return helpers::fail(job, err.into()),
    };

    let body = render_rewrite_comment(&suggestion);
    job.comment_body = Some(body.clone());
    job.state = JobState::PublishingRewrite;
    vec![Command::CreateComment {
        repo: job.repo.clone(),
        number: job.issue.number,
        body,
    }]
}

pub fn handle_rewrite_published(
    job: &mut Job,
    result: Result<PublishedComment, TrackerError>,
) -> Vec<Command> {
    match result {
        Ok(published) => {
            tracing::info!(issue = job.issue.number, comment_id = published.id, "rewrite published");
            job.published = Some(published);
            job.state = JobState::Done;
            Vec::new()
        }
        Err(err) => helpers::fail(job, err.into()),
    }
}

use crate::command::Command;
use crate::domain::label::select_label;
use crate::domain::reconcile::{CommentPlan, plan_report_comment};
use crate::domain::types::{IssueComment, PublishedComment};
use crate::error::TrackerError;
use crate::job::{Job, JobState, Trigger};

use super::helpers;

pub fn handle_comments_listed(
    job: &mut Job,
    result: Result<Vec<IssueComment>, TrackerError>,
) -> Vec<Command> {
    let comments = match result {
        Ok(comments) => comments,
        Err(err) => return helpers::fail(job, err.into()),
    };
    let Some(body) = helpers::pending_body(job) else {
        return helpers::unexpected(job, "comment list");
    };

    let plan = plan_report_comment(&comments, job.bot_login.as_deref());
    job.plan = Some(plan);
    job.state = JobState::PublishingReport;

    match plan {
        CommentPlan::Update { comment_id } => {
            tracing::debug!(issue = job.issue.number, comment_id, "found earlier report");
            vec![Command::UpdateComment {
                repo: job.repo.clone(),
                comment_id,
                body,
            }]
        }
        CommentPlan::Create => {
            tracing::debug!(issue = job.issue.number, "no earlier report");
            vec![Command::CreateComment {
                repo: job.repo.clone(),
                number: job.issue.number,
                body,
            }]
        }
    }
}

pub fn handle_report_published(
    job: &mut Job,
    result: Result<PublishedComment, TrackerError>,
) -> Vec<Command> {
    let published = match result {
        Ok(published) => published,
        Err(err) => return helpers::fail(job, err.into()),
    };

    tracing::info!(
        issue = job.issue.number,
        comment_id = published.id,
        updated = matches!(job.plan, Some(CommentPlan::Update { .. })),
        url = published.html_url.as_deref().unwrap_or(""),
        "report published"
    );
    job.published = Some(published);

    if job.trigger != Trigger::Opened {
        job.state = JobState::Done;
        return Vec::new();
    }

    let Some(score) = job.evaluation.as_ref().map(|e| e.score) else {
        return helpers::unexpected(job, "published comment");
    };
    let label = select_label(score);
    job.label = Some(label);
    job.state = JobState::Labeling;
    vec![Command::AddLabels {
        repo: job.repo.clone(),
        number: job.issue.number,
        labels: vec![label.as_str().to_string()],
    }]
}

pub fn handle_labels_applied(job: &mut Job, result: Result<(), TrackerError>) -> Vec<Command> {
    if let Err(err) = result {
        return helpers::fail(job, err.into());
    }
    tracing::info!(
        issue = job.issue.number,
        label = job.label.map(|l| l.as_str()).unwrap_or(""),
        "label applied"
    );
    job.state = JobState::Done;
    Vec::new()
}

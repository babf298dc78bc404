use crate::command::Command;
use crate::domain::parser;
use crate::domain::reconcile::CommentPlan;
use crate::domain::report::render_report;
use crate::error::ModelUnavailable;
use crate::job::{Job, JobState, Trigger};

pub fn handle_model_reply(job: &mut Job, reply: Result<String, ModelUnavailable>) -> Vec<Command> {
    let evaluation = parser::evaluation_from_reply(reply);
    let report = render_report(&evaluation, job.issue.number);

    tracing::info!(
        repo = %job.repo.full_name(),
        issue = job.issue.number,
        score = evaluation.score,
        "issue evaluated"
    );

    job.evaluation = Some(evaluation);
    job.comment_body = Some(report.clone());

    match job.trigger {
        Trigger::Edited => {
            job.state = JobState::FindingPriorReport;
            vec![Command::ListComments {
                repo: job.repo.clone(),
                number: job.issue.number,
            }]
        }
        _ => {
            job.plan = Some(CommentPlan::Create);
            job.state = JobState::PublishingReport;
            vec![Command::CreateComment {
                repo: job.repo.clone(),
                number: job.issue.number,
                body: report,
            }]
        }
    }
}

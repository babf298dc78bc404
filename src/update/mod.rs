mod evaluation;
mod helpers;
mod publish;
mod rewrite;

use crate::action::Action;
use crate::command::Command;
use crate::domain::prompt::{build_evaluation_prompt, build_rewrite_prompt};
use crate::domain::webhook::{SlashCommand, WebhookEvent};
use crate::job::{Job, JobState, Trigger};

/// Turn a delivery into a job and its first command.
///
/// `None` means the delivery needs no work: an unknown comment, or one written
/// by a bot (including this one).
pub fn start(event: WebhookEvent, bot_login: Option<&str>) -> Option<(Job, Vec<Command>)> {
    let (trigger, repo, issue) = match event {
        WebhookEvent::IssueOpened(e) => (Trigger::Opened, e.repo, e.issue),
        WebhookEvent::IssueEdited(e) => (Trigger::Edited, e.repo, e.issue),
        WebhookEvent::CommentCreated(e) => {
            let own = bot_login.is_some_and(|login| login.eq_ignore_ascii_case(&e.commenter));
            if e.commenter_is_bot || own {
                tracing::debug!(commenter = %e.commenter, "ignoring bot comment");
                return None;
            }
            let command = SlashCommand::parse(&e.body)?;
            tracing::debug!(command = command.as_str(), commenter = %e.commenter, "slash command");
            let trigger = match command {
                SlashCommand::Evaluate => Trigger::EvaluateCommand,
                SlashCommand::Improve => Trigger::ImproveCommand,
            };
            (trigger, e.repo, e.issue)
        }
    };

    let prompt = match trigger {
        Trigger::ImproveCommand => build_rewrite_prompt(&issue),
        _ => build_evaluation_prompt(&issue),
    };
    let job = Job::new(trigger, repo, issue, bot_login.map(str::to_string));
    Some((job, vec![Command::InvokeModel { prompt }]))
}

pub fn update(job: &mut Job, action: Action) -> Vec<Command> {
    let name = action.name();
    match action {
        Action::ModelReplied(reply) => match job.state {
            JobState::Evaluating => evaluation::handle_model_reply(job, reply),
            JobState::Rewriting => rewrite::handle_model_reply(job, reply),
            _ => helpers::unexpected(job, name),
        },
        Action::CommentsListed(result) => match job.state {
            JobState::FindingPriorReport => publish::handle_comments_listed(job, result),
            _ => helpers::unexpected(job, name),
        },
        Action::CommentPublished(result) => match job.state {
            JobState::PublishingReport => publish::handle_report_published(job, result),
            JobState::PublishingRewrite => rewrite::handle_rewrite_published(job, result),
            _ => helpers::unexpected(job, name),
        },
        Action::LabelsApplied(result) => match job.state {
            JobState::Labeling => publish::handle_labels_applied(job, result),
            _ => helpers::unexpected(job, name),
        },
    }
}

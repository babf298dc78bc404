use std::sync::Arc;

use crate::action::Action;
use crate::domain::github::IssueTracker;
use crate::domain::llm::ModelClient;
use crate::domain::types::RepoRef;

/// Outbound calls a job can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    InvokeModel { prompt: String },
    ListComments { repo: RepoRef, number: u64 },
    CreateComment { repo: RepoRef, number: u64, body: String },
    UpdateComment { repo: RepoRef, comment_id: u64, body: String },
    AddLabels { repo: RepoRef, number: u64, labels: Vec<String> },
}

/// External collaborators, shared read-only by every job.
#[derive(Clone)]
pub struct Services {
    pub model: Arc<dyn ModelClient>,
    pub tracker: Arc<dyn IssueTracker>,
}

pub async fn execute_command(command: Command, services: &Services) -> Action {
    match command {
        Command::InvokeModel { prompt } => {
            Action::ModelReplied(services.model.generate(&prompt).await)
        }
        Command::ListComments { repo, number } => {
            Action::CommentsListed(services.tracker.list_comments(&repo, number).await)
        }
        Command::CreateComment { repo, number, body } => {
            Action::CommentPublished(services.tracker.create_comment(&repo, number, &body).await)
        }
        Command::UpdateComment {
            repo,
            comment_id,
            body,
        } => Action::CommentPublished(
            services
                .tracker
                .update_comment(&repo, comment_id, &body)
                .await,
        ),
        Command::AddLabels {
            repo,
            number,
            labels,
        } => Action::LabelsApplied(services.tracker.add_labels(&repo, number, &labels).await),
    }
}

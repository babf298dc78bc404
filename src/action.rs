use crate::domain::types::{IssueComment, PublishedComment};
use crate::error::{ModelUnavailable, TrackerError};

/// Result of an executed [`Command`](crate::command::Command), fed back into `update`.
#[derive(Debug)]
pub enum Action {
    ModelReplied(Result<String, ModelUnavailable>),
    CommentsListed(Result<Vec<IssueComment>, TrackerError>),
    CommentPublished(Result<PublishedComment, TrackerError>),
    LabelsApplied(Result<(), TrackerError>),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ModelReplied(_) => "model reply",
            Action::CommentsListed(_) => "comment list",
            Action::CommentPublished(_) => "published comment",
            Action::LabelsApplied(_) => "label result",
        }
    }
}

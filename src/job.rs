use crate::domain::label::QualityLabel;
use crate::domain::reconcile::CommentPlan;
use crate::domain::types::{EvaluationRecord, IssueRef, PublishedComment, RepoRef};
use crate::error::DispatchError;

/// Which handler a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `issues.opened`: report comment plus label
    Opened,
    /// `issues.edited`: report comment reconciled, no label
    Edited,
    /// `/evaluar` comment: always a new report comment
    EvaluateCommand,
    /// `/mejorar` comment: suggested rewrite comment
    ImproveCommand,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Opened => "opened",
            Trigger::Edited => "edited",
            Trigger::EvaluateCommand => "evaluate_command",
            Trigger::ImproveCommand => "improve_command",
        }
    }
}

/// Job state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Waiting for the model's evaluation reply
    Evaluating,
    /// Waiting for the model's rewrite reply
    Rewriting,
    /// Listing comments to find an earlier report
    FindingPriorReport,
    /// Creating or updating the report comment
    PublishingReport,
    /// Creating the rewrite comment
    PublishingRewrite,
    /// Adding the quality label
    Labeling,
    /// Finished
    Done,
    /// Stopped early
    Failed(DispatchError),
}

impl JobState {
    pub fn name(&self) -> &'static str {
        match self {
            JobState::Evaluating => "evaluating",
            JobState::Rewriting => "rewriting",
            JobState::FindingPriorReport => "finding prior report",
            JobState::PublishingReport => "publishing report",
            JobState::PublishingRewrite => "publishing rewrite",
            JobState::Labeling => "labeling",
            JobState::Done => "done",
            JobState::Failed(_) => "failed",
        }
    }
}

/// One webhook delivery being handled
#[derive(Debug, Clone)]
pub struct Job {
    /// Handler being run
    pub trigger: Trigger,
    /// Repository of the issue
    pub repo: RepoRef,
    /// Issue being evaluated
    pub issue: IssueRef,
    /// Login treated as the bot's own identity when reconciling
    pub bot_login: Option<String>,
    /// Current state
    pub state: JobState,
    /// Evaluation (after the model replied)
    pub evaluation: Option<EvaluationRecord>,
    /// Rendered report or rewrite body
    pub comment_body: Option<String>,
    /// How the report comment was published
    pub plan: Option<CommentPlan>,
    /// Comment GitHub acknowledged
    pub published: Option<PublishedComment>,
    /// Label applied (opened issues only)
    pub label: Option<QualityLabel>,
}

impl Job {
    pub fn new(trigger: Trigger, repo: RepoRef, issue: IssueRef, bot_login: Option<String>) -> Self {
        let state = match trigger {
            Trigger::ImproveCommand => JobState::Rewriting,
            _ => JobState::Evaluating,
        };
        Self {
            trigger,
            repo,
            issue,
            bot_login,
            state,
            evaluation: None,
            comment_body: None,
            plan: None,
            published: None,
            label: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, JobState::Done | JobState::Failed(_))
    }

    pub fn outcome(&self) -> JobOutcome {
        JobOutcome {
            trigger: self.trigger,
            issue_number: self.issue.number,
            score: self.evaluation.as_ref().map(|e| e.score),
            label: self.label,
            comment_id: self.published.as_ref().map(|c| c.id),
            updated_existing: matches!(self.plan, Some(CommentPlan::Update { .. })),
        }
    }
}

/// What a finished job did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub trigger: Trigger,
    pub issue_number: u64,
    pub score: Option<i64>,
    pub label: Option<QualityLabel>,
    pub comment_id: Option<u64>,
    pub updated_existing: bool,
}

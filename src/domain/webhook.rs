use serde::Deserialize;

use super::types::{IssueRef, RepoRef};

pub const ISSUES_EVENT: &str = "issues";
pub const ISSUE_COMMENT_EVENT: &str = "issue_comment";

/// Payload of an `issues` delivery (`opened`, `edited`, ...).
#[derive(Debug, Deserialize)]
struct IssuesPayload {
    action: String,
    issue: IssuePayload,
    repository: RepositoryPayload,
}

/// Payload of an `issue_comment` delivery.
#[derive(Debug, Deserialize)]
struct IssueCommentPayload {
    action: String,
    comment: CommentPayload,
    issue: IssuePayload,
    repository: RepositoryPayload,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: UserPayload,
}

impl IssuePayload {
    fn into_issue_ref(self) -> (IssueRef, String) {
        let author = self.user.map(|u| u.login).unwrap_or_default();
        (
            IssueRef {
                number: self.number,
                title: self.title,
                body: self.body,
            },
            author,
        )
    }
}

impl RepositoryPayload {
    fn into_repo_ref(self) -> RepoRef {
        RepoRef::new(self.owner.login, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEnvelope {
    pub repo: RepoRef,
    pub issue: IssueRef,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEnvelope {
    pub repo: RepoRef,
    pub issue: IssueRef,
    pub body: String,
    pub commenter: String,
    pub commenter_is_bot: bool,
}

/// A delivery the bot knows how to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    IssueOpened(IssueEnvelope),
    IssueEdited(IssueEnvelope),
    CommentCreated(CommentEnvelope),
}

impl WebhookEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WebhookEvent::IssueOpened(_) => "issues.opened",
            WebhookEvent::IssueEdited(_) => "issues.edited",
            WebhookEvent::CommentCreated(_) => "issue_comment.created",
        }
    }

    pub fn repo(&self) -> &RepoRef {
        match self {
            WebhookEvent::IssueOpened(e) | WebhookEvent::IssueEdited(e) => &e.repo,
            WebhookEvent::CommentCreated(e) => &e.repo,
        }
    }

    pub fn issue(&self) -> &IssueRef {
        match self {
            WebhookEvent::IssueOpened(e) | WebhookEvent::IssueEdited(e) => &e.issue,
            WebhookEvent::CommentCreated(e) => &e.issue,
        }
    }

    /// Login behind the delivery: the issue author or the commenter.
    pub fn actor(&self) -> &str {
        match self {
            WebhookEvent::IssueOpened(e) | WebhookEvent::IssueEdited(e) => &e.author,
            WebhookEvent::CommentCreated(e) => &e.commenter,
        }
    }
}

/// Parse a delivery given its `x-github-event` header and raw body.
///
/// Returns `Ok(None)` for events and actions the bot does not handle; the body
/// is only decoded for the two event types it cares about.
pub fn parse_webhook_event(
    event_name: &str,
    body: &[u8],
) -> Result<Option<WebhookEvent>, serde_json::Error> {
    match event_name {
        ISSUES_EVENT => {
            let payload: IssuesPayload = serde_json::from_slice(body)?;
            let repo = payload.repository.into_repo_ref();
            let (issue, author) = payload.issue.into_issue_ref();
            let envelope = IssueEnvelope {
                repo,
                issue,
                author,
            };
            Ok(match payload.action.as_str() {
                "opened" => Some(WebhookEvent::IssueOpened(envelope)),
                "edited" => Some(WebhookEvent::IssueEdited(envelope)),
                _ => None,
            })
        }
        ISSUE_COMMENT_EVENT => {
            let payload: IssueCommentPayload = serde_json::from_slice(body)?;
            if payload.action != "created" {
                return Ok(None);
            }
            let (commenter, commenter_is_bot) = match payload.comment.user {
                Some(user) => {
                    let is_bot = user.kind.as_deref() == Some("Bot");
                    (user.login, is_bot)
                }
                None => (String::new(), false),
            };
            let (issue, _) = payload.issue.into_issue_ref();
            Ok(Some(WebhookEvent::CommentCreated(CommentEnvelope {
                repo: payload.repository.into_repo_ref(),
                issue,
                body: payload.comment.body.unwrap_or_default(),
                commenter,
                commenter_is_bot,
            })))
        }
        _ => Ok(None),
    }
}

/// Slash commands recognised in comment bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    /// `/evaluar`: post a fresh evaluation report.
    Evaluate,
    /// `/mejorar`: post a suggested rewrite of the issue.
    Improve,
}

impl SlashCommand {
    /// Exact match after trimming and lowercasing; anything else is chatter.
    pub fn parse(body: &str) -> Option<Self> {
        match body.trim().to_lowercase().as_str() {
            "/evaluar" => Some(SlashCommand::Evaluate),
            "/mejorar" => Some(SlashCommand::Improve),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlashCommand::Evaluate => "/evaluar",
            SlashCommand::Improve => "/mejorar",
        }
    }
}

use serde::Deserialize;

/// Repository coordinates as GitHub's REST paths want them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// The issue fields the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub number: u64,
    pub title: String,
    /// GitHub sends `null` for an issue created without a description.
    pub body: Option<String>,
}

impl IssueRef {
    pub fn description(&self) -> Option<&str> {
        self.body.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}

/// Structured quality judgement of one issue.
///
/// List and text fields are `None` when the model omitted them, which the
/// renderer treats the same as an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRecord {
    pub score: i64,
    pub good_aspects: Option<Vec<String>>,
    pub improvement_aspects: Option<Vec<String>>,
    pub suggestions: Option<String>,
}

impl EvaluationRecord {
    pub const NEUTRAL_SCORE: i64 = 50;

    /// Substituted when the model call itself failed.
    pub fn model_unavailable_default() -> Self {
        Self {
            score: Self::NEUTRAL_SCORE,
            good_aspects: Some(Vec::new()),
            improvement_aspects: Some(vec!["Evaluation error".to_string()]),
            suggestions: Some("There was a problem evaluating the issue.".to_string()),
        }
    }

    /// Substituted when the model replied without a usable evaluation object.
    pub fn unparseable_default() -> Self {
        Self {
            score: Self::NEUTRAL_SCORE,
            good_aspects: Some(Vec::new()),
            improvement_aspects: Some(vec!["Add more detail".to_string()]),
            suggestions: Some("Please provide more information.".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentAuthor {
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl CommentAuthor {
    pub fn is_bot(&self) -> bool {
        self.kind.as_deref() == Some("Bot")
    }
}

/// A comment as returned by `GET /repos/{owner}/{repo}/issues/{n}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<CommentAuthor>,
}

/// What GitHub returns after creating or editing a comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

//! In-crate fakes for the model and the issue tracker.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::github::IssueTracker;
use crate::domain::llm::ModelClient;
use crate::domain::types::{IssueComment, PublishedComment, RepoRef};
use crate::error::{ModelUnavailable, TrackerError};

/// Replies with scripted results in order; runs dry as unavailable.
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<Result<String, ModelUnavailable>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn replying(reply: &str) -> Self {
        let model = Self::default();
        model.push(Ok(reply.to_string()));
        model
    }

    pub fn failing(reason: &str) -> Self {
        let model = Self::default();
        model.push(Err(ModelUnavailable::new(reason)));
        model
    }

    pub fn push(&self, reply: Result<String, ModelUnavailable>) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl ModelClient for MockModel {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelUnavailable> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelUnavailable::new("no scripted reply")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub issue_number: u64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    pub comment_id: u64,
    pub body: String,
}

/// Records every write; existing comments and failures are configured up front.
#[derive(Default)]
pub struct MockTracker {
    pub existing: Vec<IssueComment>,
    pub fail_on: Option<&'static str>,
    pub created: Mutex<Vec<Posted>>,
    pub updated: Mutex<Vec<Edited>>,
    pub labels: Mutex<Vec<(u64, Vec<String>)>>,
}

impl MockTracker {
    pub fn with_comments(existing: Vec<IssueComment>) -> Self {
        Self {
            existing,
            ..Self::default()
        }
    }

    pub fn failing(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    fn check(&self, operation: &'static str) -> Result<(), TrackerError> {
        if self.fail_on == Some(operation) {
            return Err(TrackerError {
                operation,
                message: "GitHub API error (500): boom".to_string(),
            });
        }
        Ok(())
    }

    pub fn created(&self) -> Vec<Posted> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<Edited> {
        self.updated.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<(u64, Vec<String>)> {
        self.labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn list_comments(
        &self,
        _repo: &RepoRef,
        _issue_number: u64,
    ) -> Result<Vec<IssueComment>, TrackerError> {
        self.check("list comments")?;
        Ok(self.existing.clone())
    }

    async fn create_comment(
        &self,
        _repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<PublishedComment, TrackerError> {
        self.check("create comment")?;
        let mut created = self.created.lock().unwrap();
        created.push(Posted {
            issue_number,
            body: body.to_string(),
        });
        Ok(PublishedComment {
            id: 1000 + created.len() as u64,
            html_url: None,
        })
    }

    async fn update_comment(
        &self,
        _repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<PublishedComment, TrackerError> {
        self.check("update comment")?;
        self.updated.lock().unwrap().push(Edited {
            comment_id,
            body: body.to_string(),
        });
        Ok(PublishedComment {
            id: comment_id,
            html_url: None,
        })
    }

    async fn add_labels(
        &self,
        _repo: &RepoRef,
        issue_number: u64,
        labels: &[String],
    ) -> Result<(), TrackerError> {
        self.check("add labels")?;
        self.labels
            .lock()
            .unwrap()
            .push((issue_number, labels.to_vec()));
        Ok(())
    }
}

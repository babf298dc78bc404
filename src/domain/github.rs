use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::TrackerError;

use super::types::{IssueComment, PublishedComment, RepoRef};

const COMMENTS_PER_PAGE: usize = 100;
const MAX_COMMENT_PAGES: u32 = 50;

/// The four issue-tracker calls the bot makes.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// All comments on an issue, oldest first.
    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>, TrackerError>;

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<PublishedComment, TrackerError>;

    async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<PublishedComment, TrackerError>;

    async fn add_labels(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        labels: &[String],
    ) -> Result<(), TrackerError>;
}

/// GitHub REST v3 client authenticated with a bearer token.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("issue-grader"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .context("Invalid GitHub token")?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, repo: &RepoRef, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_base, repo.owner, repo.name, tail)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send GitHub {operation} request"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API error ({}): {}", status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse GitHub {operation} response"))
    }

    async fn fetch_comments(&self, repo: &RepoRef, issue_number: u64) -> Result<Vec<IssueComment>> {
        let url = self.repo_url(repo, &format!("issues/{issue_number}/comments"));
        let mut all = Vec::new();
        for page in 1..=MAX_COMMENT_PAGES {
            let request = self
                .http
                .get(format!("{url}?per_page={COMMENTS_PER_PAGE}&page={page}"));
            let chunk: Vec<IssueComment> = self.send_json("list comments", request).await?;
            let chunk_len = chunk.len();
            all.extend(chunk);
            if chunk_len < COMMENTS_PER_PAGE {
                break;
            }
        }
        Ok(all)
    }
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>, TrackerError> {
        self.fetch_comments(repo, issue_number)
            .await
            .map_err(|e| TrackerError::new("list comments", e))
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<PublishedComment, TrackerError> {
        let request = self
            .http
            .post(self.repo_url(repo, &format!("issues/{issue_number}/comments")))
            .json(&json!({ "body": body }));
        self.send_json("create comment", request)
            .await
            .map_err(|e| TrackerError::new("create comment", e))
    }

    async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<PublishedComment, TrackerError> {
        let request = self
            .http
            .patch(self.repo_url(repo, &format!("issues/comments/{comment_id}")))
            .json(&json!({ "body": body }));
        self.send_json("update comment", request)
            .await
            .map_err(|e| TrackerError::new("update comment", e))
    }

    async fn add_labels(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        labels: &[String],
    ) -> Result<(), TrackerError> {
        let request = self
            .http
            .post(self.repo_url(repo, &format!("issues/{issue_number}/labels")))
            .json(&json!({ "labels": labels }));
        self.send_json::<serde_json::Value>("add labels", request)
            .await
            .map(|_| ())
            .map_err(|e| TrackerError::new("add labels", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> GithubClient {
        GithubClient::new(&server.base_url(), "ghs_test", Duration::from_secs(5)).expect("client")
    }

    fn repo() -> RepoRef {
        RepoRef::new("acme", "widgets")
    }

    fn comment_json(id: u64) -> serde_json::Value {
        json!({ "id": id, "body": "hi", "user": { "login": "alice", "type": "User" } })
    }

    #[tokio::test]
    async fn list_comments_follows_pages() {
        let server = MockServer::start_async().await;
        let first: Vec<_> = (1..=100).map(comment_json).collect();
        let page_one = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/widgets/issues/4/comments")
                .query_param("page", "1")
                .header("authorization", "Bearer ghs_test");
            then.status(200).json_body(serde_json::Value::Array(first));
        });
        let page_two = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/widgets/issues/4/comments")
                .query_param("page", "2");
            then.status(200).json_body(json!([comment_json(101)]));
        });

        let comments = client(&server).list_comments(&repo(), 4).await.expect("list");
        assert_eq!(comments.len(), 101);
        assert_eq!(comments.last().map(|c| c.id), Some(101));
        page_one.assert();
        page_two.assert();
    }

    #[tokio::test]
    async fn create_and_update_send_body() {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/acme/widgets/issues/4/comments")
                .json_body(json!({ "body": "report" }));
            then.status(201)
                .json_body(json!({ "id": 77, "html_url": "https://github.com/acme/widgets/issues/4#issuecomment-77" }));
        });
        let update = server.mock(|when, then| {
            when.method(PATCH)
                .path("/repos/acme/widgets/issues/comments/77")
                .json_body(json!({ "body": "report v2" }));
            then.status(200).json_body(json!({ "id": 77 }));
        });

        let github = client(&server);
        let created = github.create_comment(&repo(), 4, "report").await.expect("create");
        assert_eq!(created.id, 77);
        let updated = github.update_comment(&repo(), 77, "report v2").await.expect("update");
        assert_eq!(updated.id, 77);
        create.assert();
        update.assert();
    }

    #[tokio::test]
    async fn add_labels_posts_label_list() {
        let server = MockServer::start_async().await;
        let labels = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/acme/widgets/issues/4/labels")
                .json_body(json!({ "labels": ["good"] }));
            then.status(200).json_body(json!([{ "id": 1, "name": "good" }]));
        });

        client(&server)
            .add_labels(&repo(), 4, &["good".to_string()])
            .await
            .expect("labels");
        labels.assert();
    }

    #[tokio::test]
    async fn failures_carry_operation_and_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST);
            then.status(403).body("Resource not accessible by integration");
        });

        let error = client(&server)
            .create_comment(&repo(), 4, "report")
            .await
            .expect_err("forbidden");
        assert_eq!(error.operation, "create comment");
        assert!(error.message.contains("403"), "{}", error.message);
        assert!(error.to_string().starts_with("github create comment failed"));
    }
}

use std::collections::VecDeque;

use crate::command::{Services, execute_command};
use crate::domain::webhook::WebhookEvent;
use crate::error::DispatchError;
use crate::job::{JobOutcome, JobState};
use crate::update;

/// Upper bound on commands per delivery; the longest handler issues four.
const MAX_STEPS: usize = 16;

/// Runs one delivery's handler to completion against the shared services.
pub struct Dispatcher {
    services: Services,
    bot_login: Option<String>,
}

impl Dispatcher {
    pub fn new(services: Services, bot_login: Option<String>) -> Self {
        Self {
            services,
            bot_login,
        }
    }

    /// Drive the handler for `event`.
    ///
    /// `Ok(None)` means the delivery required no work.
    pub async fn run(&self, event: WebhookEvent) -> Result<Option<JobOutcome>, DispatchError> {
        let Some((mut job, commands)) = update::start(event, self.bot_login.as_deref()) else {
            return Ok(None);
        };
        tracing::debug!(
            trigger = job.trigger.as_str(),
            repo = %job.repo.full_name(),
            issue = job.issue.number,
            "handler started"
        );

        let mut queue: VecDeque<_> = commands.into();
        let mut steps = 0;
        while let Some(command) = queue.pop_front() {
            steps += 1;
            if steps > MAX_STEPS {
                return Err(DispatchError::Stalled(MAX_STEPS));
            }
            let action = execute_command(command, &self.services).await;
            queue.extend(update::update(&mut job, action));
        }

        match job.state {
            JobState::Done => Ok(Some(job.outcome())),
            JobState::Failed(err) => Err(err),
            _ => Err(DispatchError::Stalled(steps)),
        }
    }

    /// Run the handler and log how it ended. Failures stop here.
    pub async fn handle(&self, event: WebhookEvent) {
        let name = event.name();
        let repo = event.repo().full_name();
        let issue = event.issue().number;

        match self.run(event).await {
            Ok(Some(outcome)) => tracing::info!(
                event = name,
                repo = %repo,
                issue,
                trigger = outcome.trigger.as_str(),
                score = outcome.score,
                label = outcome.label.map(|l| l.as_str()),
                comment_id = outcome.comment_id,
                updated_existing = outcome.updated_existing,
                "delivery handled"
            ),
            Ok(None) => tracing::debug!(event = name, repo = %repo, issue, "delivery ignored"),
            Err(err) => tracing::error!(
                event = name,
                repo = %repo,
                issue,
                error = %err,
                "delivery handler failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::label::QualityLabel;
    use crate::domain::report::REPORT_MARKER;
    use crate::domain::types::{CommentAuthor, IssueComment, IssueRef, RepoRef};
    use crate::domain::webhook::{CommentEnvelope, IssueEnvelope};
    use crate::job::Trigger;
    use crate::testing::{MockModel, MockTracker};

    fn dispatcher(model: MockModel, tracker: Arc<MockTracker>) -> Dispatcher {
        let services = Services {
            model: Arc::new(model),
            tracker,
        };
        Dispatcher::new(services, Some("grader-bot".to_string()))
    }

    fn envelope() -> IssueEnvelope {
        IssueEnvelope {
            repo: RepoRef::new("acme", "widgets"),
            issue: IssueRef {
                number: 7,
                title: "Login fails".to_string(),
                body: None,
            },
            author: "alice".to_string(),
        }
    }

    fn slash(body: &str) -> WebhookEvent {
        let e = envelope();
        WebhookEvent::CommentCreated(CommentEnvelope {
            repo: e.repo,
            issue: e.issue,
            body: body.to_string(),
            commenter: "bob".to_string(),
            commenter_is_bot: false,
        })
    }

    #[tokio::test]
    async fn opened_issue_posts_report_and_label() {
        let tracker = Arc::new(MockTracker::default());
        let model = MockModel::replying(
            "Here you go:\n```json\n{\"score\": 30, \"aspectos_buenos\": [], \"aspectos_mejorar\": [\"steps\"], \"sugerencias\": \"Add steps\"}\n```",
        );
        let outcome = dispatcher(model, tracker.clone())
            .run(WebhookEvent::IssueOpened(envelope()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.trigger, Trigger::Opened);
        assert_eq!(outcome.score, Some(30));
        assert_eq!(outcome.label, Some(QualityLabel::UrgentReview));

        let created = tracker.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].issue_number, 7);
        assert!(created[0].body.contains("30/100"));
        assert_eq!(tracker.labels(), vec![(7, vec!["urgent-review".to_string()])]);
    }

    #[tokio::test]
    async fn edited_issue_patches_existing_report() {
        let tracker = Arc::new(MockTracker::with_comments(vec![IssueComment {
            id: 55,
            body: Some(format!("## old\n{REPORT_MARKER}")),
            user: Some(CommentAuthor {
                login: "grader-bot".to_string(),
                kind: Some("User".to_string()),
            }),
        }]));
        let model = MockModel::replying(r#"{"score": 90}"#);
        let outcome = dispatcher(model, tracker.clone())
            .run(WebhookEvent::IssueEdited(envelope()))
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.updated_existing);
        assert_eq!(outcome.comment_id, Some(55));
        assert!(tracker.created().is_empty());
        assert!(tracker.labels().is_empty());
        let updated = tracker.updated();
        assert_eq!(updated.len(), 1);
        assert!(updated[0].body.contains("90/100"));
    }

    #[tokio::test]
    async fn label_failure_surfaces_after_comment() {
        let tracker = Arc::new(MockTracker::failing("add labels"));
        let err = dispatcher(MockModel::replying(r#"{"score": 65}"#), tracker.clone())
            .run(WebhookEvent::IssueOpened(envelope()))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Tracker(ref e) if e.operation == "add labels"));
        assert_eq!(tracker.created().len(), 1);
    }

    #[tokio::test]
    async fn rewrite_failure_posts_nothing() {
        let tracker = Arc::new(MockTracker::default());
        let err = dispatcher(MockModel::failing("quota"), tracker.clone())
            .run(slash("/mejorar"))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Rewrite(_)));
        assert!(tracker.created().is_empty());
    }

    #[tokio::test]
    async fn evaluate_command_uses_the_evaluation_prompt() {
        let tracker = Arc::new(MockTracker::default());
        let model = Arc::new(MockModel::replying("not json at all"));
        let services = Services {
            model: model.clone(),
            tracker: tracker.clone(),
        };
        let outcome = Dispatcher::new(services, None)
            .run(slash("/evaluar"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.score, Some(50));
        assert_eq!(outcome.label, None);
        let prompts = model.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Login fails"));
        assert!(tracker.created()[0].body.contains("Add more detail"));
    }

    #[tokio::test]
    async fn chatter_is_ignored_without_calls() {
        let tracker = Arc::new(MockTracker::default());
        let model = Arc::new(MockModel::default());
        let services = Services {
            model: model.clone(),
            tracker: tracker.clone(),
        };
        let result = Dispatcher::new(services, None).run(slash("looks good")).await;

        assert_eq!(result, Ok(None));
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}

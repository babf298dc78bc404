use super::report::REPORT_MARKER;
use super::types::IssueComment;

/// Whether a fresh report replaces an earlier one or starts a new comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlan {
    Update { comment_id: u64 },
    Create,
}

fn authored_by_bot(comment: &IssueComment, bot_login: Option<&str>) -> bool {
    let Some(user) = &comment.user else {
        return false;
    };
    user.is_bot() || bot_login.is_some_and(|login| user.login.eq_ignore_ascii_case(login))
}

/// Most recent comment written by the bot that carries the report marker.
///
/// `comments` must be in creation order, as the list endpoint returns them.
pub fn find_report_comment<'a>(
    comments: &'a [IssueComment],
    bot_login: Option<&str>,
) -> Option<&'a IssueComment> {
    comments.iter().rev().find(|comment| {
        authored_by_bot(comment, bot_login)
            && comment
                .body
                .as_deref()
                .is_some_and(|body| body.contains(REPORT_MARKER))
    })
}

pub fn plan_report_comment(comments: &[IssueComment], bot_login: Option<&str>) -> CommentPlan {
    match find_report_comment(comments, bot_login) {
        Some(comment) => CommentPlan::Update {
            comment_id: comment.id,
        },
        None => CommentPlan::Create,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CommentAuthor;

    fn comment(id: u64, login: &str, kind: &str, body: &str) -> IssueComment {
        IssueComment {
            id,
            body: Some(body.to_string()),
            user: Some(CommentAuthor {
                login: login.to_string(),
                kind: Some(kind.to_string()),
            }),
        }
    }

    fn report_body() -> String {
        format!("## ✅ Issue Quality Evaluation #1\n---\n{REPORT_MARKER}")
    }

    #[test]
    fn picks_most_recent_bot_report() {
        let comments = vec![
            comment(1, "grader[bot]", "Bot", &report_body()),
            comment(2, "alice", "User", "thanks"),
            comment(3, "grader[bot]", "Bot", &report_body()),
            comment(4, "grader[bot]", "Bot", "## 🔄 Suggested Rewrite"),
        ];
        assert_eq!(
            plan_report_comment(&comments, None),
            CommentPlan::Update { comment_id: 3 }
        );
    }

    #[test]
    fn human_quoting_the_marker_is_not_a_match() {
        let comments = vec![comment(9, "mallory", "User", &report_body())];
        assert_eq!(plan_report_comment(&comments, None), CommentPlan::Create);
    }

    #[test]
    fn configured_login_counts_as_bot() {
        let comments = vec![comment(5, "Quality-Bot", "User", &report_body())];
        assert_eq!(plan_report_comment(&comments, None), CommentPlan::Create);
        assert_eq!(
            plan_report_comment(&comments, Some("quality-bot")),
            CommentPlan::Update { comment_id: 5 }
        );
    }

    #[test]
    fn no_comments_means_create() {
        assert_eq!(plan_report_comment(&[], Some("bot")), CommentPlan::Create);
    }

    #[test]
    fn comments_without_author_or_body_are_skipped() {
        let comments = vec![
            IssueComment {
                id: 1,
                body: Some(report_body()),
                user: None,
            },
            IssueComment {
                id: 2,
                body: None,
                user: Some(CommentAuthor {
                    login: "grader[bot]".to_string(),
                    kind: Some("Bot".to_string()),
                }),
            },
        ];
        assert_eq!(find_report_comment(&comments, None), None);
    }
}

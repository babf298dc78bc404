use crate::domain::label::{QualityLabel, select_label};
use crate::domain::llm::ModelClient;
use crate::domain::parser::evaluation_from_reply;
use crate::domain::prompt::build_evaluation_prompt;
use crate::domain::report::render_report;
use crate::domain::types::{EvaluationRecord, IssueRef};

/// A one-off evaluation, without touching GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEvaluation {
    pub evaluation: EvaluationRecord,
    pub label: QualityLabel,
    pub report: String,
}

pub async fn evaluate_issue(model: &dyn ModelClient, issue: &IssueRef) -> LocalEvaluation {
    let reply = model.generate(&build_evaluation_prompt(issue)).await;
    let evaluation = evaluation_from_reply(reply);
    let label = select_label(evaluation.score);
    let report = render_report(&evaluation, issue.number);
    LocalEvaluation {
        evaluation,
        label,
        report,
    }
}

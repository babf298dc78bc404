use std::fmt::Write as _;

use super::types::EvaluationRecord;

/// Hidden marker that identifies a comment as this bot's evaluation report.
pub const REPORT_MARKER: &str = "<!-- issue-quality-report -->";

const BAR_SLOTS: i64 = 20;
const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "░";

/// Presentation tier of a report. Independent of the label tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationTier {
    NeedsUrgentImprovement,
    CouldImprove,
    Excellent,
}

impl PresentationTier {
    pub fn for_score(score: i64) -> Self {
        if score < 40 {
            PresentationTier::NeedsUrgentImprovement
        } else if score < 70 {
            PresentationTier::CouldImprove
        } else {
            PresentationTier::Excellent
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PresentationTier::NeedsUrgentImprovement => "Needs Urgent Improvement",
            PresentationTier::CouldImprove => "Could Improve",
            PresentationTier::Excellent => "Excellent",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PresentationTier::NeedsUrgentImprovement => "❌",
            PresentationTier::CouldImprove => "⚠️",
            PresentationTier::Excellent => "✅",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PresentationTier::NeedsUrgentImprovement => "🔴",
            PresentationTier::CouldImprove => "🟡",
            PresentationTier::Excellent => "🟢",
        }
    }
}

/// `round(score / 5)` filled slots out of twenty.
///
/// Slot counts are clamped to the bar width, so a score above 100 draws a full
/// bar and a negative score an empty one; the numeric score is printed as-is.
pub fn progress_bar(score: i64) -> String {
    let filled = score.saturating_add(2).div_euclid(5).clamp(0, BAR_SLOTS);
    let empty = BAR_SLOTS - filled;
    format!(
        "{}{}",
        BAR_FILLED.repeat(filled as usize),
        BAR_EMPTY.repeat(empty as usize)
    )
}

fn non_empty(list: &Option<Vec<String>>) -> Option<&[String]> {
    match list {
        Some(items) if !items.is_empty() => Some(items.as_slice()),
        _ => None,
    }
}

fn push_list(report: &mut String, heading: &str, bullet: &str, items: &[String]) {
    let _ = writeln!(report, "### {heading}\n");
    for item in items {
        let _ = writeln!(report, "- {bullet} {item}");
    }
    report.push('\n');
}

/// Markdown quality report for one issue. Pure and deterministic.
pub fn render_report(evaluation: &EvaluationRecord, issue_number: u64) -> String {
    let score = evaluation.score;
    let tier = PresentationTier::for_score(score);

    let mut report = String::new();
    let _ = writeln!(
        report,
        "## {} Issue Quality Evaluation #{issue_number}\n",
        tier.emoji()
    );
    let _ = writeln!(
        report,
        "### {} Score: {score}/100 - {}\n",
        tier.color(),
        tier.title()
    );
    let _ = writeln!(report, "`{}` {score}%\n", progress_bar(score));

    if let Some(items) = non_empty(&evaluation.good_aspects) {
        push_list(&mut report, "✨ Good Aspects", "✅", items);
    }
    if let Some(items) = non_empty(&evaluation.improvement_aspects) {
        push_list(&mut report, "🔧 Aspects to Improve", "⚠️", items);
    }
    if let Some(suggestions) = evaluation
        .suggestions
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        let _ = writeln!(report, "### 💡 Suggestions\n\n{suggestions}\n");
    }

    report.push_str("---\n");
    report.push_str("<sub>🤖 Evaluated by Google Gemini | React with 👍 if this was helpful</sub>\n");
    report.push_str(REPORT_MARKER);
    report
}

/// Comment body for a `/mejorar` request: the model text, verbatim, framed.
pub fn render_rewrite_comment(suggestion: &str) -> String {
    format!(
        "## 🔄 Suggested Rewrite\n\n{}\n\n---\n<sub>💡 This is a suggestion. You can edit the original issue with this information.</sub>",
        suggestion.trim()
    )
}

use std::fmt;

/// Quality label applied to a newly opened issue.
///
/// Tiers break at 80/60/40 and deliberately differ from the report's
/// presentation tiers, so a 75 is labelled `good` but rendered as excellent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLabel {
    Excellent,
    Good,
    NeedsImprovement,
    UrgentReview,
}

impl QualityLabel {
    pub const ALL: [QualityLabel; 4] = [
        QualityLabel::Excellent,
        QualityLabel::Good,
        QualityLabel::NeedsImprovement,
        QualityLabel::UrgentReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "excellent",
            QualityLabel::Good => "good",
            QualityLabel::NeedsImprovement => "needs-improvement",
            QualityLabel::UrgentReview => "urgent-review",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn select_label(score: i64) -> QualityLabel {
    if score >= 80 {
        QualityLabel::Excellent
    } else if score >= 60 {
        QualityLabel::Good
    } else if score >= 40 {
        QualityLabel::NeedsImprovement
    } else {
        QualityLabel::UrgentReview
    }
}

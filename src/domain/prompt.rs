use super::types::IssueRef;

const NO_DESCRIPTION: &str = "No description provided";

pub fn build_evaluation_prompt(issue: &IssueRef) -> String {
    format!(
        r#"You are an expert in software project management. Evaluate the quality of this GitHub issue.

**Title:** {title}
**Description:** {body}

Evaluate it against these criteria:
- Does it have a clear, descriptive title?
- Is the description detailed enough?
- Does it include steps to reproduce (if it is a bug)?
- Does it define the expected behavior?
- Does it include environment information?

Respond in JSON with exactly this format:
{{
  "score": 85,
  "aspectos_buenos": ["list of good things"],
  "aspectos_mejorar": ["list of things to improve"],
  "sugerencias": "text with specific suggestions"
}}"#,
        title = issue.title,
        body = issue.description().unwrap_or(NO_DESCRIPTION),
    )
}

pub fn build_rewrite_prompt(issue: &IssueRef) -> String {
    format!(
        r#"Rewrite this GitHub issue so it is clearer, more complete and more professional.

**Current title:** {title}
**Current description:** {body}

Provide:
1. An improved title
2. An improved description in Markdown
3. Keep all of the original information, but organize it better"#,
        title = issue.title,
        body = issue.description().unwrap_or(NO_DESCRIPTION),
    )
}

//! Recovers an [`EvaluationRecord`] from the model's free-text reply.
//!
//! The reply is first decoded as a whole; failing that, every balanced `{...}`
//! span is tried in order of appearance. Braces inside JSON strings do not
//! count towards nesting, so prose around the object and a trailing second
//! object do not poison the extraction.

use serde_json::{Map, Value};

use crate::error::{ModelUnavailable, ParseError};

use super::types::EvaluationRecord;

/// `{` positions tried before giving up on a reply.
const MAX_CANDIDATES: usize = 64;

fn field<'a>(object: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| object.get(alias))
}

/// Whole numbers pass through; fractions round half away from zero.
fn coerce_score(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64))
}

/// String items of a list; anything that is not a list counts as absent.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let Value::Array(items) = value? else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Text, or the string items of a list joined one per line.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    }
}

fn decode_candidate(candidate: &str) -> Option<EvaluationRecord> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;
    let score = object.get("score").and_then(coerce_score)?;
    Some(EvaluationRecord {
        score,
        good_aspects: string_list(field(object, "aspectos_buenos", "good_aspects")),
        improvement_aspects: string_list(field(object, "aspectos_mejorar", "improvement_aspects")),
        suggestions: text(field(object, "sugerencias", "suggestions")),
    })
}

/// Byte offset one past the `}` closing the object that opens at `start`.
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract a structured evaluation from a model reply.
///
/// Only `score` is required. Other fields of an unexpected type count as
/// absent rather than rejecting the object.
pub fn parse_evaluation(text: &str) -> Result<EvaluationRecord, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyReply);
    }

    if let Some(record) = decode_candidate(trimmed) {
        return Ok(record);
    }

    for (start, _) in trimmed.match_indices('{').take(MAX_CANDIDATES) {
        let Some(end) = balanced_object_end(trimmed, start) else {
            continue;
        };
        if let Some(record) = decode_candidate(&trimmed[start..end]) {
            return Ok(record);
        }
    }

    Err(ParseError::NoEvaluationObject)
}

/// Total form used by the pipeline: never fails, degrades to a neutral record.
///
/// A failed model call yields [`EvaluationRecord::model_unavailable_default`];
/// a reply without a usable object yields
/// [`EvaluationRecord::unparseable_default`].
pub fn evaluation_from_reply(reply: Result<String, ModelUnavailable>) -> EvaluationRecord {
    match reply {
        Ok(text) => match parse_evaluation(&text) {
            Ok(record) => {
                tracing::debug!(score = record.score, "parsed evaluation from model reply");
                record
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    reply_chars = text.chars().count(),
                    "unparseable model reply, using default evaluation"
                );
                EvaluationRecord::unparseable_default()
            }
        },
        Err(error) => {
            tracing::warn!(%error, "model call failed, using default evaluation");
            EvaluationRecord::model_unavailable_default()
        }
    }
}

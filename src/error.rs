use thiserror::Error;

/// The generative model could not produce a reply (network, auth, quota, empty candidates).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("model unavailable: {reason}")]
pub struct ModelUnavailable {
    pub reason: String,
}

impl ModelUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The model replied, but no evaluation object could be recovered from the text.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("model reply is empty")]
    EmptyReply,
    #[error("no JSON object with a numeric score found in model reply")]
    NoEvaluationObject,
}

/// A GitHub REST call failed. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("github {operation} failed: {message}")]
pub struct TrackerError {
    pub operation: &'static str,
    pub message: String,
}

impl TrackerError {
    pub fn new(operation: &'static str, error: anyhow::Error) -> Self {
        Self {
            operation,
            message: format!("{error:#}"),
        }
    }
}

/// Why a delivery handler stopped before finishing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("rewrite not posted: {0}")]
    Rewrite(#[from] ModelUnavailable),
    #[error("unexpected {action} while {state}")]
    UnexpectedAction {
        state: &'static str,
        action: &'static str,
    },
    #[error("handler did not settle after {0} steps")]
    Stalled(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} is not valid base64")]
    InvalidBase64 {
        name: &'static str,
        #[source]
        source: base64::DecodeError,
    },
    #[error("{name} does not decode to UTF-8 text")]
    NotUtf8 { name: &'static str },
}

/// `x-hub-signature-256` did not authenticate the delivery body.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header missing")]
    Missing,
    #[error("signature header lacks the sha256= prefix")]
    UnsupportedScheme,
    #[error("signature is not hex")]
    NotHex,
    #[error("signature does not match body")]
    Mismatch,
}

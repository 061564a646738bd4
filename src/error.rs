// src/error.rs
//! Failure taxonomy. Every variant of [`RunError`] names the stage that failed;
//! none of them are retried inside a run.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no session credential configured")]
    MissingCredential,
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
}

/// Why the page could not be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("meet date not found")]
    MissingMeetDate,
    #[error("release countdown not found")]
    MissingReleaseOffset,
    #[error("release countdown is not a whole number")]
    NonNumericReleaseOffset,
}

/// The page layout no longer matches what the parser expects.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ParseError {
    pub reason: ParseFailure,
    pub raw: String,
}

impl ParseError {
    pub fn new(reason: ParseFailure, raw: &str) -> Self {
        Self { reason, raw: raw.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid state record: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode state record: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no webhook URL configured")]
    MissingTarget,
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("webhook rejected the message with {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
    #[error("store: {0}")]
    Storage(#[from] StorageError),
    #[error("notify: {0}")]
    Notify(#[from] NotifyError),
}

impl RunError {
    pub fn stage(&self) -> &'static str {
        match self {
            RunError::Config(_) => "config",
            RunError::Fetch(_) => "fetch",
            RunError::Parse(_) => "parse",
            RunError::Storage(_) => "store",
            RunError::Notify(_) => "notify",
        }
    }

    /// Message for the scheduler's log. Parse failures carry the page as fetched.
    pub fn diagnostic(&self) -> String {
        match self {
            RunError::Parse(e) => format!(
                "{} stage failed: {}\n--- raw content ---\n{}\n--- end raw content ---",
                self.stage(),
                e.reason,
                e.raw
            ),
            other => match other.source() {
                Some(cause) => format!("{} stage failed: {}", other.stage(), cause),
                None => format!("{} stage failed: {}", other.stage(), other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diagnostic_includes_raw_content() {
        let err = RunError::from(ParseError::new(ParseFailure::MissingMeetDate, "<html>redesigned</html>"));
        let msg = err.diagnostic();
        assert!(msg.starts_with("parse stage failed: meet date not found"));
        assert!(msg.contains("<html>redesigned</html>"));
    }

    #[test]
    fn other_diagnostics_name_the_stage() {
        let err = RunError::from(NotifyError::Rejected { status: 429, body: s!("slow down") });
        assert_eq!(err.diagnostic(), "notify stage failed: webhook rejected the message with 429: slow down");
    }
}

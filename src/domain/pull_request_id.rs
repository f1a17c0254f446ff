use serde::Serialize;

use super::{bounded_text::parse_bounded_text, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PullRequestId(String);

impl PullRequestId {
    pub fn parse(id: String) -> Result<Self, ValidationError> {
        parse_bounded_text("pull_request_id", id).map(Self)
    }
}

impl AsRef<str> for PullRequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestName(String);

impl PullRequestName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        parse_bounded_text("pull_request_name", name).map(Self)
    }
}

impl AsRef<str> for PullRequestName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

use serde::Serialize;

use super::{bounded_text::parse_bounded_text, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(String);

impl UserId {
    pub fn parse(id: String) -> Result<Self, ValidationError> {
        parse_bounded_text("user_id", id).map(Self)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[test]
fn test_valid_ids() {
    let valid_id = "u1".to_owned();
    let parsed = UserId::parse(valid_id.clone()).expect(&valid_id);
    assert_eq!(parsed.as_ref(), valid_id, "ID does not match expected value");
}

#[test]
fn test_invalid_ids() {
    let error = UserId::parse(String::new()).expect_err("empty id");
    assert_eq!(error.as_ref(), "user_id cannot be empty");
}

use serde::Serialize;

use super::{bounded_text::parse_bounded_text, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Username(String);

impl Username {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        parse_bounded_text("username", name).map(Self)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

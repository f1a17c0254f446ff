use serde::Serialize;

use super::{bounded_text::parse_bounded_text, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TeamName(String);

impl TeamName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        parse_bounded_text("team_name", name).map(Self)
    }
}

impl AsRef<str> for TeamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[test]
fn test_team_names_keep_their_spelling() {
    let names = ["backend", "Dev Team", "платформа"];
    for name in names {
        let parsed = TeamName::parse(name.to_owned())
            .expect("Failed to parse valid team name");
        assert_eq!(parsed.as_ref(), name);
    }
}

#[test]
fn test_empty_team_name() {
    let result = TeamName::parse(String::new());
    assert_eq!(result.unwrap_err().as_ref(), "team_name cannot be empty");
}

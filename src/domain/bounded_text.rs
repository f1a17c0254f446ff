use super::ValidationError;

pub const MAX_TEXT_LENGTH: usize = 255;

pub(crate) fn parse_bounded_text(
    field: &str,
    value: String,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{field} cannot be empty")));
    }

    match value.chars().count() {
        x if x > MAX_TEXT_LENGTH => Err(ValidationError::new(format!(
            "Max {field} length is {MAX_TEXT_LENGTH} characters"
        ))),
        _ => Ok(value),
    }
}
